use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Execution log of one message, as found in `tx_result.log`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LogFormat {
    #[serde(default)]
    pub msg_index: f64,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub log: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub events: Vec<LogEvents>,
}

impl LogFormat {
    pub fn index(&self) -> String {
        if self.msg_index.fract() == 0.0 && self.msg_index >= 0.0 {
            format!("{}", self.msg_index as u64)
        } else {
            self.msg_index.to_string()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LogEvents {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attributes: Vec<LogEventsAttributes>,
}

/// One element of an event's attribute stream.
///
/// The wire carries `{"key": .., "value": ..}` pairs whose keys repeat, so values
/// accumulate in arrival order instead of being collapsed into a map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogEventsAttributes {
    pub module: String,
    pub action: String,
    pub amount: Vec<String>,
    pub sender: Vec<String>,
    pub recipient: Vec<String>,
    pub validator: BTreeMap<String, Vec<String>>,
    pub completion_time: String,
    pub others: BTreeMap<String, Vec<String>>,
}

const VALIDATOR_KEYS: [&str; 3] = ["validator", "source_validator", "destination_validator"];

impl LogEventsAttributes {
    pub fn push(&mut self, key: &str, value: String) {
        match key {
            "sender" => self.sender.push(value),
            "recipient" => self.recipient.push(value),
            "module" => self.module = value,
            "action" => self.action = value,
            "amount" => self.amount.push(value),
            "completion_time" => self.completion_time = value,
            k if VALIDATOR_KEYS.contains(&k) => {
                self.validator.entry(k.to_string()).or_default().push(value)
            }
            k => self.others.entry(k.to_string()).or_default().push(value),
        }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut attrs = Self::default();
        for (key, value) in pairs {
            attrs.push(key, value.to_string());
        }
        attrs
    }
}

#[derive(Deserialize)]
struct KvHolder {
    key: String,
    #[serde(default)]
    value: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAttributes {
    One(KvHolder),
    Many(Vec<KvHolder>),
}

impl<'de> Deserialize<'de> for LogEventsAttributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = match RawAttributes::deserialize(deserializer)? {
            RawAttributes::One(kv) => vec![kv],
            RawAttributes::Many(kvs) => kvs,
        };

        let mut attrs = Self::default();
        for kv in pairs {
            attrs.push(&kv.key, kv.value.unwrap_or_default());
        }
        Ok(attrs)
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error object the chain writes instead of a log list when execution fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TxLogError {
    #[serde(default)]
    pub codespace: String,
    #[serde(default)]
    pub code: f64,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_stream_keeps_order_and_repeats() {
        let raw = r#"[{"msg_index":0,"success":true,"log":"","events":[{"type":"transfer","attributes":[
            {"key":"recipient","value":"kava1a"},
            {"key":"sender","value":"kava1s"},
            {"key":"amount","value":"10ukava"},
            {"key":"recipient","value":"kava1b"},
            {"key":"amount","value":"20ukava"}
        ]}]}]"#;

        let logs: Vec<LogFormat> = serde_json::from_str(raw).unwrap();
        let attrs = &logs[0].events[0].attributes;
        assert_eq!(attrs.len(), 5);
        assert_eq!(attrs[0].recipient, vec!["kava1a"]);
        assert_eq!(attrs[2].amount, vec!["10ukava"]);
        assert_eq!(attrs[3].recipient, vec!["kava1b"]);
        assert_eq!(logs[0].index(), "0");
    }

    #[test]
    fn test_attribute_routing() {
        let raw = r#"[
            {"key":"validator","value":"kavavaloper1v"},
            {"key":"completion_time","value":"2021-03-01T10:00:00Z"},
            {"key":"module","value":"staking"},
            {"key":"proposal_id","value":"4"},
            {"key":"proposal_id","value":"5"}
        ]"#;
        let attrs: LogEventsAttributes = serde_json::from_str(raw).unwrap();

        assert_eq!(attrs.validator["validator"], vec!["kavavaloper1v"]);
        assert_eq!(attrs.completion_time, "2021-03-01T10:00:00Z");
        assert_eq!(attrs.module, "staking");
        assert_eq!(attrs.others["proposal_id"], vec!["4", "5"]);
    }

    #[test]
    fn test_null_events_and_values() {
        let raw = r#"[{"msg_index":1,"log":"","events":null},
                      {"msg_index":2,"events":[{"type":"message","attributes":[{"key":"action","value":null}]}]}]"#;
        let logs: Vec<LogFormat> = serde_json::from_str(raw).unwrap();
        assert!(logs[0].events.is_empty());
        assert_eq!(logs[1].events[0].attributes[0].action, "");
    }

    #[test]
    fn test_error_object_is_not_a_log_list() {
        let raw = r#"{"codespace":"sdk","code":5,"message":"insufficient funds"}"#;
        assert!(serde_json::from_str::<Vec<LogFormat>>(raw).is_err());

        let err: TxLogError = serde_json::from_str(raw).unwrap();
        assert_eq!(err.codespace, "sdk");
        assert_eq!(err.message, "insufficient funds");
    }
}
