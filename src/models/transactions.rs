use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A normalized on-chain transaction with one event per embedded message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: String,
    pub memo: String,
    pub height: u64,
    pub chain_id: String,
    pub block_hash: String,
    pub time: DateTime<Utc>,
    pub gas_wanted: u64,
    pub gas_used: u64,
    pub fee: Vec<TransactionAmount>,
    #[serde(with = "base64_bytes")]
    pub raw_log: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub raw: Vec<u8>,
    pub events: Vec<TransactionEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionEvent {
    pub id: String,
    pub kind: String,
    pub sub: Vec<SubsetEvent>,
}

/// Chain agnostic representation of a single semantic action.
///
/// An event with an empty `type` list carries nothing and is never attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubsetEvent {
    #[serde(rename = "type")]
    pub kind: Vec<String>,
    pub module: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub action: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node: BTreeMap<String, Vec<Account>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sender: Vec<EventTransfer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipient: Vec<EventTransfer>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub amount: BTreeMap<String, TransactionAmount>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub transfers: BTreeMap<String, Vec<EventTransfer>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SubsetEventError>,
}

impl SubsetEvent {
    pub fn new(kind: &str, module: &str) -> Self {
        Self {
            kind: vec![kind.to_string()],
            module: module.to_string(),
            ..Default::default()
        }
    }

    pub fn is_present(&self) -> bool {
        !self.kind.is_empty()
    }

    pub fn with_node(mut self, role: &str, account: Account) -> Self {
        self.node.entry(role.to_string()).or_default().push(account);
        self
    }

    pub fn with_additional(mut self, key: &str, value: impl Into<String>) -> Self {
        self.additional
            .entry(key.to_string())
            .or_default()
            .push(value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetEventError {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<AccountDetails>,
}

impl Account {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            details: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountDetails {
    pub name: String,
    pub description: String,
    pub contact: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventTransfer {
    pub account: Account,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amounts: Vec<TransactionAmount>,
}

/// Currency amount kept as an exact `numeric × 10^-exp` pair next to its text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAmount {
    #[serde(default)]
    pub currency: String,
    pub text: String,
    #[serde(with = "bigint_string")]
    pub numeric: BigInt,
    pub exp: i32,
}

impl TransactionAmount {
    pub fn new(currency: impl Into<String>, text: impl Into<String>, numeric: BigInt, exp: i32) -> Self {
        Self {
            currency: currency.into(),
            text: text.into(),
            numeric,
            exp,
        }
    }
}

mod bigint_string {
    use num_bigint::BigInt;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        let s = String::deserialize(deserializer)?;
        BigInt::from_str(&s).map_err(D::Error::custom)
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_serializes_numeric_as_string() {
        let amount = TransactionAmount::new("ukava", "1234.56", BigInt::from(123456), 2);
        let json = serde_json::to_value(&amount).unwrap();
        assert_eq!(json["numeric"], "123456");
        assert_eq!(json["exp"], 2);

        let back: TransactionAmount = serde_json::from_value(json).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn test_empty_subset_event_is_not_present() {
        assert!(!SubsetEvent::default().is_present());
        assert!(SubsetEvent::new("send", "bank").is_present());
    }
}
