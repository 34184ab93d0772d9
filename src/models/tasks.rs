use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::models::common::Block;
use crate::models::transactions::{Transaction, TransactionAmount};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    GetTransactions,
    GetLatestData,
    GetLatestMark,
    GetBlock,
    GetReward,
    Unknown(String),
}

impl From<&str> for RequestKind {
    fn from(kind: &str) -> Self {
        match kind {
            "GetTransactions" => Self::GetTransactions,
            "GetLatestData" => Self::GetLatestData,
            "GetLatestMark" => Self::GetLatestMark,
            "GetBlock" => Self::GetBlock,
            "GetReward" => Self::GetReward,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GetTransactions => "GetTransactions",
            Self::GetLatestData => "GetLatestData",
            Self::GetLatestMark => "GetLatestMark",
            Self::GetBlock => "GetBlock",
            Self::GetReward => "GetReward",
            Self::Unknown(other) => other.as_str(),
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl TaskRequest {
    pub fn request_kind(&self) -> RequestKind {
        RequestKind::from(self.kind.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskError {
    pub msg: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub order: u64,
    #[serde(rename = "final", default)]
    pub is_final: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TaskError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl TaskResponse {
    pub fn error(id: &str, msg: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            is_final: true,
            error: Some(TaskError { msg: msg.into() }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetRewardResponse {
    pub height: u64,
    pub account: String,
    pub rewards: Vec<TransactionAmount>,
    #[serde(default)]
    pub validators: BTreeMap<String, Vec<TransactionAmount>>,
}

/// Typed item produced by a handler before it is wrapped into a `TaskResponse`.
#[derive(Debug, Clone)]
pub enum OutResp {
    Transaction(Box<Transaction>),
    Block(Block),
    Reward(GetRewardResponse),
}

impl OutResp {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transaction(_) => "Transaction",
            Self::Block(_) => "Block",
            Self::Reward(_) => "Reward",
        }
    }

    pub fn to_payload(&self) -> serde_json::Result<Value> {
        match self {
            Self::Transaction(tx) => serde_json::to_value(tx),
            Self::Block(block) => serde_json::to_value(block),
            Self::Reward(reward) => serde_json::to_value(reward),
        }
    }
}
