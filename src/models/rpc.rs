use serde::{Deserialize, Serialize};

/// JSON-RPC envelope returned by the Tendermint endpoints.
#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    #[serde(default)]
    pub jsonrpc: String,
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<ResponseError>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: String,
}

////////////////////////////////////// Tx Search ///////////////////////////////////////

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultTxSearch {
    #[serde(default)]
    pub txs: Vec<TxResponse>,
    #[serde(default)]
    pub total_count: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TxResponse {
    pub hash: String,
    pub height: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub tx_result: ResponseDeliverTx,
    /// Base64 encoded transaction envelope.
    pub tx: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseDeliverTx {
    #[serde(default)]
    pub log: String,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub codespace: String,
    #[serde(rename = "gasWanted", alias = "gas_wanted", default)]
    pub gas_wanted: String,
    #[serde(rename = "gasUsed", alias = "gas_used", default)]
    pub gas_used: String,
}

//////////////////////////////////////// Blocks ////////////////////////////////////////

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultBlock {
    pub block: BlockBody,
    pub block_id: BlockId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockBody {
    pub header: BlockHeader,
    #[serde(default)]
    pub data: BlockData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockHeader {
    pub height: String,
    #[serde(default)]
    pub chain_id: String,
    pub time: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockData {
    #[serde(default)]
    pub txs: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockId {
    #[serde(default)]
    pub hash: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultBlockchain {
    #[serde(default)]
    pub last_height: String,
    #[serde(default)]
    pub block_metas: Vec<BlockMeta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockMeta {
    pub block_id: BlockId,
    pub header: BlockHeader,
    #[serde(default)]
    pub num_txs: String,
}

/////////////////////////////////////// Rewards ////////////////////////////////////////

/// Legacy LCD wrapper: `{"height": "..", "result": ..}`.
#[derive(Debug, Deserialize)]
pub struct LcdResponse<T> {
    #[serde(default)]
    pub height: String,
    pub result: T,
}

#[derive(Debug, Default, Deserialize)]
pub struct DelegatorRewards {
    #[serde(default)]
    pub rewards: Option<Vec<ValidatorReward>>,
    #[serde(default)]
    pub total: Option<Vec<DecCoin>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ValidatorReward {
    pub validator_address: String,
    #[serde(default)]
    pub reward: Option<Vec<DecCoin>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DecCoin {
    pub denom: String,
    pub amount: String,
}
