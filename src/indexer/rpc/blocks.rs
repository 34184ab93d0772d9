use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::indexer::rpc::{RpcClient, into_result};
use crate::models::common::{Block, BlocksMap, HeightHash, HeightRange};
use crate::models::errors::RpcError;
use crate::models::rpc::{BlockHeader, BlockMeta, ResultBlock, ResultBlockchain, RpcResponse};

pub trait BlockParser {
    fn parse_block(&self) -> Result<Block, RpcError>;
}

impl BlockParser for ResultBlock {
    fn parse_block(&self) -> Result<Block, RpcError> {
        let header = &self.block.header;
        let number_of_transactions = self.block.data.txs.as_ref().map_or(0, |txs| txs.len() as u64);

        Ok(Block {
            hash: self.block_id.hash.clone(),
            height: parse_height(header)?,
            time: parse_time(header)?,
            chain_id: header.chain_id.clone(),
            number_of_transactions,
        })
    }
}

impl BlockParser for BlockMeta {
    fn parse_block(&self) -> Result<Block, RpcError> {
        let number_of_transactions = if self.num_txs.is_empty() {
            0
        } else {
            self.num_txs
                .parse()
                .map_err(|_| RpcError::InvalidField {
                    field: "num_txs",
                    value: self.num_txs.clone(),
                })?
        };

        Ok(Block {
            hash: self.block_id.hash.clone(),
            height: parse_height(&self.header)?,
            time: parse_time(&self.header)?,
            chain_id: self.header.chain_id.clone(),
            number_of_transactions,
        })
    }
}

fn parse_height(header: &BlockHeader) -> Result<u64, RpcError> {
    header.height.parse().map_err(|_| RpcError::InvalidField {
        field: "height",
        value: header.height.clone(),
    })
}

fn parse_time(header: &BlockHeader) -> Result<DateTime<Utc>, RpcError> {
    DateTime::parse_from_rfc3339(&header.time)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| RpcError::InvalidField {
            field: "time",
            value: header.time.clone(),
        })
}

impl RpcClient {
    pub(crate) async fn fetch_block(&self, params: HeightHash) -> Result<Block, RpcError> {
        if params.height != 0 {
            if let Some(block) = self.cache.get(params.height) {
                self.metrics.block_cache(true);
                return Ok(block);
            }
            self.metrics.block_cache(false);
        }

        let query = if params.height == 0 {
            Vec::new()
        } else {
            vec![("height", params.height.to_string())]
        };

        let response: RpcResponse<ResultBlock> =
            self.transport.get_json("/block", "block", &query).await?;
        let block = into_result(response, "/block")?.parse_block()?;

        if !params.hash.is_empty() && params.hash != block.hash {
            warn!(
                height = block.height,
                requested = %params.hash,
                received = %block.hash,
                "Block hash differs from the requested one"
            );
        }

        self.cache.insert(block.clone());
        Ok(block)
    }

    pub(crate) async fn fetch_blocks_meta(
        &self,
        range: HeightRange,
        acc: &Mutex<BlocksMap>,
    ) -> Result<(), RpcError> {
        let query = [
            ("minHeight", range.start_height.to_string()),
            ("maxHeight", range.end_height.to_string()),
        ];

        let response: RpcResponse<ResultBlockchain> = self
            .transport
            .get_json("/blockchain", "blockchain", &query)
            .await?;
        let result = into_result(response, "/blockchain")?;

        let blocks = result
            .block_metas
            .iter()
            .map(|meta| meta.parse_block())
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            start = range.start_height,
            end = range.end_height,
            count = blocks.len(),
            "Fetched block metadata"
        );

        let mut acc = acc.lock().await;
        for block in blocks {
            acc.insert(block);
        }
        Ok(())
    }
}
