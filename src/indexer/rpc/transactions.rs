use std::collections::HashMap;
use tracing::debug;

use crate::indexer::rpc::{RpcClient, into_result};
use crate::indexer::transformations::transactions::TransactionTransformer;
use crate::models::common::{Block, HeightRange};
use crate::models::errors::RpcError;
use crate::models::rpc::{ResultTxSearch, RpcResponse};
use crate::models::transactions::Transaction;

/// Tendermint query selecting every transaction in `range`, quoted as the endpoint expects.
pub fn height_query(range: HeightRange) -> String {
    if range.start_height == range.end_height {
        format!("\"tx.height={}\"", range.start_height)
    } else {
        format!(
            "\"tx.height>={} AND tx.height<={}\"",
            range.start_height, range.end_height
        )
    }
}

impl RpcClient {
    pub(crate) async fn fetch_transactions(
        &self,
        range: HeightRange,
        blocks: &HashMap<u64, Block>,
        page: u64,
        per_page: u64,
    ) -> Result<Vec<Transaction>, RpcError> {
        let query = [
            ("query", height_query(range)),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];

        let response: RpcResponse<ResultTxSearch> = self
            .transport
            .get_json("/tx_search", "tx_search", &query)
            .await?;
        let result = into_result(response, "/tx_search")?;

        debug!(
            start = range.start_height,
            end = range.end_height,
            page,
            found = result.txs.len(),
            total = %result.total_count,
            "Transactions found"
        );

        Ok(result.transform_transactions(blocks, self.metrics.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_query() {
        assert_eq!(
            height_query(HeightRange::new(10, 20)),
            "\"tx.height>=10 AND tx.height<=20\""
        );
        assert_eq!(height_query(HeightRange::new(7, 7)), "\"tx.height=7\"");
    }
}
