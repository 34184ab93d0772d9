use futures::future::join_all;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error};

use crate::indexer::rpc::Rpc;
use crate::models::common::{BlocksMap, HeightRange};
use crate::models::errors::WorkerError;
use crate::models::tasks::OutResp;

/// Transactions requested per `tx_search` page.
pub const PAGE: u64 = 100;
/// Heights per `/blockchain` request; the node caps this.
pub const BLOCKCHAIN_ENDPOINT_LIMIT: u64 = 20;

/// Starting height for a "latest" sweep, capped at `maximum_heights_to_get` behind the tip.
pub fn get_starting_height(last_height: u64, maximum_heights_to_get: u64, latest: u64) -> u64 {
    if last_height == 0 {
        let last_x = latest.saturating_sub(maximum_heights_to_get);
        if last_x > 0 {
            return last_x;
        }
    }

    if maximum_heights_to_get < latest.saturating_sub(last_height) {
        return latest.saturating_sub(maximum_heights_to_get);
    }

    last_height
}

/// Fetches every block and transaction in `range` and pushes them to `out`.
///
/// Block metadata is gathered first so transactions can be stamped with block time
/// and chain id. Any failing sub-request fails the whole range.
pub async fn get_range<R: Rpc>(
    client: &R,
    range: HeightRange,
    out: &mpsc::Sender<OutResp>,
) -> Result<(), WorkerError> {
    let acc = Mutex::new(BlocksMap::default());

    let batches = range.chunks(BLOCKCHAIN_ENDPOINT_LIMIT);
    debug!(
        start = range.start_height,
        end = range.end_height,
        batches = batches.len(),
        "Getting blocks"
    );

    let errors: Vec<String> = join_all(
        batches
            .into_iter()
            .map(|batch| client.get_blocks_meta(batch, &acc)),
    )
    .await
    .into_iter()
    .filter_map(|r| r.err().map(|e| e.to_string()))
    .collect();

    if !errors.is_empty() {
        return Err(WorkerError::Blocks(errors.join(" , ")));
    }

    let blocks = acc.into_inner();

    let mut heights: Vec<_> = blocks.blocks.keys().copied().collect();
    heights.sort_unstable();
    for height in heights {
        if let Some(block) = blocks.blocks.get(&height) {
            send(out, OutResp::Block(block.clone())).await?;
        }
    }

    if blocks.num_txs == 0 {
        return Ok(());
    }

    let to_be_done = blocks.num_txs.div_ceil(PAGE);
    debug!(all = blocks.num_txs, page = PAGE, to_be_done, "Getting transactions");

    let results = join_all(
        (1..=to_be_done).map(|page| client.search_tx(range, &blocks.blocks, page, PAGE)),
    )
    .await;

    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(txs) => {
                for tx in txs {
                    send(out, OutResp::Transaction(Box::new(tx))).await?;
                }
            }
            Err(e) => {
                error!(start = range.start_height, end = range.end_height, error = %e, "Getting response from tx_search");
                errors.push(e.to_string());
            }
        }
    }

    if !errors.is_empty() {
        return Err(WorkerError::Search(errors.join(" , ")));
    }
    Ok(())
}

async fn send(out: &mpsc::Sender<OutResp>, item: OutResp) -> Result<(), WorkerError> {
    out.send(item)
        .await
        .map_err(|_| WorkerError::StreamClosed("response channel".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_height() {
        // Nothing indexed yet: only the last window.
        assert_eq!(get_starting_height(0, 1000, 5000), 4000);
        assert_eq!(get_starting_height(0, 1000, 500), 0);

        // Far behind: jump to the window.
        assert_eq!(get_starting_height(100, 1000, 5000), 4000);

        // Close to the tip: continue from the last height.
        assert_eq!(get_starting_height(4500, 1000, 5000), 4500);

        // Ahead of the node never underflows.
        assert_eq!(get_starting_height(6000, 1000, 5000), 6000);
    }
}
