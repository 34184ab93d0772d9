use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

//////////////////////////////////////// Config ////////////////////////////////////////

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub chain_name: String,
    pub chain_id: String,
    pub rpc_url: String,
    pub lcd_url: String,
    #[serde(default)]
    pub datahub_key: Option<String>,
    pub requests_per_second: u32,
    pub request_timeout_secs: u64,
    pub big_page: u64,
    pub maximum_heights_to_get: u64,
    pub block_cache_capacity: usize,
    pub workers_per_stream: usize,
    pub task_timeout_secs: u64,
    pub server: ServerConfig,
    pub metrics: MetricsConfig,
}

//////////////////////////////////// Request Shapes ////////////////////////////////////

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightRange {
    #[serde(default)]
    pub start_height: u64,
    #[serde(default)]
    pub end_height: u64,
}

impl HeightRange {
    pub fn new(start_height: u64, end_height: u64) -> Self {
        Self {
            start_height,
            end_height,
        }
    }

    /// Splits the range into consecutive chunks of at most `size` heights.
    pub fn chunks(&self, size: u64) -> Vec<HeightRange> {
        let size = size.max(1);
        let mut out = Vec::new();
        let mut start = self.start_height;
        loop {
            let end = start.saturating_add(size - 1).min(self.end_height);
            out.push(HeightRange::new(start, end));
            if end >= self.end_height {
                break;
            }
            start = end + 1;
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightHash {
    #[serde(default)]
    pub height: u64,
    #[serde(default)]
    pub hash: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightAccount {
    pub height: u64,
    pub account: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatestDataRequest {
    #[serde(default)]
    pub last_height: u64,
    #[serde(default)]
    pub last_hash: String,
    #[serde(default)]
    pub last_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestDataResponse {
    pub last_hash: String,
    pub last_height: u64,
    pub last_time: DateTime<Utc>,
}

//////////////////////////////////////// Blocks ////////////////////////////////////////

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub hash: String,
    pub height: u64,
    pub time: DateTime<Utc>,
    pub chain_id: String,
    pub number_of_transactions: u64,
}

/// Block metadata gathered for a height range, with the total transaction count.
#[derive(Debug, Default)]
pub struct BlocksMap {
    pub blocks: HashMap<u64, Block>,
    pub num_txs: u64,
}

impl BlocksMap {
    pub fn insert(&mut self, block: Block) {
        self.num_txs += block.number_of_transactions;
        if let Some(previous) = self.blocks.insert(block.height, block) {
            self.num_txs -= previous.number_of_transactions;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_cover_range() {
        let chunks = HeightRange::new(1, 45).chunks(20);
        assert_eq!(
            chunks,
            vec![
                HeightRange::new(1, 20),
                HeightRange::new(21, 40),
                HeightRange::new(41, 45)
            ]
        );

        let single = HeightRange::new(7, 7).chunks(20);
        assert_eq!(single, vec![HeightRange::new(7, 7)]);
    }

    #[test]
    fn test_blocks_map_counts_replacements_once() {
        let mut map = BlocksMap::default();
        let block = Block {
            height: 10,
            number_of_transactions: 3,
            ..Default::default()
        };
        map.insert(block.clone());
        map.insert(block);
        assert_eq!(map.num_txs, 3);
        assert_eq!(map.blocks.len(), 1);
    }
}
