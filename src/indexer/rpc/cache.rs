use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use crate::models::common::Block;

#[derive(Default)]
struct Entries {
    blocks: HashMap<u64, Block>,
    order: VecDeque<u64>,
}

/// Bounded block store keyed by height. The oldest insertion is dropped first.
pub struct BlockCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl BlockCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(Entries::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, height: u64) -> Option<Block> {
        self.lock().blocks.get(&height).cloned()
    }

    pub fn insert(&self, block: Block) {
        if self.capacity == 0 {
            return;
        }

        let mut entries = self.lock();
        if entries.blocks.insert(block.height, block.clone()).is_some() {
            return;
        }
        entries.order.push_back(block.height);

        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.blocks.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
