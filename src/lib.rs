//! Kava indexing worker: fetches blocks and transactions from a Tendermint node,
//! normalizes every transaction into chain agnostic events, and streams the
//! results to an indexing manager.

pub mod indexer;
pub mod metrics;
pub mod models;
pub mod utils;
pub mod worker;
