pub mod common;
pub mod errors;
pub mod logs;
pub mod proto;
pub mod rpc;
pub mod tasks;
pub mod transactions;
