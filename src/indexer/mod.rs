pub mod rpc;
pub mod transformations;
