pub mod amounts;
pub mod mappers;
pub mod messages;
pub mod reconciler;
pub mod transactions;
