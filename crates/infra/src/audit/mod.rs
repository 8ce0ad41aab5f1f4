//! Durable transaction log adapters.

pub mod jsonl;

pub use jsonl::JsonlTransactionLog;
