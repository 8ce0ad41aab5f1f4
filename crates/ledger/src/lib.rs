//! Ledger module: balance mutation rules, the overdraft state machine, and the
//! audit log boundary.
//!
//! Pure domain logic only: the engine mutates resident customer state and
//! appends to whatever `TransactionLog` it is given. Durability is handled by
//! the infrastructure layer.

pub mod engine;
pub mod log;
pub mod policy;

pub use engine::{LedgerEngine, Outcome, Receipt, TransferTarget};
pub use log::{
    AccountDescriptor, Action, EntryStatus, InMemoryTransactionLog, LogEntry, LogError,
    TransactionLog,
};
pub use policy::LedgerPolicy;
