//! Whole-snapshot customer persistence.
//!
//! The bank never writes deltas: every successful mutation rewrites the full
//! customer set, and startup reads it back in one go.

pub mod csv_store;
pub mod in_memory;

use std::sync::Arc;

use thiserror::Error;

use bluesky_accounts::Customer;

pub use csv_store::CsvCustomerRepository;
pub use in_memory::InMemoryCustomerRepository;

/// Snapshot storage error.
///
/// These are infrastructure failures (files, encoding, corrupt rows), as
/// opposed to `BankError`s, which are business rejections.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Load/save boundary for the customer snapshot.
///
/// - `load_all` returns customers in stored order, or an empty list when no
///   prior state exists.
/// - `save_all` replaces the entire durable snapshot. A failed save must leave
///   the previous snapshot readable.
pub trait CustomerRepository: Send + Sync {
    fn load_all(&self) -> Result<Vec<Customer>, StoreError>;

    fn save_all(&self, customers: &[Customer]) -> Result<(), StoreError>;
}

impl<R> CustomerRepository for Arc<R>
where
    R: CustomerRepository + ?Sized,
{
    fn load_all(&self) -> Result<Vec<Customer>, StoreError> {
        (**self).load_all()
    }

    fn save_all(&self, customers: &[Customer]) -> Result<(), StoreError> {
        (**self).save_all(customers)
    }
}
