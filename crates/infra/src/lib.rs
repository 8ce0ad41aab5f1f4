//! Infrastructure layer: durable snapshot + audit log adapters, configuration,
//! and the write-through service that ties them to the ledger engine.

pub mod audit;
pub mod config;
pub mod persistence;
pub mod service;

#[cfg(test)]
mod integration_tests;

pub use audit::JsonlTransactionLog;
pub use config::BankConfig;
pub use persistence::{
    CsvCustomerRepository, CustomerRepository, InMemoryCustomerRepository, StoreError,
};
pub use service::{BankService, ServiceError};
