use std::sync::RwLock;

use bluesky_accounts::Customer;

use super::{CustomerRepository, StoreError};

/// In-memory snapshot holder.
///
/// Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    snapshot: RwLock<Vec<Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot.
    pub fn with_customers(customers: Vec<Customer>) -> Self {
        Self {
            snapshot: RwLock::new(customers),
        }
    }
}

impl CustomerRepository for InMemoryCustomerRepository {
    fn load_all(&self) -> Result<Vec<Customer>, StoreError> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(snapshot.clone())
    }

    fn save_all(&self, customers: &[Customer]) -> Result<(), StoreError> {
        let mut snapshot = self
            .snapshot
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        *snapshot = customers.to_vec();
        Ok(())
    }
}
