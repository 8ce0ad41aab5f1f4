use std::collections::BTreeMap;

use bluesky_core::{BankError, BankResult, CustomerId, Entity};

use crate::account::{Account, AccountKind};
use crate::customer::{Customer, NewCustomer};

/// In-memory set of customers, keyed and ordered by id.
///
/// The store is the resident copy of bank state: it is loaded once from a
/// snapshot and mutated in place. Writing it back is the caller's concern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountStore {
    customers: BTreeMap<CustomerId, Customer>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a loaded snapshot. Duplicate ids are rejected.
    pub fn from_customers(customers: impl IntoIterator<Item = Customer>) -> BankResult<Self> {
        let mut map = BTreeMap::new();
        for customer in customers {
            let id = customer.id();
            if map.insert(id, customer).is_some() {
                return Err(BankError::validation(format!("duplicate customer id {id}")));
            }
        }
        Ok(Self { customers: map })
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Customers in ascending id order.
    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    /// Owned copy of every customer, ready to hand to a persistence layer.
    pub fn snapshot(&self) -> Vec<Customer> {
        self.customers.values().cloned().collect()
    }

    /// Identifier the next registered customer will receive.
    pub fn next_id(&self) -> CustomerId {
        self.customers
            .keys()
            .next_back()
            .map(|id| id.next())
            .unwrap_or(CustomerId::FIRST)
    }

    pub fn add_customer(&mut self, request: NewCustomer) -> &Customer {
        let id = self.next_id();
        tracing::info!(customer_id = %id, "customer registered");
        self.customers
            .entry(id)
            .or_insert_with(|| Customer::register(id, request))
    }

    pub fn find_by_id(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.get(&id)
    }

    pub fn find_by_id_mut(&mut self, id: CustomerId) -> Option<&mut Customer> {
        self.customers.get_mut(&id)
    }

    /// Like [`AccountStore::find_by_id`], but a miss is a `NotFound` error.
    pub fn get(&self, id: CustomerId) -> BankResult<&Customer> {
        self.find_by_id(id)
            .ok_or_else(|| BankError::not_found(format!("customer {id}")))
    }

    pub fn get_mut(&mut self, id: CustomerId) -> BankResult<&mut Customer> {
        self.find_by_id_mut(id)
            .ok_or_else(|| BankError::not_found(format!("customer {id}")))
    }

    /// Open an account directly on the resident customer record.
    pub fn create_account(&mut self, id: CustomerId, kind: AccountKind) -> BankResult<&Account> {
        let customer = self.get_mut(id)?;
        let account = customer.open_account(kind)?;
        tracing::info!(customer_id = %id, kind = %kind, "account opened");
        Ok(account)
    }

    /// Match a customer by id and exact password.
    ///
    /// An unknown id and a wrong password are indistinguishable to the caller.
    pub fn authenticate(&self, id: CustomerId, password: &str) -> BankResult<&Customer> {
        match self.find_by_id(id) {
            Some(customer) if customer.verify_password(password) => Ok(customer),
            _ => {
                tracing::warn!(customer_id = %id, "authentication failed");
                Err(BankError::Auth)
            }
        }
    }
}
