//! Write-through bank service (application-level orchestration).
//!
//! `BankService` owns the resident `AccountStore`, the `LedgerEngine`, and the
//! snapshot repository, and runs every mutating call through the same pipeline:
//!
//! ```text
//! call (explicit customer id)
//!   ↓
//! 1. Checkpoint the resident store
//!   ↓
//! 2. Run the operation in memory (engine appends its audit entry)
//!   ↓
//! 3. Persist the whole snapshot
//!   ↓
//! 4. On persistence failure, restore the checkpoint and report the error
//! ```
//!
//! There is no "current user": callers authenticate once, keep the returned
//! id, and pass it to each operation. Opening an account updates the resident
//! store directly; nothing is reloaded.
//!
//! Rejected operations change nothing, so they are not persisted. Audit
//! entries are fire-and-forget: an entry appended for an operation whose
//! snapshot write later fails is not withdrawn.

use thiserror::Error;

use bluesky_accounts::{Account, AccountKind, AccountStore, Customer, NewCustomer};
use bluesky_core::{BankError, BankResult, CustomerId, Money};
use bluesky_ledger::{LedgerEngine, LedgerPolicy, LogEntry, LogError, Receipt, TransactionLog, TransferTarget};

use crate::persistence::{CustomerRepository, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Business rejection (credentials, validation, limits, deactivation).
    #[error(transparent)]
    Bank(#[from] BankError),

    /// Snapshot load/save failure. State was rolled back.
    #[error("persistence failed: {0}")]
    Store(#[from] StoreError),

    /// The audit log could not be read.
    #[error(transparent)]
    Log(#[from] LogError),
}

impl ServiceError {
    /// The domain error, if this was a business rejection.
    pub fn as_bank(&self) -> Option<&BankError> {
        match self {
            ServiceError::Bank(err) => Some(err),
            _ => None,
        }
    }
}

pub struct BankService<R, L> {
    repo: R,
    store: AccountStore,
    engine: LedgerEngine<L>,
}

impl<R, L> BankService<R, L>
where
    R: CustomerRepository,
    L: TransactionLog,
{
    /// Load the snapshot once and start serving from memory.
    pub fn open(repo: R, log: L, policy: LedgerPolicy) -> Result<Self, ServiceError> {
        let store = AccountStore::from_customers(repo.load_all()?)?;
        tracing::info!(customers = store.len(), "bank state loaded");

        Ok(Self {
            repo,
            store,
            engine: LedgerEngine::with_policy(log, policy),
        })
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    pub fn engine(&self) -> &LedgerEngine<L> {
        &self.engine
    }

    pub fn customer(&self, id: CustomerId) -> Result<&Customer, ServiceError> {
        Ok(self.store.get(id)?)
    }

    pub fn authenticate(&self, id: CustomerId, password: &str) -> Result<&Customer, ServiceError> {
        Ok(self.store.authenticate(id, password)?)
    }

    pub fn register_customer(&mut self, request: NewCustomer) -> Result<Customer, ServiceError> {
        self.mutate(|store, _| Ok(store.add_customer(request).clone()))
    }

    pub fn open_account(&mut self, id: CustomerId, kind: AccountKind) -> Result<Account, ServiceError> {
        self.mutate(|store, _| store.create_account(id, kind).cloned())
    }

    pub fn deposit(
        &mut self,
        id: CustomerId,
        kind: AccountKind,
        amount: Money,
    ) -> Result<Receipt, ServiceError> {
        self.mutate(|store, engine| engine.deposit(store.get_mut(id)?, kind, amount))
    }

    pub fn withdraw(
        &mut self,
        id: CustomerId,
        kind: AccountKind,
        amount: Money,
    ) -> Result<Receipt, ServiceError> {
        self.mutate(|store, engine| engine.withdraw(store.get_mut(id)?, kind, amount))
    }

    pub fn transfer(
        &mut self,
        id: CustomerId,
        from: AccountKind,
        target: TransferTarget,
        amount: Money,
    ) -> Result<Receipt, ServiceError> {
        self.mutate(|store, engine| engine.transfer(store, id, from, target, amount))
    }

    /// Audit entries for a customer, oldest first (`limit` 0 = all).
    pub fn history(&self, id: CustomerId, limit: usize) -> Result<Vec<LogEntry>, ServiceError> {
        self.store.get(id)?;
        Ok(self.engine.history(id, limit)?)
    }

    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut AccountStore, &LedgerEngine<L>) -> BankResult<T>,
    ) -> Result<T, ServiceError> {
        let checkpoint = self.store.clone();
        let value = op(&mut self.store, &self.engine)?;

        if let Err(err) = self.repo.save_all(&self.store.snapshot()) {
            tracing::error!(error = %err, "snapshot write failed, rolling back");
            self.store = checkpoint;
            return Err(err.into());
        }

        Ok(value)
    }
}
