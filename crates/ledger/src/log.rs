//! Append-only audit log of ledger operations.
//!
//! Every deposit, withdrawal and transfer attempt that reaches a resolved
//! account produces exactly one `LogEntry`, successful or not. Entries are
//! immutable once appended and are read back in append order.

use core::str::FromStr;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

use bluesky_accounts::AccountKind;
use bluesky_core::{BankError, CustomerId, Money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Deposit,
    Withdraw,
    Transfer,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Deposit => "deposit",
            Action::Withdraw => "withdraw",
            Action::Transfer => "transfer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Ok,
    Error,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Ok => "ok",
            EntryStatus::Error => "error",
        }
    }
}

/// Which account(s) an entry touched.
///
/// Rendered as `checking`, `checking->savings`, or for a transfer to another
/// customer `checking->10002:savings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountDescriptor {
    Single(AccountKind),
    Internal {
        from: AccountKind,
        to: AccountKind,
    },
    External {
        from: AccountKind,
        target: CustomerId,
        kind: AccountKind,
    },
}

impl core::fmt::Display for AccountDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AccountDescriptor::Single(kind) => write!(f, "{kind}"),
            AccountDescriptor::Internal { from, to } => write!(f, "{from}->{to}"),
            AccountDescriptor::External { from, target, kind } => {
                write!(f, "{from}->{target}:{kind}")
            }
        }
    }
}

impl FromStr for AccountDescriptor {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((from, to)) = s.split_once("->") else {
            return Ok(AccountDescriptor::Single(s.parse()?));
        };
        let from = from.parse()?;
        match to.split_once(':') {
            Some((target, kind)) => Ok(AccountDescriptor::External {
                from,
                target: target.parse()?,
                kind: kind.parse()?,
            }),
            None => Ok(AccountDescriptor::Internal {
                from,
                to: to.parse()?,
            }),
        }
    }
}

impl Serialize for AccountDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One immutable audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub entry_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub customer_id: CustomerId,
    pub action: Action,
    #[serde(rename = "account_type")]
    pub account: AccountDescriptor,
    pub amount: Money,
    pub fee: Money,
    pub prev_balance: Money,
    pub new_balance: Money,
    pub status: EntryStatus,
    pub message: String,
}

impl LogEntry {
    pub fn is_ok(&self) -> bool {
        self.status == EntryStatus::Ok
    }
}

/// Audit log failure. Reported, never retried.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("transaction log unavailable: {0}")]
    Unavailable(String),
}

/// Append-only, customer-filterable transaction log.
///
/// `list_for` is a fresh read on every call: the result is a snapshot, not a
/// live cursor. A `limit` of zero means "everything"; otherwise only the most
/// recent `limit` entries are returned, still oldest first.
pub trait TransactionLog: Send + Sync {
    fn append(&self, entry: LogEntry) -> Result<(), LogError>;

    fn list_for(&self, customer_id: CustomerId, limit: usize) -> Result<Vec<LogEntry>, LogError>;
}

impl<L> TransactionLog for Arc<L>
where
    L: TransactionLog + ?Sized,
{
    fn append(&self, entry: LogEntry) -> Result<(), LogError> {
        (**self).append(entry)
    }

    fn list_for(&self, customer_id: CustomerId, limit: usize) -> Result<Vec<LogEntry>, LogError> {
        (**self).list_for(customer_id, limit)
    }
}

/// Keep the newest `limit` entries of an already-ordered list (0 = all).
pub fn keep_most_recent(mut entries: Vec<LogEntry>, limit: usize) -> Vec<LogEntry> {
    if limit > 0 && entries.len() > limit {
        let excess = entries.len() - limit;
        entries.drain(..excess);
    }
    entries
}

/// In-memory append-only log.
///
/// Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryTransactionLog {
    entries: RwLock<Vec<LogEntry>>,
}

impl InMemoryTransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entries across all customers.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransactionLog for InMemoryTransactionLog {
    fn append(&self, entry: LogEntry) -> Result<(), LogError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LogError::Unavailable("lock poisoned".to_string()))?;
        entries.push(entry);
        Ok(())
    }

    fn list_for(&self, customer_id: CustomerId, limit: usize) -> Result<Vec<LogEntry>, LogError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LogError::Unavailable("lock poisoned".to_string()))?;

        let matching = entries
            .iter()
            .filter(|e| e.customer_id == customer_id)
            .cloned()
            .collect();

        Ok(keep_most_recent(matching, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(customer: u64, amount: i64) -> LogEntry {
        LogEntry {
            entry_id: Uuid::now_v7(),
            occurred_at: Utc::now(),
            customer_id: CustomerId::new(customer),
            action: Action::Deposit,
            account: AccountDescriptor::Single(AccountKind::Checking),
            amount: Money::dollars(amount),
            fee: Money::ZERO,
            prev_balance: Money::ZERO,
            new_balance: Money::dollars(amount),
            status: EntryStatus::Ok,
            message: String::new(),
        }
    }

    #[test]
    fn descriptor_renders_transfer_tags() {
        use AccountKind::*;
        assert_eq!(AccountDescriptor::Single(Savings).to_string(), "savings");
        assert_eq!(
            AccountDescriptor::Internal { from: Checking, to: Savings }.to_string(),
            "checking->savings"
        );
        assert_eq!(
            AccountDescriptor::External {
                from: Savings,
                target: CustomerId::new(10002),
                kind: Checking,
            }
            .to_string(),
            "savings->10002:checking"
        );
    }

    #[test]
    fn descriptor_parses_what_it_renders() {
        for raw in ["checking", "savings->checking", "checking->10007:savings"] {
            let parsed: AccountDescriptor = raw.parse().unwrap();
            assert_eq!(parsed.to_string(), raw);
        }
        assert!("checking->".parse::<AccountDescriptor>().is_err());
    }

    #[test]
    fn list_for_filters_by_customer_in_append_order() {
        let log = InMemoryTransactionLog::new();
        log.append(entry(10001, 1)).unwrap();
        log.append(entry(10002, 2)).unwrap();
        log.append(entry(10001, 3)).unwrap();

        let amounts: Vec<_> = log
            .list_for(CustomerId::new(10001), 0)
            .unwrap()
            .into_iter()
            .map(|e| e.amount)
            .collect();
        assert_eq!(amounts, vec![Money::dollars(1), Money::dollars(3)]);
    }

    #[test]
    fn limit_keeps_most_recent_entries() {
        let log = InMemoryTransactionLog::new();
        for amount in 1..=5 {
            log.append(entry(10001, amount)).unwrap();
        }

        let recent = log.list_for(CustomerId::new(10001), 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].amount, Money::dollars(4));
        assert_eq!(recent[1].amount, Money::dollars(5));

        assert_eq!(log.list_for(CustomerId::new(10001), 50).unwrap().len(), 5);
    }

    #[test]
    fn reads_are_fresh_snapshots() {
        let log = InMemoryTransactionLog::new();
        log.append(entry(10001, 1)).unwrap();
        let first = log.list_for(CustomerId::new(10001), 0).unwrap();
        log.append(entry(10001, 2)).unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(log.list_for(CustomerId::new(10001), 0).unwrap().len(), 2);
    }
}
