//! Configuration loading and representation.

use std::path::PathBuf;

use anyhow::{Context, Result};

use bluesky_core::Money;
use bluesky_ledger::LedgerPolicy;

pub const DATA_DIR_VAR: &str = "BLUESKY_DATA_DIR";
pub const CUSTOMERS_FILE_VAR: &str = "BLUESKY_CUSTOMERS_FILE";
pub const LOG_FILE_VAR: &str = "BLUESKY_LOG_FILE";
pub const MAX_TX_AMOUNT_VAR: &str = "BLUESKY_MAX_TX_AMOUNT";
pub const OVERDRAFT_FEE_VAR: &str = "BLUESKY_OVERDRAFT_FEE";
pub const OVERDRAFT_CAP_OFFSET_VAR: &str = "BLUESKY_OVERDRAFT_CAP_OFFSET";
pub const DEACTIVATE_THRESHOLD_VAR: &str = "BLUESKY_DEACTIVATE_THRESHOLD";

/// Where bank state lives and which ledger rules apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankConfig {
    pub customers_path: PathBuf,
    pub log_path: PathBuf,
    pub policy: LedgerPolicy,
}

impl BankConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unset paths fall back to defaults under the data directory. A policy
    /// override that is set but malformed is an error, never silently ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = lookup(DATA_DIR_VAR).map(PathBuf::from).unwrap_or_else(|| {
            tracing::warn!("{DATA_DIR_VAR} not set; using current directory");
            PathBuf::from(".")
        });

        let customers_path = lookup(CUSTOMERS_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("bank.csv"));
        let log_path = lookup(LOG_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("transactions.jsonl"));

        let defaults = LedgerPolicy::default();
        let money = |key: &str, default: Money| -> Result<Money> {
            match lookup(key) {
                Some(raw) => Money::parse(&raw).with_context(|| format!("invalid {key}: {raw:?}")),
                None => Ok(default),
            }
        };

        let policy = LedgerPolicy {
            max_tx_amount: money(MAX_TX_AMOUNT_VAR, defaults.max_tx_amount)?,
            overdraft_fee: money(OVERDRAFT_FEE_VAR, defaults.overdraft_fee)?,
            overdraft_cap_offset: money(OVERDRAFT_CAP_OFFSET_VAR, defaults.overdraft_cap_offset)?,
            deactivate_threshold: match lookup(DEACTIVATE_THRESHOLD_VAR) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid {DEACTIVATE_THRESHOLD_VAR}: {raw:?}"))?,
                None => defaults.deactivate_threshold,
            },
        };

        Ok(Self {
            customers_path,
            log_path,
            policy,
        })
    }
}
