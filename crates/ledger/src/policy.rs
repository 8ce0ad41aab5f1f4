//! Per-transaction limits and overdraft parameters.

use bluesky_core::Money;

/// Largest amount a single withdrawal or transfer may move.
pub const MAX_TX_AMOUNT: Money = Money::dollars(100);

/// Flat fee charged on every overdraft event.
pub const OVERDRAFT_FEE: Money = Money::dollars(35);

/// Cumulative overdraft events (checking + savings) that deactivate a customer.
pub const OVERDRAFT_DEACTIVATE_THRESHOLD: u32 = 3;

/// How far below zero a withdrawal may reach before the fee.
pub const OVERDRAFT_CAP_OFFSET: Money = Money::dollars(65);

/// Tunable ledger rules. `Default` yields the bank's standard policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerPolicy {
    pub max_tx_amount: Money,
    pub overdraft_fee: Money,
    pub deactivate_threshold: u32,
    pub overdraft_cap_offset: Money,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            max_tx_amount: MAX_TX_AMOUNT,
            overdraft_fee: OVERDRAFT_FEE,
            deactivate_threshold: OVERDRAFT_DEACTIVATE_THRESHOLD,
            overdraft_cap_offset: OVERDRAFT_CAP_OFFSET,
        }
    }
}

impl LedgerPolicy {
    /// Maximum withdrawal permitted when it would overdraw (or the account is
    /// already overdrawn): `clamp(balance + cap_offset, 0, max_tx_amount)`.
    pub fn overdraft_cap(&self, balance: Money) -> Money {
        balance
            .saturating_add(self.overdraft_cap_offset)
            .clamp(Money::ZERO, self.max_tx_amount)
    }
}
