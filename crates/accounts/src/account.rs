use core::str::FromStr;

use serde::{Deserialize, Serialize};

use bluesky_core::{BankError, BankResult, Money};

/// Account kind. A customer holds at most one account of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
}

impl AccountKind {
    pub const ALL: [AccountKind; 2] = [AccountKind::Checking, AccountKind::Savings];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
        }
    }

    /// Capitalized form used in summaries ("Checking: 100.00").
    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Checking => "Checking",
            AccountKind::Savings => "Savings",
        }
    }
}

impl core::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "checking" => Ok(AccountKind::Checking),
            "savings" => Ok(AccountKind::Savings),
            _ => Err(BankError::validation("invalid account type")),
        }
    }
}

/// A checking or savings account, owned by exactly one customer.
///
/// State changes go through the narrow mutators below; the rules deciding
/// *when* to call them (limits, fees, deactivation) live in the ledger engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    kind: AccountKind,
    balance: Money,
    active: bool,
    overdraft_count: u32,
}

impl Account {
    /// A freshly opened account: active, no overdrafts.
    pub fn open(kind: AccountKind, initial_balance: Money) -> Self {
        Self {
            kind,
            balance: initial_balance,
            active: true,
            overdraft_count: 0,
        }
    }

    /// Rebuild an account from persisted state.
    pub fn restore(kind: AccountKind, balance: Money, active: bool, overdraft_count: u32) -> Self {
        Self {
            kind,
            balance,
            active,
            overdraft_count,
        }
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn overdraft_count(&self) -> u32 {
        self.overdraft_count
    }

    /// Balance after crediting `amount`, without applying it.
    pub fn balance_after_credit(&self, amount: Money) -> BankResult<Money> {
        self.balance
            .checked_add(amount)
            .ok_or_else(|| self.out_of_range())
    }

    /// Balance after debiting `amount`, without applying it.
    pub fn balance_after_debit(&self, amount: Money) -> BankResult<Money> {
        self.balance
            .checked_sub(amount)
            .ok_or_else(|| self.out_of_range())
    }

    /// Leaves the balance untouched when the result would not be representable.
    pub fn credit(&mut self, amount: Money) -> BankResult<()> {
        self.balance = self.balance_after_credit(amount)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: Money) -> BankResult<()> {
        self.balance = self.balance_after_debit(amount)?;
        Ok(())
    }

    /// Charge an overdraft fee and count the event against this account.
    pub fn record_overdraft(&mut self, fee: Money) -> BankResult<()> {
        self.debit(fee)?;
        self.overdraft_count += 1;
        Ok(())
    }

    fn out_of_range(&self) -> BankError {
        BankError::over_limit(format!(
            "{} balance would exceed the supported range",
            self.kind
        ))
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Back to active with a clean overdraft history.
    pub fn reactivate(&mut self) {
        self.active = true;
        self.overdraft_count = 0;
    }

    /// One-line summary, e.g. `Checking: -65.00 | inactive, overdrafts=3`.
    ///
    /// The status suffix only appears once something is worth flagging.
    pub fn summary(&self) -> String {
        let mut line = format!("{}: {}", self.kind.label(), self.balance);
        if !self.active || self.overdraft_count > 0 {
            let status = if self.active { "active" } else { "inactive" };
            line.push_str(&format!(" | {status}, overdrafts={}", self.overdraft_count));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Checking".parse::<AccountKind>().unwrap(), AccountKind::Checking);
        assert_eq!(" savings ".parse::<AccountKind>().unwrap(), AccountKind::Savings);
        assert_eq!(
            "brokerage".parse::<AccountKind>().unwrap_err(),
            BankError::validation("invalid account type")
        );
    }

    #[test]
    fn opened_account_is_active_and_clean() {
        let acc = Account::open(AccountKind::Savings, Money::dollars(50));
        assert!(acc.is_active());
        assert_eq!(acc.overdraft_count(), 0);
        assert_eq!(acc.balance(), Money::dollars(50));
    }

    #[test]
    fn overdraft_charges_fee_and_counts() {
        let mut acc = Account::open(AccountKind::Checking, Money::dollars(10));
        acc.debit(Money::dollars(20)).unwrap();
        acc.record_overdraft(Money::dollars(35)).unwrap();
        assert_eq!(acc.balance(), Money::dollars(-45));
        assert_eq!(acc.overdraft_count(), 1);
    }

    #[test]
    fn out_of_range_credit_leaves_balance_untouched() {
        let huge = Money::parse("50000000000000000").unwrap();
        let mut acc = Account::open(AccountKind::Checking, huge);

        let err = acc.credit(huge).unwrap_err();
        assert_eq!(
            err,
            BankError::over_limit("checking balance would exceed the supported range")
        );
        assert_eq!(acc.balance(), huge);

        let mut low = Account::restore(AccountKind::Savings, Money::from_cents(i64::MIN + 10), true, 0);
        assert!(low.record_overdraft(Money::dollars(35)).is_err());
        assert_eq!(low.balance(), Money::from_cents(i64::MIN + 10));
        assert_eq!(low.overdraft_count(), 0);
    }

    #[test]
    fn reactivate_resets_overdrafts() {
        let mut acc = Account::restore(AccountKind::Checking, Money::ZERO, false, 3);
        acc.reactivate();
        assert!(acc.is_active());
        assert_eq!(acc.overdraft_count(), 0);
    }

    #[test]
    fn summary_flags_only_notable_accounts() {
        let clean = Account::open(AccountKind::Checking, Money::dollars(100));
        assert_eq!(clean.summary(), "Checking: 100.00");

        let flagged = Account::restore(AccountKind::Savings, Money::from_cents(-6500), false, 3);
        assert_eq!(flagged.summary(), "Savings: -65.00 | inactive, overdrafts=3");
    }
}
