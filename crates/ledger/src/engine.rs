//! Ledger engine: deposit, withdraw and transfer against resident accounts.
//!
//! ## Overdraft state machine
//!
//! ```text
//!             overdraft event, cumulative count >= threshold
//!   Active  ────────────────────────────────────────────────▶  Deactivated
//!     ▲                                                            │
//!     └────────────── deposit leaves every balance >= 0 ───────────┘
//!                     (all overdraft counts reset to 0)
//! ```
//!
//! Deactivation and reactivation always apply to *all* of a customer's
//! accounts together. Deactivated accounts reject withdrawals and outgoing
//! transfers; deposits still post.
//!
//! ## Audit
//!
//! Each operation that gets as far as resolving the acting account appends one
//! entry to the transaction log, with status `ok` or `error`. Malformed input
//! (non-positive amount, unknown account) is rejected before that point and is
//! not logged. Overdraft fees and deactivation are successful outcomes.

use chrono::Utc;
use uuid::Uuid;

use bluesky_accounts::{AccountKind, AccountStore, Customer};
use bluesky_core::{BankError, BankResult, CustomerId, Entity, Money};

use crate::log::{AccountDescriptor, Action, EntryStatus, LogEntry, LogError, TransactionLog};
use crate::policy::LedgerPolicy;

/// Destination of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferTarget {
    /// Another account of the acting customer.
    Own(AccountKind),
    /// An account held by a different customer.
    Customer { id: CustomerId, kind: AccountKind },
}

impl TransferTarget {
    fn descriptor(self, from: AccountKind) -> AccountDescriptor {
        match self {
            TransferTarget::Own(to) => AccountDescriptor::Internal { from, to },
            TransferTarget::Customer { id, kind } => AccountDescriptor::External {
                from,
                target: id,
                kind,
            },
        }
    }
}

/// What a successful operation did beyond moving the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Posted,
    /// Overdraft event: fee charged, customer still active.
    FeeApplied,
    /// Overdraft event that pushed the customer over the threshold.
    Deactivated,
    /// Deposit that brought every account back to non-negative.
    Reactivated,
    /// Deposit posted, but some account is still negative.
    StillDeactivated,
}

/// Successful result of a ledger operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Balance of the acting account afterwards.
    pub balance: Money,
    pub fee: Money,
    pub outcome: Outcome,
    pub message: String,
}

/// Audit context captured before an operation runs.
struct Attempt {
    customer_id: CustomerId,
    action: Action,
    account: AccountDescriptor,
    amount: Money,
    prev_balance: Money,
}

impl Attempt {
    fn into_entry(self, result: &BankResult<Receipt>) -> LogEntry {
        let (status, fee, new_balance, message) = match result {
            Ok(receipt) => (
                EntryStatus::Ok,
                receipt.fee,
                receipt.balance,
                receipt.message.clone(),
            ),
            Err(err) => (EntryStatus::Error, Money::ZERO, self.prev_balance, err.reason()),
        };

        LogEntry {
            entry_id: Uuid::now_v7(),
            occurred_at: Utc::now(),
            customer_id: self.customer_id,
            action: self.action,
            account: self.account,
            amount: self.amount,
            fee,
            prev_balance: self.prev_balance,
            new_balance,
            status,
            message,
        }
    }
}

fn ensure_positive(amount: Money) -> BankResult<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(BankError::validation("amount must be positive"))
    }
}

/// Executes balance mutations under a [`LedgerPolicy`] and records them.
///
/// The engine keeps no session state: every call names the acting customer
/// explicitly.
#[derive(Debug)]
pub struct LedgerEngine<L> {
    policy: LedgerPolicy,
    log: L,
}

impl<L> LedgerEngine<L>
where
    L: TransactionLog,
{
    pub fn new(log: L) -> Self {
        Self::with_policy(log, LedgerPolicy::default())
    }

    pub fn with_policy(log: L, policy: LedgerPolicy) -> Self {
        Self { policy, log }
    }

    pub fn policy(&self) -> &LedgerPolicy {
        &self.policy
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    /// Audit entries for a customer, oldest first (`limit` 0 = all).
    pub fn history(&self, customer_id: CustomerId, limit: usize) -> Result<Vec<LogEntry>, LogError> {
        self.log.list_for(customer_id, limit)
    }

    /// Append the audit entry for `attempt` and hand `result` back unchanged.
    ///
    /// A failed append is reported but does not undo the operation.
    fn settle(&self, attempt: Attempt, result: BankResult<Receipt>) -> BankResult<Receipt> {
        match &result {
            Ok(receipt) => tracing::debug!(
                customer_id = %attempt.customer_id,
                action = attempt.action.as_str(),
                account = %attempt.account,
                amount = %attempt.amount,
                balance = %receipt.balance,
                "ledger operation posted"
            ),
            Err(err) => tracing::warn!(
                customer_id = %attempt.customer_id,
                action = attempt.action.as_str(),
                account = %attempt.account,
                amount = %attempt.amount,
                error = %err,
                "ledger operation rejected"
            ),
        }

        let entry = attempt.into_entry(&result);
        if let Err(err) = self.log.append(entry) {
            tracing::warn!(error = %err, "audit log append failed");
        }

        result
    }

    pub fn deposit(
        &self,
        customer: &mut Customer,
        kind: AccountKind,
        amount: Money,
    ) -> BankResult<Receipt> {
        ensure_positive(amount)?;

        let attempt = Attempt {
            customer_id: customer.id(),
            action: Action::Deposit,
            account: AccountDescriptor::Single(kind),
            amount,
            prev_balance: customer.require_account(kind)?.balance(),
        };

        let result = self.apply_deposit(customer, kind, amount);
        self.settle(attempt, result)
    }

    fn apply_deposit(
        &self,
        customer: &mut Customer,
        kind: AccountKind,
        amount: Money,
    ) -> BankResult<Receipt> {
        let was_deactivated = customer.is_deactivated();

        let account = customer.require_account_mut(kind)?;
        account.credit(amount)?;
        let balance = account.balance();

        let outcome = if !was_deactivated {
            Outcome::Posted
        } else if customer.all_balances_non_negative() {
            customer.reactivate_all();
            tracing::info!(customer_id = %customer.id(), "all accounts reactivated");
            Outcome::Reactivated
        } else {
            Outcome::StillDeactivated
        };

        let message = match outcome {
            Outcome::Reactivated => {
                format!("Deposit successful. All accounts reactivated. New balance: {balance}")
            }
            Outcome::StillDeactivated => format!(
                "Deposit successful. Accounts stay deactivated until every balance is non-negative. New balance: {balance}"
            ),
            _ => format!("Deposit successful. New balance: {balance}"),
        };

        Ok(Receipt {
            balance,
            fee: Money::ZERO,
            outcome,
            message,
        })
    }

    pub fn withdraw(
        &self,
        customer: &mut Customer,
        kind: AccountKind,
        amount: Money,
    ) -> BankResult<Receipt> {
        ensure_positive(amount)?;

        let attempt = Attempt {
            customer_id: customer.id(),
            action: Action::Withdraw,
            account: AccountDescriptor::Single(kind),
            amount,
            prev_balance: customer.require_account(kind)?.balance(),
        };

        let result = self.apply_withdraw(customer, kind, amount);
        self.settle(attempt, result)
    }

    fn apply_withdraw(
        &self,
        customer: &mut Customer,
        kind: AccountKind,
        amount: Money,
    ) -> BankResult<Receipt> {
        let policy = self.policy;
        let account = customer.require_account_mut(kind)?;

        if !account.is_active() {
            return Err(BankError::deactivated("account is deactivated"));
        }
        if amount > policy.max_tx_amount {
            return Err(BankError::over_limit(format!(
                "cannot withdraw more than ${} in one transaction",
                policy.max_tx_amount
            )));
        }

        let before = account.balance();
        if before.is_negative() || amount > before {
            let cap = policy.overdraft_cap(before);
            if amount > cap {
                return Err(BankError::over_limit(format!(
                    "overdraft cap: at most ${cap} can be withdrawn"
                )));
            }
        }

        // the fee must fit as well, so nothing is applied half way
        account.balance_after_debit(amount.saturating_add(policy.overdraft_fee))?;
        account.debit(amount)?;

        if !before.is_negative() && !account.balance().is_negative() {
            let balance = account.balance();
            return Ok(Receipt {
                balance,
                fee: Money::ZERO,
                outcome: Outcome::Posted,
                message: format!("Withdraw successful. New balance: {balance}"),
            });
        }

        let fee = policy.overdraft_fee;
        account.record_overdraft(fee)?;
        let balance = account.balance();

        let overdrafts = customer.cumulative_overdrafts();
        if overdrafts >= policy.deactivate_threshold {
            customer.deactivate_all();
            tracing::info!(
                customer_id = %customer.id(),
                overdrafts,
                "overdraft threshold reached, accounts deactivated"
            );
            return Ok(Receipt {
                balance,
                fee,
                outcome: Outcome::Deactivated,
                message: format!(
                    "Overdraft fee ${fee} applied. Account deactivated. New balance: {balance}"
                ),
            });
        }

        Ok(Receipt {
            balance,
            fee,
            outcome: Outcome::FeeApplied,
            message: format!("Overdraft fee ${fee} applied. New balance: {balance}"),
        })
    }

    /// Move `amount` out of the acting customer's `from` account.
    ///
    /// Transfers never overdraw the source. Every check runs before any
    /// balance changes, so a rejected transfer leaves both sides untouched.
    pub fn transfer(
        &self,
        store: &mut AccountStore,
        customer_id: CustomerId,
        from: AccountKind,
        target: TransferTarget,
        amount: Money,
    ) -> BankResult<Receipt> {
        ensure_positive(amount)?;

        let attempt = Attempt {
            customer_id,
            action: Action::Transfer,
            account: target.descriptor(from),
            amount,
            prev_balance: store.get(customer_id)?.require_account(from)?.balance(),
        };

        let result = self.apply_transfer(store, customer_id, from, target, amount);
        self.settle(attempt, result)
    }

    fn apply_transfer(
        &self,
        store: &mut AccountStore,
        customer_id: CustomerId,
        from: AccountKind,
        target: TransferTarget,
        amount: Money,
    ) -> BankResult<Receipt> {
        let source = store.get(customer_id)?.require_account(from)?;

        if !source.is_active() {
            return Err(BankError::deactivated("account is deactivated"));
        }
        if amount > self.policy.max_tx_amount {
            return Err(BankError::over_limit(format!(
                "cannot transfer more than ${} in one transaction",
                self.policy.max_tx_amount
            )));
        }
        if source.balance_after_debit(amount)?.is_negative() {
            return Err(BankError::insufficient_funds(format!(
                "{from} balance {} cannot cover {amount}",
                source.balance()
            )));
        }

        let (owner, to) = match target {
            TransferTarget::Own(to) => {
                if to == from {
                    return Err(BankError::validation("cannot transfer to the same account"));
                }
                store.get(customer_id)?.require_account(to)?;
                (customer_id, to)
            }
            TransferTarget::Customer { id, kind } => {
                if id == customer_id {
                    return Err(BankError::validation(
                        "use an internal transfer between your own accounts",
                    ));
                }
                if !store.get(id)?.has_account(kind) {
                    return Err(BankError::validation(format!(
                        "customer {id} has no {kind} account"
                    )));
                }
                (id, kind)
            }
        };

        store.get(owner)?.require_account(to)?.balance_after_credit(amount)?;

        let source = store.get_mut(customer_id)?.require_account_mut(from)?;
        source.debit(amount)?;
        let balance = source.balance();

        store.get_mut(owner)?.require_account_mut(to)?.credit(amount)?;

        Ok(Receipt {
            balance,
            fee: Money::ZERO,
            outcome: Outcome::Posted,
            message: format!("Transfer successful. New {from} balance: {balance}"),
        })
    }
}
