use bluesky_core::{BankError, BankResult, CustomerId, Entity, Money};

use crate::account::{Account, AccountKind};

/// Registration request for a new customer.
///
/// Each account is opened only if an initial balance is given for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub checking: Option<Money>,
    pub savings: Option<Money>,
}

impl NewCustomer {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            password: password.into(),
            checking: None,
            savings: None,
        }
    }

    pub fn with_checking(mut self, initial_balance: Money) -> Self {
        self.checking = Some(initial_balance);
        self
    }

    pub fn with_savings(mut self, initial_balance: Money) -> Self {
        self.savings = Some(initial_balance);
        self
    }
}

/// A bank customer and the (at most two) accounts they own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id: CustomerId,
    first_name: String,
    last_name: String,
    password: String,
    checking: Option<Account>,
    savings: Option<Account>,
}

impl Customer {
    pub(crate) fn register(id: CustomerId, request: NewCustomer) -> Self {
        Self {
            id,
            first_name: request.first_name,
            last_name: request.last_name,
            password: request.password,
            checking: request
                .checking
                .map(|balance| Account::open(AccountKind::Checking, balance)),
            savings: request
                .savings
                .map(|balance| Account::open(AccountKind::Savings, balance)),
        }
    }

    /// Rebuild a customer from persisted state.
    ///
    /// Fails if two accounts of the same kind are supplied.
    pub fn restore(
        id: CustomerId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password: impl Into<String>,
        accounts: impl IntoIterator<Item = Account>,
    ) -> BankResult<Self> {
        let mut customer = Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            password: password.into(),
            checking: None,
            savings: None,
        };

        for account in accounts {
            let slot = customer.slot_mut(account.kind());
            if slot.is_some() {
                return Err(BankError::validation(format!(
                    "customer {id} has more than one {} account",
                    account.kind()
                )));
            }
            *slot = Some(account);
        }

        Ok(customer)
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Stored credential, needed by the persistence layer only.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Flat equality check; credentials are not hashed in this system.
    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    fn slot(&self, kind: AccountKind) -> &Option<Account> {
        match kind {
            AccountKind::Checking => &self.checking,
            AccountKind::Savings => &self.savings,
        }
    }

    fn slot_mut(&mut self, kind: AccountKind) -> &mut Option<Account> {
        match kind {
            AccountKind::Checking => &mut self.checking,
            AccountKind::Savings => &mut self.savings,
        }
    }

    pub fn account(&self, kind: AccountKind) -> Option<&Account> {
        self.slot(kind).as_ref()
    }

    pub fn account_mut(&mut self, kind: AccountKind) -> Option<&mut Account> {
        self.slot_mut(kind).as_mut()
    }

    /// Like [`Customer::account`], but a missing account is a `NotFound` error.
    pub fn require_account(&self, kind: AccountKind) -> BankResult<&Account> {
        self.account(kind)
            .ok_or_else(|| BankError::not_found(format!("no {kind} account")))
    }

    pub fn require_account_mut(&mut self, kind: AccountKind) -> BankResult<&mut Account> {
        self.account_mut(kind)
            .ok_or_else(|| BankError::not_found(format!("no {kind} account")))
    }

    pub fn has_account(&self, kind: AccountKind) -> bool {
        self.slot(kind).is_some()
    }

    /// Accounts in checking, savings order.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.checking.iter().chain(self.savings.iter())
    }

    pub fn accounts_mut(&mut self) -> impl Iterator<Item = &mut Account> {
        self.checking.iter_mut().chain(self.savings.iter_mut())
    }

    /// Kinds this customer could still open.
    pub fn missing_kinds(&self) -> Vec<AccountKind> {
        AccountKind::ALL
            .into_iter()
            .filter(|kind| !self.has_account(*kind))
            .collect()
    }

    /// Open a new, empty account of `kind`.
    ///
    /// A deactivated customer's new account starts deactivated too, so every
    /// account of the customer shares one state.
    pub fn open_account(&mut self, kind: AccountKind) -> BankResult<&Account> {
        if self.checking.is_some() && self.savings.is_some() {
            return Err(BankError::validation("you already have both accounts"));
        }

        if self.has_account(kind) {
            return Err(BankError::validation(format!("{kind} account already exists")));
        }

        let active = !self.is_deactivated();
        let account: &Account = self.slot_mut(kind).insert(Account::restore(kind, Money::ZERO, active, 0));
        Ok(account)
    }

    /// Sum of overdraft events across checking and savings.
    pub fn cumulative_overdrafts(&self) -> u32 {
        self.accounts().map(Account::overdraft_count).sum()
    }

    /// A customer is deactivated as soon as any of their accounts is.
    pub fn is_deactivated(&self) -> bool {
        self.accounts().any(|a| !a.is_active())
    }

    pub fn all_balances_non_negative(&self) -> bool {
        self.accounts().all(|a| !a.balance().is_negative())
    }

    pub fn deactivate_all(&mut self) {
        self.accounts_mut().for_each(Account::deactivate);
    }

    pub fn reactivate_all(&mut self) {
        self.accounts_mut().for_each(Account::reactivate);
    }

    /// Account summary lines, `N/A` for kinds not held.
    pub fn summary_lines(&self) -> Vec<String> {
        AccountKind::ALL
            .into_iter()
            .map(|kind| match self.account(kind) {
                Some(account) => account.summary(),
                None => format!("{}: N/A", kind.label()),
            })
            .collect()
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> CustomerId {
        self.id
    }
}
