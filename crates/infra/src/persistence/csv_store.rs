use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use bluesky_accounts::{Account, AccountKind, Customer};
use bluesky_core::{CustomerId, Entity, Money};

use super::{CustomerRepository, StoreError};

const HEADERS: [&str; 10] = [
    "id",
    "first_name",
    "last_name",
    "password",
    "checking_balance",
    "checking_active",
    "checking_overdrafts",
    "savings_balance",
    "savings_active",
    "savings_overdrafts",
];

/// One CSV row: a customer plus the flattened state of both account slots.
///
/// Account columns are kept as raw text so that an empty balance can mean
/// "no such account" and older files (capitalized `True`, missing columns)
/// still load.
#[derive(Debug, Serialize, Deserialize)]
struct CustomerRecord {
    id: u64,
    first_name: String,
    last_name: String,
    password: String,
    #[serde(default)]
    checking_balance: String,
    #[serde(default)]
    checking_active: String,
    #[serde(default)]
    checking_overdrafts: String,
    #[serde(default)]
    savings_balance: String,
    #[serde(default)]
    savings_active: String,
    #[serde(default)]
    savings_overdrafts: String,
}

fn account_columns(account: Option<&Account>) -> (String, String, String) {
    match account {
        Some(a) => (
            a.balance().to_string(),
            a.is_active().to_string(),
            a.overdraft_count().to_string(),
        ),
        None => (String::new(), String::new(), String::new()),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn parse_account(
    row: usize,
    kind: AccountKind,
    balance: &str,
    active: &str,
    overdrafts: &str,
) -> Result<Option<Account>, StoreError> {
    if balance.trim().is_empty() {
        return Ok(None);
    }

    let balance = Money::parse(balance)
        .map_err(|e| StoreError::Corrupt(format!("row {row}: {kind} balance: {}", e.reason())))?;
    let active = parse_flag(active)
        .ok_or_else(|| StoreError::Corrupt(format!("row {row}: {kind} active flag {active:?}")))?;
    let overdrafts = match overdrafts.trim() {
        "" => 0,
        raw => raw.parse::<u32>().map_err(|e| {
            StoreError::Corrupt(format!("row {row}: {kind} overdraft count {raw:?}: {e}"))
        })?,
    };

    Ok(Some(Account::restore(kind, balance, active, overdrafts)))
}

impl CustomerRecord {
    fn from_customer(customer: &Customer) -> Self {
        let (checking_balance, checking_active, checking_overdrafts) =
            account_columns(customer.account(AccountKind::Checking));
        let (savings_balance, savings_active, savings_overdrafts) =
            account_columns(customer.account(AccountKind::Savings));

        Self {
            id: customer.id().get(),
            first_name: customer.first_name().to_string(),
            last_name: customer.last_name().to_string(),
            password: customer.password().to_string(),
            checking_balance,
            checking_active,
            checking_overdrafts,
            savings_balance,
            savings_active,
            savings_overdrafts,
        }
    }

    fn into_customer(self, row: usize) -> Result<Customer, StoreError> {
        let id = CustomerId::new(self.id);
        if id < CustomerId::FIRST {
            return Err(StoreError::Corrupt(format!(
                "row {row}: customer id {id} is below {}",
                CustomerId::FIRST
            )));
        }

        let checking = parse_account(
            row,
            AccountKind::Checking,
            &self.checking_balance,
            &self.checking_active,
            &self.checking_overdrafts,
        )?;
        let savings = parse_account(
            row,
            AccountKind::Savings,
            &self.savings_balance,
            &self.savings_active,
            &self.savings_overdrafts,
        )?;

        Customer::restore(
            id,
            self.first_name,
            self.last_name,
            self.password,
            checking.into_iter().chain(savings),
        )
        .map_err(|e| StoreError::Corrupt(format!("row {row}: {}", e.reason())))
    }
}

/// CSV file holding the full customer snapshot, one row per customer.
///
/// Saves write a sibling `.tmp` file and rename it over the target, so readers
/// only ever see a complete snapshot.
#[derive(Debug, Clone)]
pub struct CsvCustomerRepository {
    path: PathBuf,
}

impl CsvCustomerRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "bank.csv".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CustomerRepository for CsvCustomerRepository {
    fn load_all(&self) -> Result<Vec<Customer>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no customer snapshot yet, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::Reader::from_reader(file);
        let mut customers = Vec::new();
        for (idx, result) in reader.deserialize::<CustomerRecord>().enumerate() {
            // header is line 1
            let row = idx + 2;
            customers.push(result?.into_customer(row)?);
        }

        tracing::debug!(path = %self.path.display(), customers = customers.len(), "customer snapshot loaded");
        Ok(customers)
    }

    fn save_all(&self, customers: &[Customer]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_path();
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&tmp)?;
            writer.write_record(HEADERS)?;
            for customer in customers {
                writer.serialize(CustomerRecord::from_customer(customer))?;
            }
            writer.flush()?;
        }
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), customers = customers.len(), "customer snapshot saved");
        Ok(())
    }
}
