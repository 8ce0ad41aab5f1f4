//! `bluesky-audit <customer-id> [limit]`: print a customer's accounts and
//! their most recent audit entries.

use anyhow::{Context, Result};

use bluesky_core::CustomerId;
use bluesky_infra::{BankConfig, BankService, CsvCustomerRepository, JsonlTransactionLog};

const USAGE: &str = "usage: bluesky-audit <customer-id> [limit]";

fn main() -> Result<()> {
    bluesky_observability::init();

    let mut args = std::env::args().skip(1);
    let customer_id: CustomerId = args.next().context(USAGE)?.parse()?;
    let limit = args
        .next()
        .map(|raw| raw.parse::<usize>())
        .transpose()
        .context("limit must be a non-negative integer")?
        .unwrap_or(0);

    let config = BankConfig::from_env()?;
    let service = BankService::open(
        CsvCustomerRepository::new(&config.customers_path),
        JsonlTransactionLog::new(&config.log_path),
        config.policy,
    )
    .with_context(|| format!("failed to load bank state from {}", config.customers_path.display()))?;

    let customer = service.customer(customer_id)?;
    println!("{} (id {customer_id})", customer.display_name());
    for line in customer.summary_lines() {
        println!("  {line}");
    }

    let history = service.history(customer_id, limit)?;
    if history.is_empty() {
        println!("No transactions.");
        return Ok(());
    }

    println!();
    for entry in history {
        println!(
            "{} {:<8} {:<26} {:>9} fee {:>6} {:>9} -> {:<9} {:<5} {}",
            entry.occurred_at.format("%Y-%m-%d %H:%M:%S"),
            entry.action.as_str(),
            entry.account.to_string(),
            entry.amount.to_string(),
            entry.fee.to_string(),
            entry.prev_balance.to_string(),
            entry.new_balance.to_string(),
            entry.status.as_str(),
            entry.message,
        );
    }

    Ok(())
}
