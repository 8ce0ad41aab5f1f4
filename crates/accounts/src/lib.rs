//! Accounts module: customers, their checking/savings accounts, and the
//! in-memory store that owns them.
//!
//! Pure domain logic only: no IO, no persistence format, no session state.

pub mod account;
pub mod customer;
pub mod store;

pub use account::{Account, AccountKind};
pub use customer::{Customer, NewCustomer};
pub use store::AccountStore;
