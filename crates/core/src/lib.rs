//! `bluesky-core` — banking foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no persistence concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use entity::Entity;
pub use error::{BankError, BankResult};
pub use id::CustomerId;
pub use money::Money;
pub use value_object::ValueObject;
