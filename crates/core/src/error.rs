//! Domain error model.

use thiserror::Error;

/// Result type used across the banking domain layer.
pub type BankResult<T> = Result<T, BankError>;

/// Domain-level error.
///
/// Every rejection a caller can see (bad credentials, unknown customers,
/// malformed input, policy limits, deactivated accounts) is one of these
/// variants. Storage failures live in the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BankError {
    /// Credential mismatch on login.
    #[error("invalid credentials")]
    Auth,

    /// An unknown customer or account was referenced.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed or out-of-policy input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The amount exceeds a per-transaction or overdraft limit.
    #[error("over limit: {0}")]
    OverLimit(String),

    /// The source balance cannot cover the operation.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// The operation targets a deactivated account.
    #[error("account deactivated: {0}")]
    Deactivated(String),
}

impl BankError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn over_limit(msg: impl Into<String>) -> Self {
        Self::OverLimit(msg.into())
    }

    pub fn insufficient_funds(msg: impl Into<String>) -> Self {
        Self::InsufficientFunds(msg.into())
    }

    pub fn deactivated(msg: impl Into<String>) -> Self {
        Self::Deactivated(msg.into())
    }

    /// Human-readable reason without the variant prefix.
    ///
    /// This is what lands in the audit log's `message` column.
    pub fn reason(&self) -> String {
        match self {
            BankError::Auth => "invalid credentials".to_string(),
            BankError::NotFound(msg)
            | BankError::Validation(msg)
            | BankError::OverLimit(msg)
            | BankError::InsufficientFunds(msg)
            | BankError::Deactivated(msg) => msg.clone(),
        }
    }
}
