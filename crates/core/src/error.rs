//! Domain error taxonomy.
//!
//! Four kinds, matching the four failure classes a caller at the public
//! request surface needs to distinguish (see `status_hint`): malformed
//! input, a missing aggregate, a forbidden state transition or invariant
//! breach, and everything else (store/gateway failure).

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed input (empty required field, out-of-range quantity, bad id).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A requested aggregate does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A forbidden state transition, an over-reservation, an over-release,
    /// or any other domain invariant breach.
    #[error("business rule violation: {0}")]
    BusinessRuleViolation(String),

    /// Event store, repository, or payment gateway failure. Retryable at
    /// the handler boundary where the operation is idempotent.
    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRuleViolation(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    /// The status-code-shaped hint §6 of the spec assigns to each error
    /// kind. Transport is out of scope; this just gives a future adapter
    /// a single place to read the mapping from.
    pub fn status_hint(&self) -> u16 {
        match self {
            DomainError::Validation(_) => 400,
            DomainError::NotFound(_) => 404,
            DomainError::BusinessRuleViolation(_) => 422,
            DomainError::Infrastructure(_) => 500,
        }
    }
}
