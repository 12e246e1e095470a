//! `OrchestratorError`: the facade's unified error type, matching the
//! teacher's `dispatch_error_to_response` idiom of one table mapping every
//! failure kind to a status-code-shaped hint.

use orderflow_core::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Heterogeneous failures aggregated at the facade boundary (the only
    /// place `anyhow` is used, per §1's ambient-stack note).
    #[error("orchestrator failure: {0}")]
    Other(#[from] anyhow::Error),
}

impl OrchestratorError {
    /// See §6's error-code table: not-found -> 404, validation -> 400,
    /// business-rule violation -> 422, everything else -> 500.
    pub fn status_hint(&self) -> u16 {
        match self {
            OrchestratorError::Domain(err) => err.status_hint(),
            OrchestratorError::Other(_) => 500,
        }
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
