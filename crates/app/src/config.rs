//! `OrchestratorConfig`: the facade's only environment-derived state.
//!
//! Every field has a default so the facade is constructible with zero
//! environment setup in tests — `OrchestratorConfig::from_env()` only
//! overrides a field when its variable is present and parses.

use std::path::PathBuf;

const ENV_STORAGE_PATH: &str = "ORDERFLOW_STORAGE_PATH";
const ENV_PAYMENT_SUCCESS_RATE: &str = "ORDERFLOW_PAYMENT_SUCCESS_RATE";
const ENV_MAX_RETRY_ATTEMPTS: &str = "ORDERFLOW_MAX_RETRY_ATTEMPTS";
const ENV_LOG_FILTER: &str = "ORDERFLOW_LOG_FILTER";

#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    /// Logical location of the append-only event store / repositories.
    /// Unused by the in-memory implementation; carried so a future
    /// persistent adapter has somewhere to read it from (§6).
    pub storage_path: PathBuf,
    /// Success probability handed to the default `MockPaymentGateway`.
    pub payment_success_rate: f64,
    /// Bounded-retry ceiling named in §3/§4.5, mirrored here so it is a
    /// config knob rather than only the `MAX_RETRY_ATTEMPTS` constant.
    pub max_retry_attempts: u8,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("./data/orderflow"),
            payment_success_rate: 0.9,
            max_retry_attempts: orderflow_payments::MAX_RETRY_ATTEMPTS,
            log_filter: "info".to_string(),
        }
    }
}

impl OrchestratorConfig {
    /// Loads from environment, falling back to [`Default`] field-by-field.
    /// A present-but-unparseable variable is logged and ignored rather
    /// than failing startup.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let storage_path =
            std::env::var(ENV_STORAGE_PATH).map(PathBuf::from).unwrap_or(defaults.storage_path);

        let payment_success_rate = std::env::var(ENV_PAYMENT_SUCCESS_RATE)
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .map(|v| v.clamp(0.0, 1.0))
            .unwrap_or(defaults.payment_success_rate);

        let max_retry_attempts = std::env::var(ENV_MAX_RETRY_ATTEMPTS)
            .ok()
            .and_then(|v| v.parse::<u8>().ok())
            .unwrap_or(defaults.max_retry_attempts);

        let log_filter = std::env::var(ENV_LOG_FILTER).unwrap_or(defaults.log_filter);

        Self { storage_path, payment_success_rate, max_retry_attempts, log_filter }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fully_populated_without_environment() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.payment_success_rate, 0.9);
        assert_eq!(config.max_retry_attempts, orderflow_payments::MAX_RETRY_ATTEMPTS);
    }

    #[test]
    fn from_env_falls_back_to_defaults_when_unset() {
        std::env::remove_var(ENV_PAYMENT_SUCCESS_RATE);
        let config = OrchestratorConfig::from_env();
        assert_eq!(config.payment_success_rate, 0.9);
    }
}
