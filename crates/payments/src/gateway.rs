//! `PaymentGateway`: the external collaborator `ProcessPaymentService` calls
//! out to. The reference `MockPaymentGateway` simulates network latency and
//! a configurable success rate without any real network call; tests use the
//! deterministic variants below instead.

use std::time::Duration;

use async_trait::async_trait;
use orderflow_core::Money;
use rand::Rng;

use crate::payment::PaymentMethod;

#[derive(Debug, Clone)]
pub struct GatewayOutcome {
    pub success: bool,
    pub transaction_id: Option<String>,
    pub error: Option<String>,
}

impl GatewayOutcome {
    pub fn success(transaction_id: impl Into<String>) -> Self {
        Self { success: true, transaction_id: Some(transaction_id.into()), error: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, transaction_id: None, error: Some(error.into()) }
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn process(&self, amount: Money, method: &PaymentMethod) -> GatewayOutcome;
}

/// Succeeds with probability `success_rate` (clamped to `[0, 1]`) after a
/// fixed simulated-latency delay.
pub struct MockPaymentGateway {
    success_rate: f64,
    simulated_latency: Duration,
}

impl MockPaymentGateway {
    pub fn new(success_rate: f64) -> Self {
        Self { success_rate: success_rate.clamp(0.0, 1.0), simulated_latency: Duration::from_millis(50) }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = latency;
        self
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn process(&self, _amount: Money, _method: &PaymentMethod) -> GatewayOutcome {
        tokio::time::sleep(self.simulated_latency).await;
        let roll: f64 = rand::thread_rng().gen_range(0.0..1.0);
        if roll < self.success_rate {
            GatewayOutcome::success(uuid::Uuid::now_v7().to_string())
        } else {
            GatewayOutcome::failure("payment gateway declined the charge")
        }
    }
}

/// Test double: always succeeds.
pub struct AlwaysSucceedGateway;

#[async_trait]
impl PaymentGateway for AlwaysSucceedGateway {
    async fn process(&self, _amount: Money, _method: &PaymentMethod) -> GatewayOutcome {
        GatewayOutcome::success("test-transaction")
    }
}

/// Test double: always fails.
pub struct AlwaysFailGateway;

#[async_trait]
impl PaymentGateway for AlwaysFailGateway {
    async fn process(&self, _amount: Money, _method: &PaymentMethod) -> GatewayOutcome {
        GatewayOutcome::failure("forced failure for testing")
    }
}

/// Test double: returns a fixed sequence of outcomes, one per call; repeats
/// the last outcome once the script is exhausted.
pub struct ScriptedGateway {
    outcomes: std::sync::Mutex<std::collections::VecDeque<GatewayOutcome>>,
}

impl ScriptedGateway {
    pub fn new(outcomes: Vec<GatewayOutcome>) -> Self {
        Self { outcomes: std::sync::Mutex::new(outcomes.into()) }
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn process(&self, _amount: Money, _method: &PaymentMethod) -> GatewayOutcome {
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.len() > 1 {
            outcomes.pop_front().unwrap()
        } else {
            outcomes.front().cloned().unwrap_or_else(|| GatewayOutcome::failure("script exhausted"))
        }
    }
}
