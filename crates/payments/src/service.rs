//! `ProcessPaymentService`: triggered by `OrderConfirmed`, drives a
//! `Payment` through the gateway call and emits the outcome.

use std::sync::Arc;

use orderflow_core::{AggregateRoot, DomainResult, Money, OrderId};
use orderflow_events::{DomainEvent, EventBus};
use tracing::{info, warn};

use crate::events::{PaymentFailed, PaymentProcessed};
use crate::gateway::PaymentGateway;
use crate::payment::{Payment, PaymentMethod, MAX_RETRY_ATTEMPTS};
use crate::repository::PaymentRepository;

pub struct ProcessPaymentService<B: EventBus> {
    payments: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
    bus: Arc<B>,
    max_attempts: u8,
}

impl<B: EventBus> ProcessPaymentService<B> {
    pub fn new(payments: Arc<dyn PaymentRepository>, gateway: Arc<dyn PaymentGateway>, bus: Arc<B>) -> Self {
        Self::with_max_attempts(payments, gateway, bus, MAX_RETRY_ATTEMPTS)
    }

    /// Same as [`Self::new`] but with a caller-supplied retry ceiling
    /// (§1's ambient-stack requirement that it be configurable rather than
    /// a hardcoded constant).
    pub fn with_max_attempts(
        payments: Arc<dyn PaymentRepository>,
        gateway: Arc<dyn PaymentGateway>,
        bus: Arc<B>,
        max_attempts: u8,
    ) -> Self {
        Self { payments, gateway, bus, max_attempts }
    }

    /// Drives the gateway call, retrying in place (FAILED -> PENDING ->
    /// PROCESSING) up to `max_attempts` before giving up and emitting
    /// `PaymentFailed`.
    pub async fn process(
        &self,
        order_id: OrderId,
        amount: Money,
        payment_method: PaymentMethod,
    ) -> DomainResult<()> {
        let mut payment = Payment::new(order_id, amount, payment_method.clone());
        payment.start_processing()?;
        let payment_id = *payment.id();
        self.payments.save(payment).await?;

        loop {
            info!(%order_id, %payment_id, "processing payment");
            let outcome = self.gateway.process(amount, &payment_method).await;

            if outcome.success {
                self.payments.mutate(payment_id, Box::new(|p| p.mark_succeeded())).await?;
                info!(%order_id, %payment_id, "payment succeeded");
                let payload = PaymentProcessed { payment_id, order_id, amount, payment_method };
                let event = DomainEvent::new(payment_id, "payments.payment", &payload)?;
                self.bus.publish(event).await;
                return Ok(());
            }

            let reason = outcome.error.unwrap_or_else(|| "payment declined".to_string());
            self.payments
                .mutate(payment_id, Box::new({
                    let reason = reason.clone();
                    move |p| p.mark_failed(reason)
                }))
                .await?;
            warn!(%order_id, %payment_id, %reason, "payment attempt failed");

            let max_attempts = self.max_attempts;
            let retried = self.payments.mutate(payment_id, Box::new(move |p| p.retry(max_attempts))).await;
            match retried {
                Ok(_) => {
                    self.payments.mutate(payment_id, Box::new(|p| p.start_processing())).await?;
                    continue;
                }
                Err(_) => {
                    warn!(%order_id, %payment_id, %reason, "payment failed, retries exhausted");
                    let payload = PaymentFailed { payment_id, order_id, reason };
                    let event = DomainEvent::new(payment_id, "payments.payment", &payload)?;
                    self.bus.publish(event).await;
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{AlwaysFailGateway, AlwaysSucceedGateway, GatewayOutcome, ScriptedGateway};
    use crate::repository::InMemoryPaymentRepository;
    use orderflow_core::OrderId;
    use orderflow_events::InMemoryEventBus;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn process_marks_payment_succeeded_on_gateway_success() {
        let payments = Arc::new(InMemoryPaymentRepository::new());
        let gateway = Arc::new(AlwaysSucceedGateway);
        let bus = Arc::new(InMemoryEventBus::new());
        let service = ProcessPaymentService::new(payments.clone(), gateway, bus);

        let order_id = OrderId::new();
        let amount = Money::new(dec!(29.99), "USD").unwrap();
        let method = PaymentMethod::CreditCard { last_four: "4242".into() };
        service.process(order_id, amount, method).await.unwrap();
    }

    #[tokio::test]
    async fn process_marks_payment_failed_on_gateway_failure() {
        let payments = Arc::new(InMemoryPaymentRepository::new());
        let gateway = Arc::new(AlwaysFailGateway);
        let bus = Arc::new(InMemoryEventBus::new());
        let service = ProcessPaymentService::new(payments.clone(), gateway, bus);

        let order_id = OrderId::new();
        let amount = Money::new(dec!(29.99), "USD").unwrap();
        let method = PaymentMethod::CreditCard { last_four: "4242".into() };
        service.process(order_id, amount, method).await.unwrap();
    }

    struct RecordingHandler {
        event_types: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl orderflow_events::EventHandler for RecordingHandler {
        async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
            self.event_types.lock().unwrap().push(event.event_type.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn process_retries_in_place_until_the_configured_ceiling_then_succeeds() {
        let payments = Arc::new(InMemoryPaymentRepository::new());
        let gateway = Arc::new(ScriptedGateway::new(vec![
            GatewayOutcome::failure("declined"),
            GatewayOutcome::failure("declined"),
            GatewayOutcome::success("tx-1"),
        ]));
        let bus = Arc::new(InMemoryEventBus::new());
        let recorder = Arc::new(RecordingHandler { event_types: std::sync::Mutex::new(Vec::new()) });
        bus.subscribe("payments.payment.processed", recorder.clone()).await;
        bus.subscribe("payments.payment.failed", recorder.clone()).await;

        let service = ProcessPaymentService::with_max_attempts(payments, gateway, bus, 3);
        let order_id = OrderId::new();
        let amount = Money::new(dec!(29.99), "USD").unwrap();
        let method = PaymentMethod::CreditCard { last_four: "4242".into() };
        service.process(order_id, amount, method).await.unwrap();

        let recorded = recorder.event_types.lock().unwrap().clone();
        assert_eq!(recorded, vec!["payments.payment.processed".to_string()]);
    }

    #[tokio::test]
    async fn process_gives_up_and_emits_failed_once_ceiling_is_exhausted() {
        let payments = Arc::new(InMemoryPaymentRepository::new());
        let gateway = Arc::new(AlwaysFailGateway);
        let bus = Arc::new(InMemoryEventBus::new());
        let recorder = Arc::new(RecordingHandler { event_types: std::sync::Mutex::new(Vec::new()) });
        bus.subscribe("payments.payment.failed", recorder.clone()).await;

        let service = ProcessPaymentService::with_max_attempts(payments, gateway, bus, 2);
        let order_id = OrderId::new();
        let amount = Money::new(dec!(29.99), "USD").unwrap();
        let method = PaymentMethod::CreditCard { last_four: "4242".into() };
        service.process(order_id, amount, method).await.unwrap();

        let recorded = recorder.event_types.lock().unwrap().clone();
        assert_eq!(recorded, vec!["payments.payment.failed".to_string()]);
    }
}
