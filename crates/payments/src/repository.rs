//! In-memory payment storage.

use std::collections::HashMap;

use async_trait::async_trait;
use orderflow_core::{DomainError, DomainResult, PaymentId};
use tokio::sync::RwLock;

use crate::payment::Payment;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn save(&self, payment: Payment) -> DomainResult<()>;
    async fn find_by_id(&self, payment_id: PaymentId) -> DomainResult<Option<Payment>>;
    async fn mutate(&self, payment_id: PaymentId, f: Box<dyn FnOnce(&mut Payment) -> DomainResult<()> + Send>) -> DomainResult<Payment>;
}

#[derive(Default)]
pub struct InMemoryPaymentRepository {
    payments: RwLock<HashMap<PaymentId, Payment>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self { payments: RwLock::new(HashMap::new()) }
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn save(&self, payment: Payment) -> DomainResult<()> {
        self.payments.write().await.insert(*payment.id(), payment);
        Ok(())
    }

    async fn find_by_id(&self, payment_id: PaymentId) -> DomainResult<Option<Payment>> {
        Ok(self.payments.read().await.get(&payment_id).cloned())
    }

    async fn mutate(
        &self,
        payment_id: PaymentId,
        f: Box<dyn FnOnce(&mut Payment) -> DomainResult<()> + Send>,
    ) -> DomainResult<Payment> {
        let mut guard = self.payments.write().await;
        let payment = guard
            .get_mut(&payment_id)
            .ok_or_else(|| DomainError::not_found(format!("payment {payment_id} not found")))?;
        f(payment)?;
        Ok(payment.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::PaymentMethod;
    use orderflow_core::{AggregateRoot, Money, OrderId};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn save_and_find_round_trip() {
        let repo = InMemoryPaymentRepository::new();
        let payment = Payment::new(
            OrderId::new(),
            Money::new(dec!(10), "USD").unwrap(),
            PaymentMethod::CreditCard { last_four: "4242".into() },
        );
        let id = *payment.id();
        repo.save(payment).await.unwrap();
        assert!(repo.find_by_id(id).await.unwrap().is_some());
    }
}
