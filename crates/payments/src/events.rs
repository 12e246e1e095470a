//! Event payloads published by the payments context.

use orderflow_core::{Money, OrderId, PaymentId};
use orderflow_events::DomainEventPayload;
use serde::{Deserialize, Serialize};

use crate::payment::PaymentMethod;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentProcessed {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub amount: Money,
    pub payment_method: PaymentMethod,
}

impl DomainEventPayload for PaymentProcessed {
    fn event_type(&self) -> &'static str {
        "payments.payment.processed"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentFailed {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub reason: String,
}

impl DomainEventPayload for PaymentFailed {
    fn event_type(&self) -> &'static str {
        "payments.payment.failed"
    }
}
