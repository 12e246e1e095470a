//! Event payloads published by the orders context.

use orderflow_core::{Address, Money, OrderId, PaymentId, ShipmentId};
use orderflow_events::DomainEventPayload;
use serde::{Deserialize, Serialize};

use crate::order::OrderItem;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub customer_id: String,
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    pub total_amount: Money,
}

impl DomainEventPayload for OrderPlaced {
    fn event_type(&self) -> &'static str {
        "orders.order.placed"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfirmed {
    pub order_id: OrderId,
}

impl DomainEventPayload for OrderConfirmed {
    fn event_type(&self) -> &'static str {
        "orders.order.confirmed"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRejected {
    pub order_id: OrderId,
    pub reason: String,
}

impl DomainEventPayload for OrderRejected {
    fn event_type(&self) -> &'static str {
        "orders.order.rejected"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPaid {
    pub order_id: OrderId,
    pub payment_id: PaymentId,
}

impl DomainEventPayload for OrderPaid {
    fn event_type(&self) -> &'static str {
        "orders.order.paid"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPaymentFailed {
    pub order_id: OrderId,
    pub reason: String,
}

impl DomainEventPayload for OrderPaymentFailed {
    fn event_type(&self) -> &'static str {
        "orders.order.payment_failed"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderShipped {
    pub order_id: OrderId,
    pub shipment_id: ShipmentId,
}

impl DomainEventPayload for OrderShipped {
    fn event_type(&self) -> &'static str {
        "orders.order.shipped"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub order_id: OrderId,
    pub reason: String,
}

impl DomainEventPayload for OrderCancelled {
    fn event_type(&self) -> &'static str {
        "orders.order.cancelled"
    }
}
