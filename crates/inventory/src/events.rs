//! Event payloads published by the inventory context.

use orderflow_core::OrderId;
use orderflow_events::DomainEventPayload;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedItem {
    pub sku: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationSummary {
    pub sku: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryReserved {
    pub order_id: OrderId,
    pub reservations: Vec<ReservationSummary>,
}

impl DomainEventPayload for InventoryReserved {
    fn event_type(&self) -> &'static str {
        "inventory.reserved"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryReservationFailed {
    pub order_id: OrderId,
    pub reason: String,
    pub requested_items: Vec<RequestedItem>,
}

impl DomainEventPayload for InventoryReservationFailed {
    fn event_type(&self) -> &'static str {
        "inventory.reservation_failed"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryReleased {
    pub order_id: OrderId,
    pub reservations: Vec<ReservationSummary>,
}

impl DomainEventPayload for InventoryReleased {
    fn event_type(&self) -> &'static str {
        "inventory.released"
    }
}
