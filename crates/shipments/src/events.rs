//! Event payloads published by the shipments context.

use orderflow_core::{Address, OrderId, ShipmentId};
use orderflow_events::DomainEventPayload;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentCreated {
    pub shipment_id: ShipmentId,
    pub order_id: OrderId,
    pub tracking_number: String,
    pub shipping_address: Address,
}

impl DomainEventPayload for ShipmentCreated {
    fn event_type(&self) -> &'static str {
        "shipments.shipment.created"
    }
}
