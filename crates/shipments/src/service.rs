//! `CreateShipmentService`: triggered by `OrderPaid`.

use std::sync::Arc;

use orderflow_core::{AggregateRoot, Address, DomainResult, OrderId};
use orderflow_events::{DomainEvent, EventBus};
use tracing::info;

use crate::events::ShipmentCreated;
use crate::repository::ShipmentRepository;
use crate::shipment::Shipment;

pub struct CreateShipmentService<B: EventBus> {
    shipments: Arc<dyn ShipmentRepository>,
    bus: Arc<B>,
}

impl<B: EventBus> CreateShipmentService<B> {
    pub fn new(shipments: Arc<dyn ShipmentRepository>, bus: Arc<B>) -> Self {
        Self { shipments, bus }
    }

    pub async fn create(&self, order_id: OrderId, shipping_address: Address) -> DomainResult<Shipment> {
        let shipment = Shipment::new(order_id, shipping_address.clone());
        let shipment_id = *shipment.id();
        self.shipments.save(shipment.clone()).await?;

        info!(%order_id, %shipment_id, tracking_number = %shipment.tracking_number(), "shipment created");
        let payload = ShipmentCreated {
            shipment_id,
            order_id,
            tracking_number: shipment.tracking_number().to_string(),
            shipping_address,
        };
        let event = DomainEvent::new(shipment_id, "shipments.shipment", &payload)?;
        self.bus.publish(event).await;
        Ok(shipment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryShipmentRepository;
    use orderflow_events::InMemoryEventBus;

    #[tokio::test]
    async fn create_persists_and_publishes() {
        let shipments = Arc::new(InMemoryShipmentRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let service = CreateShipmentService::new(shipments.clone(), bus);

        let order_id = OrderId::new();
        let address = Address::new("1 Main St", "City", "ST", "00000", "US").unwrap();
        let shipment = service.create(order_id, address).await.unwrap();

        let found = shipments.find_by_id(*shipment.id()).await.unwrap().unwrap();
        assert_eq!(found.order_id(), order_id);
    }
}
