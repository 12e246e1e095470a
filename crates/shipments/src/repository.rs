//! In-memory shipment storage.

use std::collections::HashMap;

use async_trait::async_trait;
use orderflow_core::{AggregateRoot, DomainResult, ShipmentId};
use tokio::sync::RwLock;

use crate::shipment::Shipment;

#[async_trait]
pub trait ShipmentRepository: Send + Sync {
    async fn save(&self, shipment: Shipment) -> DomainResult<()>;
    async fn find_by_id(&self, shipment_id: ShipmentId) -> DomainResult<Option<Shipment>>;
}

#[derive(Default)]
pub struct InMemoryShipmentRepository {
    shipments: RwLock<HashMap<ShipmentId, Shipment>>,
}

impl InMemoryShipmentRepository {
    pub fn new() -> Self {
        Self { shipments: RwLock::new(HashMap::new()) }
    }
}

#[async_trait]
impl ShipmentRepository for InMemoryShipmentRepository {
    async fn save(&self, shipment: Shipment) -> DomainResult<()> {
        self.shipments.write().await.insert(*shipment.id(), shipment);
        Ok(())
    }

    async fn find_by_id(&self, shipment_id: ShipmentId) -> DomainResult<Option<Shipment>> {
        Ok(self.shipments.read().await.get(&shipment_id).cloned())
    }
}
