//! `Shipment` aggregate: created PENDING once a paid order is ready to ship,
//! with `dispatch`/`mark_as_delivered` available for standalone use — the
//! saga itself never calls past `CreateShipmentService` (see DESIGN.md,
//! §4.6's "not required by core saga" note).

use chrono::{DateTime, Utc};
use orderflow_core::{Address, AggregateRoot, DomainError, DomainResult, OrderId, ShipmentId};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Pending,
    InTransit,
    Delivered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    id: ShipmentId,
    order_id: OrderId,
    tracking_number: String,
    shipping_address: Address,
    status: ShipmentStatus,
    dispatched_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
    estimated_delivery_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl AggregateRoot for Shipment {
    type Id = ShipmentId;

    fn id(&self) -> &ShipmentId {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Shipment {
    /// Generates a fresh opaque tracking number and an estimated delivery
    /// date of `now + U[3..6]` days.
    pub fn new(order_id: OrderId, shipping_address: Address) -> Self {
        let now = Utc::now();
        let days = rand::thread_rng().gen_range(3..=6);
        Self {
            id: ShipmentId::new(),
            order_id,
            tracking_number: generate_tracking_number(),
            shipping_address,
            status: ShipmentStatus::Pending,
            dispatched_at: None,
            delivered_at: None,
            estimated_delivery_date: now + chrono::Duration::days(days),
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn tracking_number(&self) -> &str {
        &self.tracking_number
    }

    pub fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }

    pub fn status(&self) -> ShipmentStatus {
        self.status
    }

    pub fn dispatched_at(&self) -> Option<DateTime<Utc>> {
        self.dispatched_at
    }

    pub fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.delivered_at
    }

    pub fn estimated_delivery_date(&self) -> DateTime<Utc> {
        self.estimated_delivery_date
    }

    pub fn dispatch(&mut self) -> DomainResult<()> {
        if self.status != ShipmentStatus::Pending {
            return Err(DomainError::business_rule(format!(
                "cannot dispatch shipment {}: status is {:?}",
                self.id, self.status
            )));
        }
        self.status = ShipmentStatus::InTransit;
        self.dispatched_at = Some(Utc::now());
        self.touch();
        Ok(())
    }

    pub fn mark_as_delivered(&mut self) -> DomainResult<()> {
        if self.status != ShipmentStatus::InTransit {
            return Err(DomainError::business_rule(format!(
                "cannot deliver shipment {}: status is {:?}",
                self.id, self.status
            )));
        }
        self.status = ShipmentStatus::Delivered;
        self.delivered_at = Some(Utc::now());
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.version += 1;
    }
}

fn generate_tracking_number() -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..12).map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char).collect();
    format!("TRK{suffix}")
}
