//! `StockReservation`: a recorded claim on part of a product's stock, tied
//! to the order that requested it. Never modified in place beyond the
//! terminal `released` flag (see DESIGN.md on the resolved `expiresAt`
//! open question: populated in the data model but never set or swept here).

use chrono::{DateTime, Utc};
use orderflow_core::{Entity, OrderId, StockReservationId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockReservation {
    id: StockReservationId,
    order_id: OrderId,
    sku: String,
    quantity: i64,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    released: bool,
}

impl Entity for StockReservation {
    type Id = StockReservationId;

    fn id(&self) -> &StockReservationId {
        &self.id
    }
}

impl StockReservation {
    pub fn new(order_id: OrderId, sku: impl Into<String>, quantity: i64) -> Self {
        Self {
            id: StockReservationId::new(),
            order_id,
            sku: sku.into(),
            quantity,
            created_at: Utc::now(),
            expires_at: None,
            released: false,
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn released(&self) -> bool {
        self.released
    }

    pub fn mark_released(&mut self) {
        self.released = true;
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}
