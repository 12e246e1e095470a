//! Saga-facing inventory services: `ReserveStockService` (triggered by
//! `OrderPlaced`) and `ReleaseStockService` (triggered by `OrderCancelled`
//! and `OrderPaymentFailed`).

use std::sync::Arc;

use orderflow_core::{DomainResult, Entity, OrderId};
use orderflow_events::{DomainEvent, EventBus};
use tracing::{info, warn};

use crate::events::{InventoryReleased, InventoryReservationFailed, InventoryReserved, RequestedItem, ReservationSummary};
use crate::repository::{ProductRepository, StockReservationRepository};
use crate::reservation::StockReservation;

pub struct OrderItemRequest {
    pub sku: String,
    pub quantity: i64,
}

/// Reserves stock for every line of a placed order, all-or-nothing.
///
/// Pre-checks every line before mutating any of them; if a later line's
/// mutation still fails (a concurrent reserver raced ahead of the
/// pre-check), every line already reserved in this attempt is rolled back
/// so the order-scoped outcome stays all-or-nothing.
pub struct ReserveStockService<B: EventBus> {
    products: Arc<dyn ProductRepository>,
    reservations: Arc<dyn StockReservationRepository>,
    bus: Arc<B>,
}

impl<B: EventBus> ReserveStockService<B> {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        reservations: Arc<dyn StockReservationRepository>,
        bus: Arc<B>,
    ) -> Self {
        Self { products, reservations, bus }
    }

    pub async fn reserve(&self, order_id: OrderId, items: Vec<OrderItemRequest>) -> DomainResult<()> {
        info!(%order_id, item_count = items.len(), "reserving stock for order");

        for item in &items {
            let product = self.products.find_by_sku(&item.sku).await?;
            let can_reserve = product.map(|p| p.can_reserve(item.quantity)).unwrap_or(false);
            if !can_reserve {
                let reason = format!("insufficient or unavailable stock for sku {}", item.sku);
                self.emit_failure(order_id, reason, &items).await;
                return Ok(());
            }
        }

        let mut reserved_skus: Vec<(String, i64)> = Vec::with_capacity(items.len());
        for item in &items {
            match self.products.reserve(&item.sku, item.quantity).await {
                Ok(_) => reserved_skus.push((item.sku.clone(), item.quantity)),
                Err(err) => {
                    warn!(%order_id, sku = %item.sku, error = %err, "reservation raced and lost, rolling back order");
                    for (sku, quantity) in reserved_skus.iter().rev() {
                        let _ = self.products.release(sku, *quantity).await;
                    }
                    self.emit_failure(order_id, err.to_string(), &items).await;
                    return Ok(());
                }
            }
        }

        let mut summaries = Vec::with_capacity(items.len());
        for item in &items {
            let reservation = StockReservation::new(order_id, item.sku.clone(), item.quantity);
            self.reservations.save(reservation).await?;
            summaries.push(ReservationSummary { sku: item.sku.clone(), quantity: item.quantity });
        }

        info!(%order_id, "stock reserved for order");
        let payload = InventoryReserved { order_id, reservations: summaries };
        let event = DomainEvent::new(order_id, "inventory.product", &payload)?;
        self.bus.publish(event).await;
        Ok(())
    }

    async fn emit_failure(&self, order_id: OrderId, reason: String, items: &[OrderItemRequest]) {
        warn!(%order_id, %reason, "inventory reservation failed");
        let requested_items =
            items.iter().map(|i| RequestedItem { sku: i.sku.clone(), quantity: i.quantity }).collect();
        let payload = InventoryReservationFailed { order_id, reason, requested_items };
        match DomainEvent::new(order_id, "inventory.product", &payload) {
            Ok(event) => self.bus.publish(event).await,
            Err(err) => warn!(%order_id, error = %err, "failed to build reservation-failed event"),
        }
    }
}

/// Releases every unreleased reservation for an order. Idempotent: a second
/// call finds nothing left unreleased and emits nothing.
pub struct ReleaseStockService<B: EventBus> {
    products: Arc<dyn ProductRepository>,
    reservations: Arc<dyn StockReservationRepository>,
    bus: Arc<B>,
}

impl<B: EventBus> ReleaseStockService<B> {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        reservations: Arc<dyn StockReservationRepository>,
        bus: Arc<B>,
    ) -> Self {
        Self { products, reservations, bus }
    }

    pub async fn release(&self, order_id: OrderId) -> DomainResult<()> {
        let unreleased = self.reservations.find_unreleased_by_order(order_id).await?;
        if unreleased.is_empty() {
            info!(%order_id, "no unreleased reservations, release is a no-op");
            return Ok(());
        }

        let mut summaries = Vec::with_capacity(unreleased.len());
        for reservation in unreleased {
            self.products.release(reservation.sku(), reservation.quantity()).await?;
            self.reservations.mark_released(*reservation.id()).await?;
            summaries.push(ReservationSummary {
                sku: reservation.sku().to_string(),
                quantity: reservation.quantity(),
            });
        }

        info!(%order_id, released = summaries.len(), "released reserved stock for order");
        let payload = InventoryReleased { order_id, reservations: summaries };
        let event = DomainEvent::new(order_id, "inventory.product", &payload)?;
        self.bus.publish(event).await;
        Ok(())
    }
}
