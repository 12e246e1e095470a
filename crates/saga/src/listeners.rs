//! Individual saga-table listeners (§4.7). Each one deserializes the event
//! payload it cares about and drives exactly one downstream service call;
//! failures are returned as `anyhow::Error` so the bus can log-and-swallow
//! per subscriber, never blocking sibling handlers of the same event.

use std::sync::Arc;

use async_trait::async_trait;
use orderflow_events::{DomainEvent, EventBus, EventHandler, EventStore};
use orderflow_inventory::{OrderItemRequest, ReleaseStockService, ReserveStockService};
use orderflow_orders::{OrderPaid, OrderService};
use orderflow_payments::{PaymentMethod, ProcessPaymentService};
use orderflow_shipments::CreateShipmentService;
use tracing::{info, warn};

/// Placeholder payment instrument: capturing a real one is out of scope
/// (§1 excludes credential issuance/authentication from this core).
fn default_payment_method() -> PaymentMethod {
    PaymentMethod::CreditCard { last_four: "0000".to_string() }
}

pub struct EventStoreRecorder {
    pub store: Arc<dyn EventStore>,
}

#[async_trait]
impl EventHandler for EventStoreRecorder {
    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
        self.store.save(event.clone()).await?;
        Ok(())
    }
}

pub struct ReserveOnOrderPlaced<B: EventBus> {
    pub service: Arc<ReserveStockService<B>>,
}

#[async_trait]
impl<B: EventBus + 'static> EventHandler for ReserveOnOrderPlaced<B> {
    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
        let payload: orderflow_orders::OrderPlaced = event.payload_as()?;
        let items = payload
            .items
            .iter()
            .map(|item| OrderItemRequest { sku: item.sku.clone(), quantity: item.quantity })
            .collect();
        self.service.reserve(payload.order_id, items).await?;
        Ok(())
    }
}

pub struct ConfirmOnInventoryReserved<B: EventBus> {
    pub orders: Arc<OrderService<B>>,
}

#[async_trait]
impl<B: EventBus + 'static> EventHandler for ConfirmOnInventoryReserved<B> {
    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
        let payload: orderflow_inventory::InventoryReserved = event.payload_as()?;
        self.orders.confirm(payload.order_id).await?;
        Ok(())
    }
}

pub struct RejectOnInventoryReservationFailed<B: EventBus> {
    pub orders: Arc<OrderService<B>>,
}

#[async_trait]
impl<B: EventBus + 'static> EventHandler for RejectOnInventoryReservationFailed<B> {
    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
        let payload: orderflow_inventory::InventoryReservationFailed = event.payload_as()?;
        self.orders.reject(payload.order_id, payload.reason).await?;
        Ok(())
    }
}

pub struct ProcessPaymentOnOrderConfirmed<B: EventBus> {
    pub orders: Arc<OrderService<B>>,
    pub payments: Arc<ProcessPaymentService<B>>,
}

#[async_trait]
impl<B: EventBus + 'static> EventHandler for ProcessPaymentOnOrderConfirmed<B> {
    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
        let payload: orderflow_orders::OrderConfirmed = event.payload_as()?;
        let order = self
            .orders
            .get(payload.order_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("order {} not found for payment processing", payload.order_id))?;
        self.payments.process(payload.order_id, order.total_amount(), default_payment_method()).await?;
        Ok(())
    }
}

pub struct MarkPaidOnPaymentProcessed<B: EventBus> {
    pub orders: Arc<OrderService<B>>,
}

#[async_trait]
impl<B: EventBus + 'static> EventHandler for MarkPaidOnPaymentProcessed<B> {
    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
        let payload: orderflow_payments::PaymentProcessed = event.payload_as()?;
        self.orders.mark_as_paid(payload.order_id, payload.payment_id).await?;
        Ok(())
    }
}

pub struct MarkPaymentFailedOnPaymentFailed<B: EventBus> {
    pub orders: Arc<OrderService<B>>,
}

#[async_trait]
impl<B: EventBus + 'static> EventHandler for MarkPaymentFailedOnPaymentFailed<B> {
    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
        let payload: orderflow_payments::PaymentFailed = event.payload_as()?;
        self.orders.mark_payment_failed(payload.order_id, payload.reason).await?;
        Ok(())
    }
}

pub struct CreateShipmentOnOrderPaid<B: EventBus> {
    pub orders: Arc<OrderService<B>>,
    pub shipments: Arc<CreateShipmentService<B>>,
}

#[async_trait]
impl<B: EventBus + 'static> EventHandler for CreateShipmentOnOrderPaid<B> {
    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
        let payload: OrderPaid = event.payload_as()?;
        let order = self
            .orders
            .get(payload.order_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("order {} not found for shipment creation", payload.order_id))?;
        self.shipments.create(payload.order_id, order.shipping_address().clone()).await?;
        Ok(())
    }
}

pub struct ReleaseOnOrderPaymentFailed<B: EventBus> {
    pub service: Arc<ReleaseStockService<B>>,
}

#[async_trait]
impl<B: EventBus + 'static> EventHandler for ReleaseOnOrderPaymentFailed<B> {
    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
        let payload: orderflow_orders::OrderPaymentFailed = event.payload_as()?;
        self.service.release(payload.order_id).await?;
        Ok(())
    }
}

pub struct MarkShippedOnShipmentCreated<B: EventBus> {
    pub orders: Arc<OrderService<B>>,
}

#[async_trait]
impl<B: EventBus + 'static> EventHandler for MarkShippedOnShipmentCreated<B> {
    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
        let payload: orderflow_shipments::ShipmentCreated = event.payload_as()?;
        self.orders.mark_as_shipped(payload.order_id, payload.shipment_id).await?;
        Ok(())
    }
}

pub struct ReleaseOnOrderCancelled<B: EventBus> {
    pub service: Arc<ReleaseStockService<B>>,
}

#[async_trait]
impl<B: EventBus + 'static> EventHandler for ReleaseOnOrderCancelled<B> {
    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
        let payload: orderflow_orders::OrderCancelled = event.payload_as()?;
        self.service.release(payload.order_id).await?;
        Ok(())
    }
}

/// Thin wrapper so listener construction sites read `info!`/`warn!` the way
/// the rest of the saga-facing services log handler entry/exit (§4.7).
pub fn log_registration(event_type: &str, subscriber: &str) {
    info!(event_type, subscriber, "saga listener registered");
}

pub fn log_unused(event_type: &str) {
    warn!(event_type, "event type has no behavioral subscriber beyond the event store");
}
