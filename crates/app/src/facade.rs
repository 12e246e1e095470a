//! `Orchestrator`: the public request surface of §6 — the facade a
//! transport layer would sit behind. Transport itself stays out of scope;
//! every method here is a plain async function over the wired saga
//! services.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use orderflow_core::{Address, AggregateRoot, DomainError, EventId, Money, OrderId};
use orderflow_events::{DomainEvent, EventStore, InMemoryEventBus};
use orderflow_inventory::{Product, ProductRepository};
use orderflow_orders::{Order, OrderFilter, OrderItem};
use orderflow_payments::MockPaymentGateway;
use orderflow_saga::SagaServices;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::OrchestratorConfig;
use crate::error::{OrchestratorError, OrchestratorResult};

/// Result of `place_order`: a thin synchronous acknowledgement. The saga
/// continues asynchronously after this call returns (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderAck {
    pub order_id: OrderId,
    pub status: orderflow_orders::OrderStatus,
    pub total_amount: Money,
    pub created_at: DateTime<Utc>,
}

const DEFAULT_CANCELLATION_REASON: &str = "cancelled by customer";

/// Owns the saga's process-wide wiring and product repository, exposing
/// exactly the request surface named in §6.
pub struct Orchestrator {
    saga: SagaServices<InMemoryEventBus>,
    products: Arc<dyn ProductRepository>,
}

impl Orchestrator {
    /// Builds the default in-memory wiring from `config` and subscribes
    /// every saga listener. Call once per process.
    pub async fn new(config: &OrchestratorConfig) -> Self {
        orderflow_observability::init_with_filter(&config.log_filter);

        let bus = Arc::new(InMemoryEventBus::new());
        let store: Arc<dyn EventStore> = Arc::new(orderflow_events::InMemoryEventStore::new());
        let gateway = Arc::new(MockPaymentGateway::new(config.payment_success_rate));
        let saga = SagaServices::new_in_memory_with_retry_ceiling(bus, store, gateway, config.max_retry_attempts);
        orderflow_saga::register_listeners(&saga).await;

        // The in-memory `ProductRepository` is also the public product
        // surface's backing store (createProduct/getProduct/adjustProductStock).
        let products = saga.products.clone();

        info!(storage_path = %config.storage_path.display(), "orchestrator initialized");
        Self { saga, products }
    }

    pub async fn create_product(&self, sku: &str, name: &str, stock_quantity: i64) -> OrchestratorResult<Product> {
        let product = Product::new(sku, name, stock_quantity)?;
        self.products.create(product.clone()).await?;
        Ok(product)
    }

    pub async fn get_product(&self, sku: &str) -> OrchestratorResult<Product> {
        self.products
            .find_by_sku(sku)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("product with sku {sku} not found")).into())
    }

    pub async fn adjust_product_stock(&self, sku: &str, new_quantity: i64) -> OrchestratorResult<Product> {
        Ok(self.products.adjust_stock(sku, new_quantity).await?)
    }

    pub async fn place_order(
        &self,
        customer_id: impl Into<String>,
        items: Vec<OrderItem>,
        shipping_address: Address,
    ) -> OrchestratorResult<PlaceOrderAck> {
        let order = self.saga.order_service.place_order(customer_id, items, shipping_address).await?;
        Ok(PlaceOrderAck {
            order_id: *order.id(),
            status: order.status(),
            total_amount: order.total_amount(),
            created_at: order.created_at(),
        })
    }

    pub async fn get_order(&self, order_id: OrderId) -> OrchestratorResult<Order> {
        self.saga
            .order_service
            .get(order_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("order {order_id} not found")).into())
    }

    pub async fn list_orders(&self, filter: OrderFilter) -> OrchestratorResult<Vec<Order>> {
        Ok(self.saga.order_service.list(filter).await?)
    }

    pub async fn cancel_order(&self, order_id: OrderId, reason: Option<String>) -> OrchestratorResult<Order> {
        let reason = reason.unwrap_or_else(|| DEFAULT_CANCELLATION_REASON.to_string());
        Ok(self.saga.order_service.cancel(order_id, reason).await?)
    }

    /// `getEvents({orderId?, eventType?})`. With neither filter, returns the
    /// full store (descending by `occurredAt`, matching `find_all`).
    pub async fn get_events(
        &self,
        order_id: Option<OrderId>,
        event_type: Option<&str>,
    ) -> OrchestratorResult<Vec<DomainEvent>> {
        let events = match (order_id, event_type) {
            (Some(order_id), Some(event_type)) => self
                .saga
                .store
                .find_by_aggregate_id(&order_id.to_string())
                .await?
                .into_iter()
                .filter(|e| e.event_type == event_type)
                .collect(),
            (Some(order_id), None) => self.saga.store.find_by_aggregate_id(&order_id.to_string()).await?,
            (None, Some(event_type)) => self.saga.store.find_by_event_type(event_type).await?,
            (None, None) => self.saga.store.find_all().await?,
        };
        Ok(events)
    }

    pub async fn get_event(&self, event_id: EventId) -> OrchestratorResult<DomainEvent> {
        self.saga
            .store
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("event {event_id} not found")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderflow_core::Money;
    use rust_decimal_macros::dec;

    fn address() -> Address {
        Address::new("1 Main St", "City", "ST", "00000", "US").unwrap()
    }

    fn items(sku: &str, qty: i64) -> Vec<OrderItem> {
        vec![OrderItem { sku: sku.to_string(), quantity: qty, unit_price: Money::new(dec!(29.99), "USD").unwrap() }]
    }

    #[tokio::test]
    async fn create_and_get_product_round_trip() {
        let orchestrator = Orchestrator::new(&OrchestratorConfig::default()).await;
        orchestrator.create_product("WIDGET", "Widget", 100).await.unwrap();
        let found = orchestrator.get_product("WIDGET").await.unwrap();
        assert_eq!(found.stock_quantity(), 100);
    }

    #[tokio::test]
    async fn get_missing_product_is_not_found() {
        let orchestrator = Orchestrator::new(&OrchestratorConfig::default()).await;
        let err = orchestrator.get_product("NOPE").await.unwrap_err();
        assert_eq!(err.status_hint(), 404);
    }

    #[tokio::test]
    async fn place_order_acknowledges_synchronously_as_pending() {
        let orchestrator = Orchestrator::new(&OrchestratorConfig::default()).await;
        orchestrator.create_product("WIDGET", "Widget", 100).await.unwrap();

        let ack = orchestrator.place_order("cust-1", items("WIDGET", 5), address()).await.unwrap();
        assert_eq!(ack.status, orderflow_orders::OrderStatus::Pending);

        let events = orchestrator.get_events(Some(ack.order_id), None).await.unwrap();
        assert!(events.iter().any(|e| e.event_type == "orders.order.placed"));
    }

    #[tokio::test]
    async fn cancel_order_without_reason_uses_default() {
        let orchestrator = Orchestrator::new(&OrchestratorConfig::default()).await;
        orchestrator.create_product("WIDGET", "Widget", 100).await.unwrap();
        let ack = orchestrator.place_order("cust-1", items("WIDGET", 1), address()).await.unwrap();

        let cancelled = orchestrator.cancel_order(ack.order_id, None).await.unwrap();
        assert_eq!(cancelled.cancellation_reason(), Some(DEFAULT_CANCELLATION_REASON));
    }
}
