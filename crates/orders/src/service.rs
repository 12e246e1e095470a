//! `OrderService`: the only thing that mutates `Order`s. Used directly by
//! the public request surface (`place_order`, `cancel`) and by saga
//! listeners reacting to inventory/payment/shipment events.

use std::sync::Arc;

use orderflow_core::{Address, AggregateRoot, DomainResult, OrderId, PaymentId, ShipmentId};
use orderflow_events::{DomainEvent, EventBus};
use tracing::info;

use crate::events::{
    OrderCancelled, OrderConfirmed, OrderPaid, OrderPaymentFailed, OrderPlaced, OrderRejected, OrderShipped,
};
use crate::order::{Order, OrderItem};
use crate::repository::{OrderFilter, OrderRepository};

pub struct OrderService<B: EventBus> {
    orders: Arc<dyn OrderRepository>,
    bus: Arc<B>,
}

impl<B: EventBus> OrderService<B> {
    pub fn new(orders: Arc<dyn OrderRepository>, bus: Arc<B>) -> Self {
        Self { orders, bus }
    }

    pub async fn place_order(
        &self,
        customer_id: impl Into<String>,
        items: Vec<OrderItem>,
        shipping_address: Address,
    ) -> DomainResult<Order> {
        let order = Order::new(customer_id, items.clone(), shipping_address.clone())?;
        self.orders.save(order.clone()).await?;
        info!(order_id = %order.id(), "order placed");

        let payload = OrderPlaced {
            order_id: *order.id(),
            customer_id: order.customer_id().to_string(),
            items,
            shipping_address,
            total_amount: order.total_amount(),
        };
        let event = DomainEvent::new(*order.id(), "orders.order", &payload)?;
        self.bus.publish(event).await;
        Ok(order)
    }

    pub async fn confirm(&self, order_id: OrderId) -> DomainResult<()> {
        self.orders.mutate(order_id, Box::new(|o| o.confirm())).await?;
        let payload = OrderConfirmed { order_id };
        let event = DomainEvent::new(order_id, "orders.order", &payload)?;
        self.bus.publish(event).await;
        Ok(())
    }

    pub async fn reject(&self, order_id: OrderId, reason: impl Into<String>) -> DomainResult<()> {
        let reason = reason.into();
        self.orders.mutate(order_id, Box::new({
            let reason = reason.clone();
            move |o| o.reject(reason)
        })).await?;
        let payload = OrderRejected { order_id, reason };
        let event = DomainEvent::new(order_id, "orders.order", &payload)?;
        self.bus.publish(event).await;
        Ok(())
    }

    pub async fn mark_as_paid(&self, order_id: OrderId, payment_id: PaymentId) -> DomainResult<()> {
        self.orders.mutate(order_id, Box::new(move |o| o.mark_as_paid(payment_id))).await?;
        let payload = OrderPaid { order_id, payment_id };
        let event = DomainEvent::new(order_id, "orders.order", &payload)?;
        self.bus.publish(event).await;
        Ok(())
    }

    pub async fn mark_payment_failed(&self, order_id: OrderId, reason: impl Into<String>) -> DomainResult<()> {
        let reason = reason.into();
        self.orders.mutate(order_id, Box::new({
            let reason = reason.clone();
            move |o| o.mark_payment_failed(reason)
        })).await?;
        let payload = OrderPaymentFailed { order_id, reason };
        let event = DomainEvent::new(order_id, "orders.order", &payload)?;
        self.bus.publish(event).await;
        Ok(())
    }

    pub async fn mark_as_shipped(&self, order_id: OrderId, shipment_id: ShipmentId) -> DomainResult<()> {
        self.orders.mutate(order_id, Box::new(move |o| o.mark_as_shipped(shipment_id))).await?;
        let payload = OrderShipped { order_id, shipment_id };
        let event = DomainEvent::new(order_id, "orders.order", &payload)?;
        self.bus.publish(event).await;
        Ok(())
    }

    pub async fn cancel(&self, order_id: OrderId, reason: impl Into<String>) -> DomainResult<Order> {
        let reason = reason.into();
        let order = self
            .orders
            .mutate(order_id, Box::new({
                let reason = reason.clone();
                move |o| o.cancel(reason)
            }))
            .await?;
        let payload = OrderCancelled { order_id, reason };
        let event = DomainEvent::new(order_id, "orders.order", &payload)?;
        self.bus.publish(event).await;
        Ok(order)
    }

    pub async fn get(&self, order_id: OrderId) -> DomainResult<Option<Order>> {
        self.orders.find_by_id(order_id).await
    }

    pub async fn list(&self, filter: OrderFilter) -> DomainResult<Vec<Order>> {
        self.orders.list(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryOrderRepository;
    use orderflow_core::Money;
    use orderflow_events::InMemoryEventBus;
    use rust_decimal_macros::dec;

    fn address() -> Address {
        Address::new("1 Main St", "City", "ST", "00000", "US").unwrap()
    }

    fn items() -> Vec<OrderItem> {
        vec![OrderItem { sku: "W".into(), quantity: 1, unit_price: Money::new(dec!(10), "USD").unwrap() }]
    }

    #[tokio::test]
    async fn place_order_persists_and_publishes() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let service = OrderService::new(repo.clone(), bus);

        let order = service.place_order("cust-1", items(), address()).await.unwrap();
        let found = service.get(*order.id()).await.unwrap().unwrap();
        assert_eq!(found.status(), crate::order::OrderStatus::Pending);
    }

    #[tokio::test]
    async fn full_lifecycle_through_service() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let service = OrderService::new(repo, bus);

        let order = service.place_order("cust-1", items(), address()).await.unwrap();
        let order_id = *order.id();
        service.confirm(order_id).await.unwrap();
        service.mark_as_paid(order_id, PaymentId::new()).await.unwrap();
        service.mark_as_shipped(order_id, ShipmentId::new()).await.unwrap();

        let found = service.get(order_id).await.unwrap().unwrap();
        assert_eq!(found.status(), crate::order::OrderStatus::Shipped);
        assert!(found.payment_id().is_some());
        assert!(found.shipment_id().is_some());
    }

    #[tokio::test]
    async fn cancel_shipped_order_through_service_fails() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let service = OrderService::new(repo, bus);

        let order = service.place_order("cust-1", items(), address()).await.unwrap();
        let order_id = *order.id();
        service.confirm(order_id).await.unwrap();
        service.mark_as_paid(order_id, PaymentId::new()).await.unwrap();
        service.mark_as_shipped(order_id, ShipmentId::new()).await.unwrap();

        assert!(service.cancel(order_id, "too late").await.is_err());
    }
}
