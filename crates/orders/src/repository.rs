//! In-memory order storage.

use std::collections::HashMap;

use async_trait::async_trait;
use orderflow_core::{DomainError, DomainResult, OrderId};
use tokio::sync::RwLock;

use crate::order::{Order, OrderStatus};

#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub customer_id: Option<String>,
    pub status: Option<OrderStatus>,
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn save(&self, order: Order) -> DomainResult<()>;
    async fn find_by_id(&self, order_id: OrderId) -> DomainResult<Option<Order>>;

    /// Runs `f` against the stored order and persists the mutated copy.
    async fn mutate(&self, order_id: OrderId, f: Box<dyn FnOnce(&mut Order) -> DomainResult<()> + Send>) -> DomainResult<Order>;

    /// Most-recent-first by `updated_at`.
    async fn list(&self, filter: OrderFilter) -> DomainResult<Vec<Order>>;
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self { orders: RwLock::new(HashMap::new()) }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: Order) -> DomainResult<()> {
        self.orders.write().await.insert(*order.id(), order);
        Ok(())
    }

    async fn find_by_id(&self, order_id: OrderId) -> DomainResult<Option<Order>> {
        Ok(self.orders.read().await.get(&order_id).cloned())
    }

    async fn mutate(
        &self,
        order_id: OrderId,
        f: Box<dyn FnOnce(&mut Order) -> DomainResult<()> + Send>,
    ) -> DomainResult<Order> {
        let mut guard = self.orders.write().await;
        let order = guard
            .get_mut(&order_id)
            .ok_or_else(|| DomainError::not_found(format!("order {order_id} not found")))?;
        f(order)?;
        Ok(order.clone())
    }

    async fn list(&self, filter: OrderFilter) -> DomainResult<Vec<Order>> {
        let guard = self.orders.read().await;
        let mut found: Vec<Order> = guard
            .values()
            .filter(|o| filter.customer_id.as_deref().is_none_or(|c| o.customer_id() == c))
            .filter(|o| filter.status.is_none_or(|s| o.status() == s))
            .cloned()
            .collect();
        found.sort_by_key(|o| core::cmp::Reverse(o.updated_at()));
        Ok(found)
    }
}
