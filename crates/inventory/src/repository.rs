//! In-memory product and reservation storage.
//!
//! Every mutating repository method acquires a per-sku `tokio::sync::Mutex`
//! before touching the product and holds it for the whole
//! check+mutate+persist critical section the concurrency model (§5)
//! requires, so two concurrent reservers for the same sku serialize instead
//! of racing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use orderflow_core::{DomainError, DomainResult, Entity, OrderId, StockReservationId};
use tokio::sync::{Mutex, RwLock};

use crate::product::Product;
use crate::reservation::StockReservation;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: Product) -> DomainResult<()>;
    async fn find_by_sku(&self, sku: &str) -> DomainResult<Option<Product>>;
    async fn reserve(&self, sku: &str, quantity: i64) -> DomainResult<Product>;
    async fn release(&self, sku: &str, quantity: i64) -> DomainResult<Product>;
    async fn adjust_stock(&self, sku: &str, new_quantity: i64) -> DomainResult<Product>;
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<String, Product>>,
    locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self { products: RwLock::new(HashMap::new()), locks: RwLock::new(HashMap::new()) }
    }

    async fn lock_for(&self, sku: &str) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.read().await.get(sku) {
            return lock.clone();
        }
        self.locks.write().await.entry(sku.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }

    /// Holds `sku`'s lock across lookup, mutation, and write-back.
    async fn with_locked(
        &self,
        sku: &str,
        f: impl FnOnce(&mut Product) -> DomainResult<()> + Send,
    ) -> DomainResult<Product> {
        let lock = self.lock_for(sku).await;
        let _guard = lock.lock().await;
        let mut products = self.products.write().await;
        let product = products
            .get_mut(sku)
            .ok_or_else(|| DomainError::not_found(format!("product with sku {sku} not found")))?;
        f(product)?;
        Ok(product.clone())
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: Product) -> DomainResult<()> {
        let mut guard = self.products.write().await;
        if guard.contains_key(product.sku()) {
            return Err(DomainError::business_rule(format!("sku {} already exists", product.sku())));
        }
        guard.insert(product.sku().to_string(), product);
        Ok(())
    }

    async fn find_by_sku(&self, sku: &str) -> DomainResult<Option<Product>> {
        Ok(self.products.read().await.get(sku).cloned())
    }

    async fn reserve(&self, sku: &str, quantity: i64) -> DomainResult<Product> {
        self.with_locked(sku, |p| p.reserve_stock(quantity)).await
    }

    async fn release(&self, sku: &str, quantity: i64) -> DomainResult<Product> {
        self.with_locked(sku, |p| p.release_stock(quantity)).await
    }

    async fn adjust_stock(&self, sku: &str, new_quantity: i64) -> DomainResult<Product> {
        self.with_locked(sku, |p| p.adjust_stock(new_quantity)).await
    }
}

#[async_trait]
pub trait StockReservationRepository: Send + Sync {
    async fn save(&self, reservation: StockReservation) -> DomainResult<()>;
    async fn find_unreleased_by_order(&self, order_id: OrderId) -> DomainResult<Vec<StockReservation>>;
    async fn mark_released(&self, id: StockReservationId) -> DomainResult<()>;
}

#[derive(Default)]
pub struct InMemoryStockReservationRepository {
    reservations: RwLock<HashMap<StockReservationId, StockReservation>>,
}

impl InMemoryStockReservationRepository {
    pub fn new() -> Self {
        Self { reservations: RwLock::new(HashMap::new()) }
    }
}

#[async_trait]
impl StockReservationRepository for InMemoryStockReservationRepository {
    async fn save(&self, reservation: StockReservation) -> DomainResult<()> {
        self.reservations.write().await.insert(*reservation.id(), reservation);
        Ok(())
    }

    async fn find_unreleased_by_order(&self, order_id: OrderId) -> DomainResult<Vec<StockReservation>> {
        let guard = self.reservations.read().await;
        Ok(guard.values().filter(|r| r.order_id() == order_id && !r.released()).cloned().collect())
    }

    async fn mark_released(&self, id: StockReservationId) -> DomainResult<()> {
        let mut guard = self.reservations.write().await;
        let reservation = guard
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("reservation {id} not found")))?;
        reservation.mark_released();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Product;

    #[tokio::test]
    async fn create_rejects_duplicate_sku() {
        let repo = InMemoryProductRepository::new();
        repo.create(Product::new("W", "Widget", 10).unwrap()).await.unwrap();
        assert!(repo.create(Product::new("W", "Widget 2", 5).unwrap()).await.is_err());
    }

    #[tokio::test]
    async fn reserve_mutates_and_persists() {
        let repo = InMemoryProductRepository::new();
        repo.create(Product::new("W", "Widget", 10).unwrap()).await.unwrap();
        repo.reserve("W", 3).await.unwrap();
        let found = repo.find_by_sku("W").await.unwrap().unwrap();
        assert_eq!(found.reserved_quantity(), 3);
    }

    #[tokio::test]
    async fn reserve_on_missing_sku_is_not_found() {
        let repo = InMemoryProductRepository::new();
        assert!(repo.reserve("NOPE", 1).await.is_err());
    }

    #[tokio::test]
    async fn concurrent_reservations_never_over_reserve() {
        let repo = Arc::new(InMemoryProductRepository::new());
        repo.create(Product::new("RACE", "Race Widget", 50).unwrap()).await.unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..10 {
            let repo = repo.clone();
            tasks.spawn(async move { repo.reserve("RACE", 10).await });
        }
        let mut ok_count = 0;
        while let Some(result) = tasks.join_next().await {
            if result.unwrap().is_ok() {
                ok_count += 1;
            }
        }
        assert_eq!(ok_count, 5);
        let product = repo.find_by_sku("RACE").await.unwrap().unwrap();
        assert_eq!(product.reserved_quantity(), 50);
        assert_eq!(product.available_stock(), 0);
    }

    #[tokio::test]
    async fn reservation_repository_roundtrip() {
        let repo = InMemoryStockReservationRepository::new();
        let order_id = OrderId::new();
        let reservation = StockReservation::new(order_id, "W", 4);
        let id = *reservation.id();
        repo.save(reservation).await.unwrap();

        let found = repo.find_unreleased_by_order(order_id).await.unwrap();
        assert_eq!(found.len(), 1);

        repo.mark_released(id).await.unwrap();
        let found = repo.find_unreleased_by_order(order_id).await.unwrap();
        assert!(found.is_empty());
    }

    /// P2 no-phantom-reservation: sum over unreleased reservations for a sku
    /// equals the product's reservedQuantity, across several orders and a
    /// release of one of them.
    #[tokio::test]
    async fn sum_of_unreleased_reservations_matches_product_reserved_quantity() {
        let product_repo = InMemoryProductRepository::new();
        product_repo.create(Product::new("W", "Widget", 100).unwrap()).await.unwrap();
        let reservation_repo = InMemoryStockReservationRepository::new();

        let orders: Vec<OrderId> = (0..3).map(|_| OrderId::new()).collect();
        for order_id in &orders {
            product_repo.reserve("W", 10).await.unwrap();
            reservation_repo.save(StockReservation::new(*order_id, "W", 10)).await.unwrap();
        }

        async fn sum_unreleased(repo: &InMemoryStockReservationRepository, orders: &[OrderId]) -> i64 {
            let mut total = 0;
            for order_id in orders {
                let unreleased = repo.find_unreleased_by_order(*order_id).await.unwrap();
                total += unreleased.iter().map(|r| r.quantity()).sum::<i64>();
            }
            total
        }

        let product = product_repo.find_by_sku("W").await.unwrap().unwrap();
        assert_eq!(sum_unreleased(&reservation_repo, &orders).await, product.reserved_quantity());

        let released = reservation_repo.find_unreleased_by_order(orders[0]).await.unwrap();
        for reservation in released {
            product_repo.release("W", reservation.quantity()).await.unwrap();
            reservation_repo.mark_released(*reservation.id()).await.unwrap();
        }

        let product = product_repo.find_by_sku("W").await.unwrap().unwrap();
        assert_eq!(sum_unreleased(&reservation_repo, &orders).await, product.reserved_quantity());
    }
}
