//! `Product` aggregate: the stock ledger for a single sku.
//!
//! Holds its state directly (not event-sourced). `reserved_quantity` only
//! ever moves through `reserve_stock`/`release_stock`; `adjust_stock` is the
//! only way `stock_quantity` itself changes after construction.

use chrono::{DateTime, Utc};
use orderflow_core::{AggregateRoot, DomainError, DomainResult, ProductId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    sku: String,
    name: String,
    stock_quantity: i64,
    reserved_quantity: i64,
    status: ProductStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl AggregateRoot for Product {
    type Id = ProductId;

    fn id(&self) -> &ProductId {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Product {
    /// `sku` is trimmed and upper-cased; must end up 1-50 chars. `name` must
    /// not be blank. Starts ACTIVE with zero reservations.
    pub fn new(sku: impl Into<String>, name: impl Into<String>, stock_quantity: i64) -> DomainResult<Self> {
        let sku = normalize_sku(sku.into())?;
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("product name must not be empty"));
        }
        if stock_quantity < 0 {
            return Err(DomainError::validation("stock_quantity must be non-negative"));
        }
        let now = Utc::now();
        Ok(Self {
            id: ProductId::new(),
            sku,
            name,
            stock_quantity,
            reserved_quantity: 0,
            status: ProductStatus::Active,
            created_at: now,
            updated_at: now,
            version: 1,
        })
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stock_quantity(&self) -> i64 {
        self.stock_quantity
    }

    pub fn reserved_quantity(&self) -> i64 {
        self.reserved_quantity
    }

    pub fn available_stock(&self) -> i64 {
        self.stock_quantity - self.reserved_quantity
    }

    pub fn status(&self) -> ProductStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, ProductStatus::Active)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn can_reserve(&self, quantity: i64) -> bool {
        self.is_active() && quantity > 0 && self.available_stock() >= quantity
    }

    pub fn reserve_stock(&mut self, quantity: i64) -> DomainResult<()> {
        if !self.can_reserve(quantity) {
            return Err(DomainError::business_rule(format!(
                "cannot reserve {quantity} of {}: available={}, active={}",
                self.sku,
                self.available_stock(),
                self.is_active()
            )));
        }
        self.reserved_quantity += quantity;
        self.touch();
        Ok(())
    }

    pub fn release_stock(&mut self, quantity: i64) -> DomainResult<()> {
        if quantity <= 0 || quantity > self.reserved_quantity {
            return Err(DomainError::business_rule(format!(
                "cannot release {quantity} of {}: reserved={}",
                self.sku, self.reserved_quantity
            )));
        }
        self.reserved_quantity -= quantity;
        self.touch();
        Ok(())
    }

    pub fn adjust_stock(&mut self, new_quantity: i64) -> DomainResult<()> {
        if new_quantity < 0 || new_quantity < self.reserved_quantity {
            return Err(DomainError::business_rule(format!(
                "cannot adjust stock of {} to {new_quantity}: reserved={}",
                self.sku, self.reserved_quantity
            )));
        }
        self.stock_quantity = new_quantity;
        self.touch();
        Ok(())
    }

    pub fn activate(&mut self) {
        self.status = ProductStatus::Active;
        self.touch();
    }

    pub fn deactivate(&mut self) {
        self.status = ProductStatus::Inactive;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.version += 1;
    }
}

fn normalize_sku(sku: String) -> DomainResult<String> {
    let trimmed = sku.trim().to_ascii_uppercase();
    if trimmed.is_empty() || trimmed.len() > 50 {
        return Err(DomainError::validation("sku must be 1-50 characters after trimming"));
    }
    Ok(trimmed)
}
