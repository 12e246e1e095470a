//! `Order` aggregate: the state machine the saga drives from placement
//! through shipment (or rejection/cancellation/payment failure).
//!
//! Direct-state, not event-sourced — mutated in place by the transition
//! methods below, each of which re-validates the current state before
//! moving (see DESIGN.md).

use chrono::{DateTime, Utc};
use orderflow_core::{AggregateRoot, Address, DomainError, DomainResult, Money, OrderId, PaymentId, ShipmentId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Rejected,
    Paid,
    PaymentFailed,
    Shipped,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Rejected | OrderStatus::PaymentFailed | OrderStatus::Shipped | OrderStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub sku: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl OrderItem {
    pub fn total_price(&self) -> DomainResult<Money> {
        if self.quantity < 1 {
            return Err(DomainError::validation("order item quantity must be at least 1"));
        }
        self.unit_price.multiply(rust_decimal::Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer_id: String,
    items: Vec<OrderItem>,
    shipping_address: Address,
    total_amount: Money,
    status: OrderStatus,
    payment_id: Option<PaymentId>,
    shipment_id: Option<ShipmentId>,
    cancellation_reason: Option<String>,
    rejection_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &OrderId {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Order {
    /// Computes `total_amount` from `items` (all lines must share one
    /// currency). Rejects empty `items` and a blank `customer_id`.
    pub fn new(customer_id: impl Into<String>, items: Vec<OrderItem>, shipping_address: Address) -> DomainResult<Self> {
        let customer_id = customer_id.into().trim().to_string();
        if customer_id.is_empty() {
            return Err(DomainError::validation("customer_id must not be empty"));
        }
        if items.is_empty() {
            return Err(DomainError::validation("order must contain at least one item"));
        }

        let mut total = Money::zero(items[0].unit_price.currency())?;
        for item in &items {
            total = total.add(&item.total_price()?)?;
        }

        let now = Utc::now();
        Ok(Self {
            id: OrderId::new(),
            customer_id,
            items,
            shipping_address,
            total_amount: total,
            status: OrderStatus::Pending,
            payment_id: None,
            shipment_id: None,
            cancellation_reason: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
            version: 1,
        })
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn payment_id(&self) -> Option<PaymentId> {
        self.payment_id
    }

    pub fn shipment_id(&self) -> Option<ShipmentId> {
        self.shipment_id
    }

    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn ensure_transition(&self, allowed_from: OrderStatus, action: &str) -> DomainResult<()> {
        if self.status != allowed_from {
            return Err(DomainError::business_rule(format!(
                "cannot {action}: order {} is {:?}, expected {:?}",
                self.id, self.status, allowed_from
            )));
        }
        Ok(())
    }

    pub fn confirm(&mut self) -> DomainResult<()> {
        self.ensure_transition(OrderStatus::Pending, "confirm")?;
        self.status = OrderStatus::Confirmed;
        self.touch();
        Ok(())
    }

    pub fn reject(&mut self, reason: impl Into<String>) -> DomainResult<()> {
        self.ensure_transition(OrderStatus::Pending, "reject")?;
        self.status = OrderStatus::Rejected;
        self.rejection_reason = Some(reason.into());
        self.touch();
        Ok(())
    }

    pub fn mark_as_paid(&mut self, payment_id: PaymentId) -> DomainResult<()> {
        self.ensure_transition(OrderStatus::Confirmed, "mark as paid")?;
        self.status = OrderStatus::Paid;
        self.payment_id = Some(payment_id);
        self.touch();
        Ok(())
    }

    pub fn mark_payment_failed(&mut self, reason: impl Into<String>) -> DomainResult<()> {
        self.ensure_transition(OrderStatus::Confirmed, "mark payment failed")?;
        self.status = OrderStatus::PaymentFailed;
        self.rejection_reason = Some(reason.into());
        self.touch();
        Ok(())
    }

    pub fn mark_as_shipped(&mut self, shipment_id: ShipmentId) -> DomainResult<()> {
        self.ensure_transition(OrderStatus::Paid, "mark as shipped")?;
        self.status = OrderStatus::Shipped;
        self.shipment_id = Some(shipment_id);
        self.touch();
        Ok(())
    }

    /// Customer-initiated. Allowed from PENDING, CONFIRMED, or PAID; fails
    /// on every terminal state, SHIPPED included.
    pub fn cancel(&mut self, reason: impl Into<String>) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::business_rule(format!(
                "cannot cancel order {}: already {:?}",
                self.id, self.status
            )));
        }
        self.status = OrderStatus::Cancelled;
        self.cancellation_reason = Some(reason.into());
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn address() -> Address {
        Address::new("1 Main St", "City", "ST", "00000", "US").unwrap()
    }

    fn item(sku: &str, qty: i64, price: rust_decimal::Decimal) -> OrderItem {
        OrderItem { sku: sku.to_string(), quantity: qty, unit_price: Money::new(price, "USD").unwrap() }
    }

    #[test]
    fn new_computes_total_and_starts_pending() {
        let order = Order::new("cust-1", vec![item("W", 5, dec!(29.99))], address()).unwrap();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.total_amount().amount(), dec!(149.95));
    }

    #[test]
    fn rejects_empty_items_or_blank_customer() {
        assert!(Order::new("cust-1", vec![], address()).is_err());
        assert!(Order::new("  ", vec![item("W", 1, dec!(1))], address()).is_err());
    }

    #[test]
    fn rejects_mixed_currency_items() {
        let items = vec![
            OrderItem { sku: "A".into(), quantity: 1, unit_price: Money::new(dec!(1), "USD").unwrap() },
            OrderItem { sku: "B".into(), quantity: 1, unit_price: Money::new(dec!(1), "EUR").unwrap() },
        ];
        assert!(Order::new("cust-1", items, address()).is_err());
    }

    #[test]
    fn happy_path_transitions_pending_to_shipped() {
        let mut order = Order::new("cust-1", vec![item("W", 1, dec!(10))], address()).unwrap();
        order.confirm().unwrap();
        assert_eq!(order.status(), OrderStatus::Confirmed);
        order.mark_as_paid(PaymentId::new()).unwrap();
        assert_eq!(order.status(), OrderStatus::Paid);
        order.mark_as_shipped(ShipmentId::new()).unwrap();
        assert_eq!(order.status(), OrderStatus::Shipped);
    }

    #[test]
    fn reject_sets_reason_and_is_terminal() {
        let mut order = Order::new("cust-1", vec![item("W", 1, dec!(10))], address()).unwrap();
        order.reject("insufficient stock").unwrap();
        assert_eq!(order.status(), OrderStatus::Rejected);
        assert_eq!(order.rejection_reason(), Some("insufficient stock"));
        assert!(order.cancel("changed my mind").is_err());
    }

    #[test]
    fn payment_failed_sets_reason_and_is_terminal() {
        let mut order = Order::new("cust-1", vec![item("W", 1, dec!(10))], address()).unwrap();
        order.confirm().unwrap();
        order.mark_payment_failed("card declined").unwrap();
        assert_eq!(order.status(), OrderStatus::PaymentFailed);
        assert!(order.cancel("too late").is_err());
    }

    #[test]
    fn cannot_skip_confirmed_to_shipped() {
        let mut order = Order::new("cust-1", vec![item("W", 1, dec!(10))], address()).unwrap();
        assert!(order.mark_as_shipped(ShipmentId::new()).is_err());
        assert!(order.mark_as_paid(PaymentId::new()).is_err());
    }

    #[test]
    fn cancel_allowed_from_pending_confirmed_and_paid() {
        for terminal_step in 0..3 {
            let mut order = Order::new("cust-1", vec![item("W", 1, dec!(10))], address()).unwrap();
            if terminal_step >= 1 {
                order.confirm().unwrap();
            }
            if terminal_step >= 2 {
                order.mark_as_paid(PaymentId::new()).unwrap();
            }
            order.cancel("customer request").unwrap();
            assert_eq!(order.status(), OrderStatus::Cancelled);
        }
    }

    #[test]
    fn cancel_shipped_order_fails_and_leaves_it_unchanged() {
        let mut order = Order::new("cust-1", vec![item("W", 1, dec!(10))], address()).unwrap();
        order.confirm().unwrap();
        order.mark_as_paid(PaymentId::new()).unwrap();
        order.mark_as_shipped(ShipmentId::new()).unwrap();
        let version_before = order.version();
        assert!(order.cancel("too late").is_err());
        assert_eq!(order.status(), OrderStatus::Shipped);
        assert_eq!(order.version(), version_before);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// P4 state-machine soundness: SHIPPED is only reachable through
            /// CONFIRMED and PAID, never skipped.
            #[test]
            fn shipped_always_passed_through_confirmed_and_paid(take_happy_path in any::<bool>()) {
                let mut order = Order::new("cust-1", vec![item("W", 1, dec!(10))], address()).unwrap();
                if take_happy_path {
                    order.confirm().unwrap();
                    order.mark_as_paid(PaymentId::new()).unwrap();
                    order.mark_as_shipped(ShipmentId::new()).unwrap();
                    prop_assert_eq!(order.status(), OrderStatus::Shipped);
                } else {
                    prop_assert!(order.mark_as_shipped(ShipmentId::new()).is_err());
                }
            }
        }
    }
}
