//! Orders bounded context (C4): the `Order` state machine and the service
//! that drives it for both the public request surface and the saga.

pub mod events;
pub mod order;
pub mod repository;
pub mod service;

pub use events::{
    OrderCancelled, OrderConfirmed, OrderPaid, OrderPaymentFailed, OrderPlaced, OrderRejected, OrderShipped,
};
pub use order::{Order, OrderItem, OrderStatus};
pub use repository::{InMemoryOrderRepository, OrderFilter, OrderRepository};
pub use service::OrderService;
