//! Payments bounded context (C5): the `Payment` state machine, the
//! `PaymentGateway` port, and the saga-facing service that drives both.

pub mod events;
pub mod gateway;
pub mod payment;
pub mod repository;
pub mod service;

pub use events::{PaymentFailed, PaymentProcessed};
pub use gateway::{AlwaysFailGateway, AlwaysSucceedGateway, GatewayOutcome, MockPaymentGateway, PaymentGateway};
pub use payment::{Payment, PaymentMethod, PaymentStatus, MAX_RETRY_ATTEMPTS};
pub use repository::{InMemoryPaymentRepository, PaymentRepository};
pub use service::ProcessPaymentService;
