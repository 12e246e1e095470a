//! Shipments bounded context (C6): the `Shipment` aggregate and the
//! saga-facing service that creates one once an order is paid.

pub mod events;
pub mod repository;
pub mod service;
pub mod shipment;

pub use events::ShipmentCreated;
pub use repository::{InMemoryShipmentRepository, ShipmentRepository};
pub use service::CreateShipmentService;
pub use shipment::{Shipment, ShipmentStatus};
