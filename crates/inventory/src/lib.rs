//! Inventory bounded context (C3): the `Product` stock ledger and the two
//! saga-facing services that reserve and release stock on its behalf.

pub mod events;
pub mod product;
pub mod repository;
pub mod reservation;
pub mod service;

pub use events::{InventoryReleased, InventoryReservationFailed, InventoryReserved, RequestedItem, ReservationSummary};
pub use product::{Product, ProductStatus};
pub use repository::{InMemoryProductRepository, InMemoryStockReservationRepository, ProductRepository, StockReservationRepository};
pub use reservation::StockReservation;
pub use service::{OrderItemRequest, ReleaseStockService, ReserveStockService};
