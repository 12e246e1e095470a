//! Saga wiring (C7): no central orchestrator, just the subscription table
//! that lets each bounded context react to the events that matter to it.
//!
//! `register_listeners` is the single place that subscription table lives;
//! read it top to bottom and you have the whole choreography in §4.7.

pub mod listeners;

use std::sync::Arc;

use orderflow_events::{EventBus, EventStore};
use orderflow_inventory::{
    InMemoryProductRepository, InMemoryStockReservationRepository, ProductRepository, ReleaseStockService,
    ReserveStockService, StockReservationRepository,
};
use orderflow_orders::{InMemoryOrderRepository, OrderRepository, OrderService};
use orderflow_payments::{InMemoryPaymentRepository, MockPaymentGateway, PaymentGateway, PaymentRepository, ProcessPaymentService};
use orderflow_shipments::{CreateShipmentService, InMemoryShipmentRepository, ShipmentRepository};

use crate::listeners::{
    ConfirmOnInventoryReserved, CreateShipmentOnOrderPaid, EventStoreRecorder, MarkPaidOnPaymentProcessed,
    MarkPaymentFailedOnPaymentFailed, MarkShippedOnShipmentCreated, ProcessPaymentOnOrderConfirmed,
    RejectOnInventoryReservationFailed, ReleaseOnOrderCancelled, ReleaseOnOrderPaymentFailed, ReserveOnOrderPlaced,
};

/// Every service the saga drives, bundled so the app facade (and tests) can
/// build the whole process-wide wiring in one call.
pub struct SagaServices<B: EventBus> {
    pub bus: Arc<B>,
    pub store: Arc<dyn EventStore>,
    pub products: Arc<dyn ProductRepository>,
    pub reservations: Arc<dyn StockReservationRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub shipments: Arc<dyn ShipmentRepository>,
    pub reserve_stock: Arc<ReserveStockService<B>>,
    pub release_stock: Arc<ReleaseStockService<B>>,
    pub order_service: Arc<OrderService<B>>,
    pub process_payment: Arc<ProcessPaymentService<B>>,
    pub create_shipment: Arc<CreateShipmentService<B>>,
}

impl<B: EventBus + 'static> SagaServices<B> {
    /// Builds the default in-memory wiring: one repository per context,
    /// a mock payment gateway, and `bus`/`store` supplied by the caller so
    /// the app facade controls their lifetime (they're process-wide
    /// singletons, §4.2).
    pub fn new_in_memory(bus: Arc<B>, store: Arc<dyn EventStore>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self::new_in_memory_with_retry_ceiling(bus, store, gateway, orderflow_payments::MAX_RETRY_ATTEMPTS)
    }

    /// Same as [`Self::new_in_memory`] but with a caller-supplied payment
    /// retry ceiling (`OrchestratorConfig::max_retry_attempts`), rather than
    /// the hardcoded `MAX_RETRY_ATTEMPTS` default (§1's ambient-stack
    /// requirement that the bound be configurable).
    pub fn new_in_memory_with_retry_ceiling(
        bus: Arc<B>,
        store: Arc<dyn EventStore>,
        gateway: Arc<dyn PaymentGateway>,
        max_retry_attempts: u8,
    ) -> Self {
        let products: Arc<dyn ProductRepository> = Arc::new(InMemoryProductRepository::new());
        let reservations: Arc<dyn StockReservationRepository> = Arc::new(InMemoryStockReservationRepository::new());
        let orders: Arc<dyn OrderRepository> = Arc::new(InMemoryOrderRepository::new());
        let payments: Arc<dyn PaymentRepository> = Arc::new(InMemoryPaymentRepository::new());
        let shipments: Arc<dyn ShipmentRepository> = Arc::new(InMemoryShipmentRepository::new());

        let reserve_stock = Arc::new(ReserveStockService::new(products.clone(), reservations.clone(), bus.clone()));
        let release_stock = Arc::new(ReleaseStockService::new(products.clone(), reservations.clone(), bus.clone()));
        let order_service = Arc::new(OrderService::new(orders.clone(), bus.clone()));
        let process_payment = Arc::new(ProcessPaymentService::with_max_attempts(
            payments.clone(),
            gateway,
            bus.clone(),
            max_retry_attempts,
        ));
        let create_shipment = Arc::new(CreateShipmentService::new(shipments.clone(), bus.clone()));

        Self {
            bus,
            store,
            products,
            reservations,
            orders,
            payments,
            shipments,
            reserve_stock,
            release_stock,
            order_service,
            process_payment,
            create_shipment,
        }
    }
}

/// Convenience constructor matching the default single-process deployment:
/// `InMemoryEventBus` + `InMemoryEventStore` + `MockPaymentGateway` at its
/// default success rate.
pub fn default_in_memory_saga() -> SagaServices<orderflow_events::InMemoryEventBus> {
    let bus = Arc::new(orderflow_events::InMemoryEventBus::new());
    let store: Arc<dyn EventStore> = Arc::new(orderflow_events::InMemoryEventStore::new());
    let gateway: Arc<dyn PaymentGateway> = Arc::new(MockPaymentGateway::new(0.9));
    SagaServices::new_in_memory(bus, store, gateway)
}

/// Subscribes every listener in §4.7's table to `services.bus`. Every event
/// type also gets an `EventStoreRecorder` so the audit trail is complete
/// even for the three event types (`OrderRejected`, `OrderShipped`,
/// `InventoryReleased`) that have no further behavioral subscriber.
pub async fn register_listeners<B: EventBus + 'static>(services: &SagaServices<B>) {
    let recorder = Arc::new(EventStoreRecorder { store: services.store.clone() });
    for event_type in [
        "orders.order.placed",
        "inventory.reserved",
        "inventory.reservation_failed",
        "orders.order.confirmed",
        "orders.order.rejected",
        "payments.payment.processed",
        "payments.payment.failed",
        "orders.order.paid",
        "orders.order.payment_failed",
        "shipments.shipment.created",
        "orders.order.shipped",
        "orders.order.cancelled",
        "inventory.released",
    ] {
        services.bus.subscribe(event_type, recorder.clone()).await;
    }

    services
        .bus
        .subscribe(
            "orders.order.placed",
            Arc::new(ReserveOnOrderPlaced { service: services.reserve_stock.clone() }),
        )
        .await;

    services
        .bus
        .subscribe(
            "inventory.reserved",
            Arc::new(ConfirmOnInventoryReserved { orders: services.order_service.clone() }),
        )
        .await;

    services
        .bus
        .subscribe(
            "inventory.reservation_failed",
            Arc::new(RejectOnInventoryReservationFailed { orders: services.order_service.clone() }),
        )
        .await;

    services
        .bus
        .subscribe(
            "orders.order.confirmed",
            Arc::new(ProcessPaymentOnOrderConfirmed {
                orders: services.order_service.clone(),
                payments: services.process_payment.clone(),
            }),
        )
        .await;

    services
        .bus
        .subscribe(
            "payments.payment.processed",
            Arc::new(MarkPaidOnPaymentProcessed { orders: services.order_service.clone() }),
        )
        .await;

    services
        .bus
        .subscribe(
            "payments.payment.failed",
            Arc::new(MarkPaymentFailedOnPaymentFailed { orders: services.order_service.clone() }),
        )
        .await;

    services
        .bus
        .subscribe(
            "orders.order.paid",
            Arc::new(CreateShipmentOnOrderPaid {
                orders: services.order_service.clone(),
                shipments: services.create_shipment.clone(),
            }),
        )
        .await;

    services
        .bus
        .subscribe(
            "orders.order.payment_failed",
            Arc::new(ReleaseOnOrderPaymentFailed { service: services.release_stock.clone() }),
        )
        .await;

    services
        .bus
        .subscribe(
            "shipments.shipment.created",
            Arc::new(MarkShippedOnShipmentCreated { orders: services.order_service.clone() }),
        )
        .await;

    services
        .bus
        .subscribe(
            "orders.order.cancelled",
            Arc::new(ReleaseOnOrderCancelled { service: services.release_stock.clone() }),
        )
        .await;
}
