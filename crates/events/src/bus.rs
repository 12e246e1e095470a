//! In-process publish/subscribe event bus (C2).
//!
//! `publish` fans out to every handler subscribed to the event's type and
//! awaits all of them concurrently; a handler's failure (or panic) is
//! logged and swallowed, never propagated to the publisher, and never
//! prevents the other handlers of the same event from running.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::event::DomainEvent;

/// A single subscriber's reaction to an event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()>;
}

#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish an event, awaiting every subscribed handler for its type.
    async fn publish(&self, event: DomainEvent);

    /// Register a handler for an event type. Multiple handlers per type
    /// are allowed; invocation order across handlers is not guaranteed.
    async fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    /// Test-only hook: remove all subscriptions.
    async fn clear(&self);
}

#[async_trait]
impl<B: EventBus + ?Sized> EventBus for Arc<B> {
    async fn publish(&self, event: DomainEvent) {
        (**self).publish(event).await
    }

    async fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>) {
        (**self).subscribe(event_type, handler).await
    }

    async fn clear(&self) {
        (**self).clear().await
    }
}

/// Default in-memory bus: a map from event type to the list of subscribed
/// handlers, guarded by a `tokio::sync::RwLock` (written only at startup,
/// read on every publish).
#[derive(Default)]
pub struct InMemoryEventBus {
    subscribers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self { subscribers: RwLock::new(HashMap::new()) }
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, event: DomainEvent) {
        let handlers: Vec<Arc<dyn EventHandler>> = {
            let guard = self.subscribers.read().await;
            guard.get(&event.event_type).cloned().unwrap_or_default()
        };

        if handlers.is_empty() {
            return;
        }

        let mut tasks = tokio::task::JoinSet::new();
        for handler in handlers {
            let event = event.clone();
            tasks.spawn(async move { handler.handle(&event).await });
        }

        while let Some(outcome) = tasks.join_next().await {
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(event_type = %event.event_type, event_id = %event.event_id, error = %err, "event handler failed");
                }
                Err(join_err) => {
                    tracing::warn!(event_type = %event.event_type, event_id = %event.event_id, error = %join_err, "event handler panicked");
                }
            }
        }
    }

    async fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>) {
        let mut guard = self.subscribers.write().await;
        guard.entry(event_type.to_string()).or_default().push(handler);
    }

    async fn clear(&self) {
        self.subscribers.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderflow_core::ProductId;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(serde::Serialize)]
    struct Noop;
    impl crate::event::DomainEventPayload for Noop {
        fn event_type(&self) -> &'static str {
            "test.noop"
        }
    }

    struct CountingHandler(Arc<AtomicUsize>);
    #[async_trait]
    impl EventHandler for CountingHandler {
        async fn handle(&self, _event: &DomainEvent) -> anyhow::Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingHandler;
    #[async_trait]
    impl EventHandler for FailingHandler {
        async fn handle(&self, _event: &DomainEvent) -> anyhow::Result<()> {
            anyhow::bail!("boom")
        }
    }

    #[tokio::test]
    async fn every_subscribed_handler_is_invoked_even_if_one_fails() {
        let bus = InMemoryEventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        bus.subscribe("test.noop", Arc::new(FailingHandler)).await;
        bus.subscribe("test.noop", Arc::new(CountingHandler(hits.clone()))).await;
        bus.subscribe("test.noop", Arc::new(CountingHandler(hits.clone()))).await;

        let event = DomainEvent::new(ProductId::new(), "inventory.product", &Noop).unwrap();
        bus.publish(event).await;

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn publish_with_no_subscribers_is_a_no_op() {
        let bus = InMemoryEventBus::new();
        let event = DomainEvent::new(ProductId::new(), "inventory.product", &Noop).unwrap();
        bus.publish(event).await;
    }

    #[tokio::test]
    async fn clear_removes_all_subscriptions() {
        let bus = InMemoryEventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        bus.subscribe("test.noop", Arc::new(CountingHandler(hits.clone()))).await;
        bus.clear().await;

        let event = DomainEvent::new(ProductId::new(), "inventory.product", &Noop).unwrap();
        bus.publish(event).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
