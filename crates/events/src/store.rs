//! Append-only event store (C1): every event ever published is recorded
//! here for audit/query purposes. This is a pure audit trail, not the
//! source of truth for aggregate state — aggregates hold their own state
//! directly (see DESIGN.md).

use std::collections::HashMap;

use async_trait::async_trait;
use orderflow_core::id::EventId;
use orderflow_core::DomainError;
use tokio::sync::RwLock;

use crate::event::DomainEvent;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Idempotent on `event.event_id`: saving the same event twice is a no-op.
    async fn save(&self, event: DomainEvent) -> Result<(), DomainError>;

    async fn find_by_id(&self, event_id: EventId) -> Result<Option<DomainEvent>, DomainError>;

    /// Ascending by `occurred_at`.
    async fn find_by_aggregate_id(&self, aggregate_id: &str) -> Result<Vec<DomainEvent>, DomainError>;

    /// Descending by `occurred_at`.
    async fn find_by_event_type(&self, event_type: &str) -> Result<Vec<DomainEvent>, DomainError>;

    /// Descending by `occurred_at`.
    async fn find_all(&self) -> Result<Vec<DomainEvent>, DomainError>;
}

#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<HashMap<EventId, DomainEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self { events: RwLock::new(HashMap::new()) }
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn save(&self, event: DomainEvent) -> Result<(), DomainError> {
        let mut guard = self.events.write().await;
        guard.entry(event.event_id).or_insert(event);
        Ok(())
    }

    async fn find_by_id(&self, event_id: EventId) -> Result<Option<DomainEvent>, DomainError> {
        Ok(self.events.read().await.get(&event_id).cloned())
    }

    async fn find_by_aggregate_id(&self, aggregate_id: &str) -> Result<Vec<DomainEvent>, DomainError> {
        let guard = self.events.read().await;
        let mut found: Vec<DomainEvent> =
            guard.values().filter(|e| e.aggregate_id == aggregate_id).cloned().collect();
        found.sort_by_key(|e| e.occurred_at);
        Ok(found)
    }

    async fn find_by_event_type(&self, event_type: &str) -> Result<Vec<DomainEvent>, DomainError> {
        let guard = self.events.read().await;
        let mut found: Vec<DomainEvent> =
            guard.values().filter(|e| e.event_type == event_type).cloned().collect();
        found.sort_by_key(|e| core::cmp::Reverse(e.occurred_at));
        Ok(found)
    }

    async fn find_all(&self) -> Result<Vec<DomainEvent>, DomainError> {
        let guard = self.events.read().await;
        let mut all: Vec<DomainEvent> = guard.values().cloned().collect();
        all.sort_by_key(|e| core::cmp::Reverse(e.occurred_at));
        Ok(all)
    }
}
