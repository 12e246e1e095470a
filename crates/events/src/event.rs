//! `DomainEvent`: the single envelope shape every emitted event takes,
//! whether it travels through the bus, lands in the store, or both.

use chrono::{DateTime, Utc};
use orderflow_core::id::EventId;
use orderflow_core::{DomainError, DomainResult};
use serde::Serialize;

/// Implemented by every concrete event payload (`OrderPlaced`, `PaymentFailed`, ...).
///
/// `event_type` follows the `{context}.{aggregate}.{action}` convention
/// used throughout the saga's subscription table, e.g. `"orders.order.placed"`.
pub trait DomainEventPayload: Serialize {
    fn event_type(&self) -> &'static str;
}

/// An emitted domain event, heterogeneous payload carried as JSON.
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct DomainEvent {
    pub event_id: EventId,
    pub event_type: String,
    pub aggregate_id: String,
    pub aggregate_type: String,
    pub occurred_at: DateTime<Utc>,
    pub payload: serde_json::Value,
    pub version: u32,
}

impl DomainEvent {
    pub fn new(
        aggregate_id: impl core::fmt::Display,
        aggregate_type: impl Into<String>,
        payload: &impl DomainEventPayload,
    ) -> DomainResult<Self> {
        let json = serde_json::to_value(payload)
            .map_err(|e| DomainError::infrastructure(format!("failed to serialize event payload: {e}")))?;
        Ok(Self {
            event_id: EventId::new(),
            event_type: payload.event_type().to_string(),
            aggregate_id: aggregate_id.to_string(),
            aggregate_type: aggregate_type.into(),
            occurred_at: Utc::now(),
            payload: json,
            version: 1,
        })
    }

    /// Deserialize the payload back into a concrete event type. Used by
    /// listeners that need strongly-typed access to a subscribed event.
    pub fn payload_as<T: serde::de::DeserializeOwned>(&self) -> DomainResult<T> {
        serde_json::from_value(self.payload.clone())
            .map_err(|e| DomainError::infrastructure(format!("failed to deserialize {}: {e}", self.event_type)))
    }
}
