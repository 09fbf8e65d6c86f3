//! Reconciliation event logging.
//!
//! Every change the reconciler makes (or fails to make) on the Connect server is
//! emitted as one structured event with a consistent schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of a reconciliation step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum EventResult {
    Success,
    Failure,
    Partial,
    Skipped,
}

impl std::fmt::Display for EventResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
            Self::Partial => write!(f, "partial"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Which operation produced the event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Upsert,
    Prune,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upsert => write!(f, "upsert"),
            Self::Prune => write!(f, "prune"),
        }
    }
}

/// Identity of one host invocation, attached to every event it emits.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub service: String,
    pub run_id: Uuid,
}

impl RunContext {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            run_id: Uuid::new_v4(),
        }
    }
}

/// A structured reconciliation event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    pub timestamp: DateTime<Utc>,
    pub category: EventCategory,
    /// Specific event type (e.g., "connector_created", "connector_deleted")
    pub event_type: String,
    /// Connector the event is about, if any
    pub connector: Option<String>,
    pub result: EventResult,
    pub duration_ms: Option<u64>,
    pub error: Option<String>,
    pub run_id: Option<Uuid>,
    /// Service that emitted the event
    pub service: String,
    pub metadata: Option<serde_json::Value>,
}

impl DomainEvent {
    /// Create a new domain event builder
    pub fn new(ctx: &RunContext, category: EventCategory, event_type: impl Into<String>) -> DomainEventBuilder {
        DomainEventBuilder {
            service: ctx.service.clone(),
            run_id: Some(ctx.run_id),
            category,
            event_type: event_type.into(),
            connector: None,
            result: EventResult::Success,
            duration_ms: None,
            error: None,
            metadata: None,
        }
    }
}

/// Builder for constructing domain events
pub struct DomainEventBuilder {
    service: String,
    run_id: Option<Uuid>,
    category: EventCategory,
    event_type: String,
    connector: Option<String>,
    result: EventResult,
    duration_ms: Option<u64>,
    error: Option<String>,
    metadata: Option<serde_json::Value>,
}

impl DomainEventBuilder {
    pub fn connector(mut self, name: impl Into<String>) -> Self {
        self.connector = Some(name.into());
        self
    }

    pub fn result(mut self, result: EventResult) -> Self {
        self.result = result;
        self
    }

    pub fn success(mut self) -> Self {
        self.result = EventResult::Success;
        self
    }

    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.result = EventResult::Failure;
        self.error = Some(error.into());
        self
    }

    pub fn duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Build and emit the event as a log
    pub fn emit(self) {
        let event = self.build();
        let json = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());

        match event.result {
            EventResult::Success => tracing::info!(
                target: "domain_event",
                category = %event.category,
                event_type = %event.event_type,
                result = "success",
                "DomainEvent: {}", json
            ),
            EventResult::Failure => tracing::error!(
                target: "domain_event",
                category = %event.category,
                event_type = %event.event_type,
                result = "failure",
                error = ?event.error,
                "DomainEvent: {}", json
            ),
            EventResult::Partial => tracing::warn!(
                target: "domain_event",
                category = %event.category,
                event_type = %event.event_type,
                result = "partial",
                "DomainEvent: {}", json
            ),
            EventResult::Skipped => tracing::debug!(
                target: "domain_event",
                category = %event.category,
                event_type = %event.event_type,
                result = "skipped",
                "DomainEvent: {}", json
            ),
        }
    }

    /// Build the event without emitting
    pub fn build(self) -> DomainEvent {
        DomainEvent {
            timestamp: Utc::now(),
            category: self.category,
            event_type: self.event_type,
            connector: self.connector,
            result: self.result,
            duration_ms: self.duration_ms,
            error: self.error,
            run_id: self.run_id,
            service: self.service,
            metadata: self.metadata,
        }
    }
}

// ============================================================================
// Convenience functions for reconciliation events
// ============================================================================

/// Log a connector registered for the first time
pub fn log_connector_created(ctx: &RunContext, name: &str, accepted: bool) {
    let builder = DomainEvent::new(ctx, EventCategory::Upsert, "connector_created").connector(name);
    if accepted {
        builder.success().emit();
    } else {
        builder.result(EventResult::Skipped).emit();
    }
}

/// Log a configuration update on an existing connector
pub fn log_connector_updated(ctx: &RunContext, name: &str, accepted: bool) {
    let builder = DomainEvent::new(ctx, EventCategory::Upsert, "connector_updated").connector(name);
    if accepted {
        builder.success().emit();
    } else {
        builder.result(EventResult::Skipped).emit();
    }
}

/// Log a connector restart after an update
pub fn log_connector_restarted(ctx: &RunContext, name: &str) {
    DomainEvent::new(ctx, EventCategory::Upsert, "connector_restarted")
        .connector(name)
        .success()
        .emit();
}

/// Log a connector removed by the pruner
pub fn log_connector_deleted(ctx: &RunContext, name: &str) {
    DomainEvent::new(ctx, EventCategory::Prune, "connector_deleted")
        .connector(name)
        .success()
        .emit();
}

/// Log a delete the server did not confirm
pub fn log_connector_delete_failed(ctx: &RunContext, name: &str) {
    DomainEvent::new(ctx, EventCategory::Prune, "connector_delete_failed")
        .connector(name)
        .result(EventResult::Partial)
        .emit();
}

/// Log an operation aborted by an error
pub fn log_operation_failed(ctx: &RunContext, category: EventCategory, error: &str, duration_ms: u64) {
    DomainEvent::new(ctx, category, "operation_failed")
        .duration_ms(duration_ms)
        .failure(error)
        .emit();
}

/// Log an operation that finished
pub fn log_operation_completed(ctx: &RunContext, category: EventCategory, changed: bool, duration_ms: u64) {
    DomainEvent::new(ctx, category, "operation_completed")
        .duration_ms(duration_ms)
        .metadata(serde_json::json!({ "changed": changed }))
        .success()
        .emit();
}

/// Log a run skipped because the host asked for check mode
pub fn log_check_mode_skipped(ctx: &RunContext, category: EventCategory) {
    DomainEvent::new(ctx, category, "check_mode_skipped")
        .result(EventResult::Skipped)
        .emit();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_event_builder() {
        let ctx = RunContext::new("test-service");
        let event = DomainEvent::new(&ctx, EventCategory::Prune, "connector_deleted")
            .connector("b")
            .duration_ms(100)
            .success()
            .build();

        assert_eq!(event.service, "test-service");
        assert_eq!(event.event_type, "connector_deleted");
        assert_eq!(event.connector, Some("b".to_string()));
        assert_eq!(event.run_id, Some(ctx.run_id));
        assert_eq!(event.result, EventResult::Success);
    }

    #[test]
    fn test_failure_carries_error() {
        let ctx = RunContext::new("test-service");
        let event = DomainEvent::new(&ctx, EventCategory::Upsert, "operation_failed")
            .failure("connection refused")
            .build();

        assert_eq!(event.result, EventResult::Failure);
        assert_eq!(event.error.as_deref(), Some("connection refused"));
        assert_eq!(event.category.to_string(), "upsert");
    }
}
