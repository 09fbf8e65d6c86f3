//! Observability for the Kafka Connect reconciler.
//!
//! # Features
//! - Structured JSON or pretty logging on stderr
//! - Per-invocation run ids
//! - Reconciliation event logging (connector created, updated, deleted, ...)

pub mod domain_events;
pub mod init;
pub mod macros;

pub use domain_events::*;
pub use init::*;

// Re-export tracing for convenience
pub use tracing::{debug, error, info, warn, trace, span, Level, Instrument};
pub use tracing::instrument;
