//! Kafka Connect reconciler.
//!
//! Two independent operations keep the connectors registered on a Kafka Connect
//! REST server in line with a declared state:
//!
//! - [`ConnectorUpserter`] creates a connector, or updates and restarts it when it
//!   already exists.
//! - [`ConnectorPruner`] deletes every registered connector missing from an
//!   allow-list.
//!
//! Both talk to the server through the [`ConnectApi`] trait, implemented over HTTP
//! by [`ConnectClient`].

pub mod client;
pub mod error;
pub mod host;
pub mod prune;
pub mod upsert;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{ConnectApi, ConnectClient, Presence};
pub use error::{ConnectError, ConnectResult};
pub use prune::ConnectorPruner;
pub use upsert::ConnectorUpserter;
