//! Shared data model for the Kafka Connect reconciler.
//!
//! Holds the connector configuration types exchanged with the Connect REST
//! server, the result document handed back to the invoking host, and the typed
//! parameter documents the host supplies.

pub mod connector;
pub mod host;
pub mod operation;

pub use connector::*;
pub use host::*;
pub use operation::*;
