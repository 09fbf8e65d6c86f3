//! Create-or-update of a single connector.
//!
//! Existence is probed first: `PUT /connectors/{name}/config` is unreliable when
//! the connector is not registered yet, so the verb sequence is chosen up front.

use connect_models::{ConnectorConfig, OperationFailure, OperationOutcome, OperationResult};
use connect_observability::{
    log_connector_created, log_connector_restarted, log_connector_updated, log_operation_completed,
    log_operation_failed, EventCategory, RunContext,
};
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument};

use crate::client::{ConnectApi, Presence};
use crate::error::ConnectResult;

/// Steps of one upsert run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertStage {
    CheckingExistence,
    Updating,
    Restarting,
    Creating,
}

impl fmt::Display for UpsertStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckingExistence => write!(f, "checking_existence"),
            Self::Updating => write!(f, "updating"),
            Self::Restarting => write!(f, "restarting"),
            Self::Creating => write!(f, "creating"),
        }
    }
}

/// Ensures one named connector is registered with a given configuration.
///
/// Never deletes anything.
pub struct ConnectorUpserter<'a, C: ConnectApi + ?Sized> {
    client: &'a C,
    ctx: &'a RunContext,
}

impl<'a, C: ConnectApi + ?Sized> ConnectorUpserter<'a, C> {
    pub fn new(client: &'a C, ctx: &'a RunContext) -> Self {
        Self { client, ctx }
    }

    /// Creates the connector if it is absent, otherwise updates its config and
    /// restarts it.
    ///
    /// A failed restart fails the whole run even though the new config may already
    /// be stored on the server; there is no rollback.
    #[instrument(skip(self, config), fields(connect_url = %self.client.base_url()))]
    pub async fn upsert(&self, name: &str, config: &ConnectorConfig) -> OperationOutcome {
        let start = Instant::now();
        let mut stage = UpsertStage::CheckingExistence;

        let outcome = self.apply(name, config, &mut stage).await;
        match outcome {
            Ok(result) => {
                log_operation_completed(
                    self.ctx,
                    EventCategory::Upsert,
                    result.changed,
                    start.elapsed().as_millis() as u64,
                );
                Ok(result)
            }
            Err(err) => {
                let message = err.to_string();
                debug!(%stage, error = %message, "upsert aborted");
                log_operation_failed(
                    self.ctx,
                    EventCategory::Upsert,
                    &message,
                    start.elapsed().as_millis() as u64,
                );
                Err(OperationFailure::new(message))
            }
        }
    }

    async fn apply(
        &self,
        name: &str,
        config: &ConnectorConfig,
        stage: &mut UpsertStage,
    ) -> ConnectResult<OperationResult> {
        match self.client.exists(name).await? {
            Presence::Present => {
                *stage = UpsertStage::Updating;
                let changed = self.client.update_config(name, config).await?;
                log_connector_updated(self.ctx, name, changed);

                *stage = UpsertStage::Restarting;
                self.client.restart(name).await?;
                log_connector_restarted(self.ctx, name);

                Ok(OperationResult::new(changed, format!("Connector {} updated.", name)))
            }
            Presence::Absent => {
                *stage = UpsertStage::Creating;
                let changed = self.client.create(name, config).await?;
                log_connector_created(self.ctx, name, changed);

                Ok(OperationResult::new(changed, format!("New connector {} installed.", name)))
            }
        }
    }
}
