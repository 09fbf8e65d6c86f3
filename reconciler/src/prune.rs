//! Removal of connectors missing from an allow-list.

use connect_models::{ActiveList, OperationFailure, OperationOutcome, OperationResult};
use connect_observability::{
    log_connector_delete_failed, log_connector_deleted, log_operation_completed,
    log_operation_failed, EventCategory, RunContext,
};
use std::time::Instant;
use tracing::{debug, instrument};

use crate::client::ConnectApi;
use crate::error::ConnectResult;

/// What a prune pass did on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Deleted connectors, in the order they were deleted.
    pub removed: Vec<String>,
    /// Deletes the server answered with a status other than 200.
    pub unconfirmed: Vec<String>,
}

impl PruneReport {
    pub fn into_outcome(self) -> OperationOutcome {
        let removed = format!("Connectors removed: {}.", self.removed.join(", "));
        if !self.unconfirmed.is_empty() {
            return Err(OperationFailure::new(format!(
                "{} Connectors not confirmed removed: {}.",
                removed,
                self.unconfirmed.join(", ")
            )));
        }
        Ok(OperationResult::new(!self.removed.is_empty(), removed))
    }
}

/// Deletes every registered connector that is not in the active list.
///
/// Names in the active list are never deleted, whatever their config.
pub struct ConnectorPruner<'a, C: ConnectApi + ?Sized> {
    client: &'a C,
    ctx: &'a RunContext,
}

impl<'a, C: ConnectApi + ?Sized> ConnectorPruner<'a, C> {
    pub fn new(client: &'a C, ctx: &'a RunContext) -> Self {
        Self { client, ctx }
    }

    #[instrument(skip(self, active), fields(connect_url = %self.client.base_url(), active = active.len()))]
    pub async fn prune(&self, active: &ActiveList) -> OperationOutcome {
        let start = Instant::now();

        let outcome = self.apply(active).await.map(PruneReport::into_outcome);
        let elapsed = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(result)) => {
                log_operation_completed(self.ctx, EventCategory::Prune, result.changed, elapsed);
                Ok(result)
            }
            Ok(Err(failure)) => {
                log_operation_failed(self.ctx, EventCategory::Prune, failure.message(), elapsed);
                Err(failure)
            }
            Err(err) => {
                let message = err.to_string();
                log_operation_failed(self.ctx, EventCategory::Prune, &message, elapsed);
                Err(OperationFailure::new(message))
            }
        }
    }

    /// Lists, diffs and deletes. The first transport error aborts the pass.
    pub async fn apply(&self, active: &ActiveList) -> ConnectResult<PruneReport> {
        let registered = self.client.list().await?;
        let to_delete = active.excess(&registered);
        debug!(
            registered = registered.len(),
            to_delete = to_delete.len(),
            "computed connectors to remove"
        );

        let mut report = PruneReport::default();
        for name in to_delete {
            if self.client.delete(&name).await? {
                log_connector_deleted(self.ctx, &name);
                report.removed.push(name);
            } else {
                log_connector_delete_failed(self.ctx, &name);
                report.unconfirmed.push(name);
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{Call, FakeConnect};

    fn active(names: &[&str]) -> ActiveList {
        names.iter().copied().collect()
    }

    #[tokio::test]
    async fn test_prune_deletes_only_inactive() {
        let fake = FakeConnect::with_connectors(&["a", "b", "c"]);
        let ctx = RunContext::new("test");

        let result = ConnectorPruner::new(&fake, &ctx)
            .prune(&active(&["a", "c"]))
            .await
            .unwrap();

        assert!(result.changed);
        assert_eq!(result.message, "Connectors removed: b.");
        assert_eq!(fake.registered(), vec!["a", "c"]);
        assert_eq!(fake.calls(), vec![Call::List, Call::Delete("b".into())]);
    }

    #[tokio::test]
    async fn test_prune_is_idempotent() {
        let fake = FakeConnect::with_connectors(&["a", "b", "c"]);
        let ctx = RunContext::new("test");
        let pruner = ConnectorPruner::new(&fake, &ctx);
        let keep = active(&["a"]);

        let first = pruner.apply(&keep).await.unwrap();
        let second = pruner.apply(&keep).await.unwrap();

        assert_eq!(first.removed, vec!["b", "c"]);
        assert!(second.removed.is_empty());
    }

    #[tokio::test]
    async fn test_empty_delete_set_reports_unchanged() {
        // deliberate: changed follows whether anything was removed
        let fake = FakeConnect::with_connectors(&["a"]);
        let ctx = RunContext::new("test");

        let result = ConnectorPruner::new(&fake, &ctx)
            .prune(&active(&["a", "ghost"]))
            .await
            .unwrap();

        assert!(!result.changed);
        assert_eq!(result.message, "Connectors removed: .");
        assert_eq!(fake.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn test_unconfirmed_delete_is_aggregated_into_failure() {
        // deliberate: a delete not answered with 200 fails the run instead of being ignored
        let fake = FakeConnect {
            unconfirmed_deletes: ["b".to_string()].into_iter().collect(),
            ..FakeConnect::with_connectors(&["a", "b", "c"])
        };
        let ctx = RunContext::new("test");

        let failure = ConnectorPruner::new(&fake, &ctx)
            .prune(&active(&[]))
            .await
            .unwrap_err();

        assert!(!failure.result.changed);
        assert_eq!(
            failure.message(),
            "Connectors removed: a, c. Connectors not confirmed removed: b."
        );
        // the loop kept going after the unconfirmed delete
        assert_eq!(fake.registered(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_delete_error_aborts_remaining_deletes() {
        let fake = FakeConnect {
            broken_deletes: ["a".to_string()].into_iter().collect(),
            ..FakeConnect::with_connectors(&["a", "b"])
        };
        let ctx = RunContext::new("test");

        let failure = ConnectorPruner::new(&fake, &ctx)
            .prune(&active(&[]))
            .await
            .unwrap_err();

        assert!(!failure.result.changed);
        assert!(failure.message().contains("500"));
        assert_eq!(fake.calls(), vec![Call::List, Call::Delete("a".into())]);
        assert_eq!(fake.registered(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_list_error_fails_without_deleting() {
        let fake = FakeConnect {
            fail_list: true,
            ..FakeConnect::with_connectors(&["a"])
        };
        let ctx = RunContext::new("test");

        let failure = ConnectorPruner::new(&fake, &ctx)
            .prune(&active(&[]))
            .await
            .unwrap_err();

        assert!(!failure.result.changed);
        assert_eq!(fake.calls(), vec![Call::List]);
    }
}
