//! Documents exchanged with the orchestration host.

use serde::{Deserialize, Serialize};

use crate::connector::{ActiveList, ConnectorConfig};
use crate::operation::{OperationOutcome, OperationResult};

/// Top-level failure text shown by the host.
pub const FAILURE_MSG: &str = "An error occurred while running the module";

#[derive(Debug, Clone, Deserialize)]
pub struct UpsertParams {
    pub connect_url: String,
    pub name: String,
    pub config: ConnectorConfig,
    #[serde(default, rename = "_ansible_check_mode", alias = "check_mode")]
    pub check_mode: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PruneParams {
    pub connect_url: String,
    pub active_connectors: ActiveList,
    #[serde(default, rename = "_ansible_check_mode", alias = "check_mode")]
    pub check_mode: bool,
}

/// JSON document printed for the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(flatten)]
    pub result: OperationResult,
}

impl ModuleResponse {
    pub fn success(result: OperationResult) -> Self {
        Self {
            failed: None,
            msg: None,
            result,
        }
    }

    pub fn failure(msg: impl Into<String>, result: OperationResult) -> Self {
        Self {
            failed: Some(true),
            msg: Some(msg.into()),
            result,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failed.unwrap_or(false)
    }
}

impl From<OperationOutcome> for ModuleResponse {
    fn from(outcome: OperationOutcome) -> Self {
        match outcome {
            Ok(result) => Self::success(result),
            Err(failure) => Self::failure(FAILURE_MSG, failure.result),
        }
    }
}
