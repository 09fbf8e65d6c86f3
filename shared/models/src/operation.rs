use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome reported back to the invoking host.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationResult {
    pub changed: bool,
    pub message: String,
}

impl OperationResult {
    pub fn new(changed: bool, message: impl Into<String>) -> Self {
        Self {
            changed,
            message: message.into(),
        }
    }

    /// Result of a run that did not touch the server.
    pub fn unchanged() -> Self {
        Self::default()
    }
}

/// A failed operation. The embedded result is always fully populated with
/// `changed = false` and the error text as message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFailure {
    pub result: OperationResult,
}

impl OperationFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            result: OperationResult::new(false, message),
        }
    }

    pub fn message(&self) -> &str {
        &self.result.message
    }
}

impl fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.result.message)
    }
}

impl std::error::Error for OperationFailure {}

pub type OperationOutcome = Result<OperationResult, OperationFailure>;
