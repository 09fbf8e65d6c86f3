use reqwest::{Method, StatusCode};
use thiserror::Error;

pub type ConnectResult<T> = Result<T, ConnectError>;

/// Failures talking to the Connect REST server.
///
/// A 404 on the existence or list endpoints is not an error and never shows up
/// here.
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("HTTP Error {status} on {method} {url}: {message}")]
    Transport {
        method: Method,
        url: String,
        status: StatusCode,
        message: String,
    },

    #[error("Invalid Connect URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Connector {name} failed to restart after a configuration update. {message}")]
    RestartFailed { name: String, message: String },

    #[error("Connect REST request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response from Connect REST server: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ConnectError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ConnectError::Transport { status, .. } => Some(*status),
            ConnectError::Http(err) => err.status(),
            _ => None,
        }
    }
}
