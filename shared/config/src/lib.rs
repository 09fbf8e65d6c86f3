use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;

pub const DEFAULT_SERVICE_NAME: &str = "connect-reconciler";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub http_client: Client,
    pub service_name: String,
    pub environment: String,
}

impl AppConfig {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenv::dotenv().is_ok() {
            tracing::debug!("Loaded environment from .env");
        }

        Ok(Self {
            http_client: build_http_client()?,
            service_name: std::env::var("SERVICE_NAME")
                .unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()),
        })
    }
}

/// HTTP client shared by every call of one invocation.
///
/// Timeouts are left at the client defaults.
pub fn build_http_client() -> Result<Client, ConfigError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = Client::builder()
        .user_agent(concat!("connect-reconciler/", env!("CARGO_PKG_VERSION")))
        .default_headers(headers)
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        std::env::remove_var("SERVICE_NAME");
        std::env::remove_var("ENVIRONMENT");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.service_name, DEFAULT_SERVICE_NAME);
        assert_eq!(config.environment, "dev");
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        std::env::set_var("SERVICE_NAME", "connect-prune");
        std::env::set_var("ENVIRONMENT", "staging");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.service_name, "connect-prune");
        assert_eq!(config.environment, "staging");

        std::env::remove_var("SERVICE_NAME");
        std::env::remove_var("ENVIRONMENT");
    }
}
