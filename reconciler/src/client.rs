//! HTTP access to the Kafka Connect REST surface.

use async_trait::async_trait;
use connect_models::{ConnectorConfig, ConnectorSpec};
use connect_observability::log_rest_call;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use std::collections::BTreeSet;

use crate::error::{ConnectError, ConnectResult};

/// Whether a connector is registered on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    /// The server answered 404.
    Absent,
}

impl Presence {
    pub fn is_present(self) -> bool {
        matches!(self, Presence::Present)
    }
}

/// Connector CRUD and lifecycle endpoints of one Connect cluster.
///
/// Every call is a single attempt; nothing is retried or cached.
#[async_trait]
pub trait ConnectApi: Send + Sync {
    /// Collection endpoint, e.g. `http://localhost:8083/connectors`.
    fn base_url(&self) -> &str;

    /// `GET {base}/{name}`
    async fn exists(&self, name: &str) -> ConnectResult<Presence>;

    /// `POST {base}` with `{name, config}`. True iff the server answers 200 or 201.
    async fn create(&self, name: &str, config: &ConnectorConfig) -> ConnectResult<bool>;

    /// `PUT {base}/{name}/config` with the bare config. True iff 200 or 201.
    async fn update_config(&self, name: &str, config: &ConnectorConfig) -> ConnectResult<bool>;

    /// `POST {base}/{name}/restart`. Anything but 200 or 204 is a restart failure.
    async fn restart(&self, name: &str) -> ConnectResult<()>;

    /// `GET {base}`. A 404 means nothing is registered.
    async fn list(&self) -> ConnectResult<BTreeSet<String>>;

    /// `DELETE {base}/{name}`. True iff 200.
    async fn delete(&self, name: &str) -> ConnectResult<bool>;
}

/// [`ConnectApi`] over HTTP with `reqwest`.
#[derive(Clone)]
pub struct ConnectClient {
    client: Client,
    base_url: Url,
}

impl ConnectClient {
    /// Fails when `base_url` is not an absolute URL that can carry path segments.
    pub fn new(client: Client, base_url: &str) -> ConnectResult<Self> {
        let invalid = |reason: String| ConnectError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };

        let mut url = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base URL".to_string()))?
            .pop_if_empty();

        Ok(Self {
            client,
            base_url: url,
        })
    }

    /// `{base}/{name}[/{action}]`, with the name percent-encoded as one path segment.
    fn connector_url(&self, name: &str, action: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(name);
            if let Some(action) = action {
                segments.push(action);
            }
        }
        url
    }

    async fn send(&self, method: Method, url: &Url, request: RequestBuilder) -> ConnectResult<Response> {
        log_rest_call!(method, url);
        let response = request.send().await?;
        log_rest_call!(method, url, response.status());
        Ok(response)
    }

    /// Turns any non-2xx answer into a transport failure.
    async fn ensure_success(method: Method, url: &Url, response: Response) -> ConnectResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        Err(ConnectError::Transport {
            method,
            url: url.to_string(),
            status,
            message: server_message(response).await,
        })
    }
}

#[async_trait]
impl ConnectApi for ConnectClient {
    fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    async fn exists(&self, name: &str) -> ConnectResult<Presence> {
        let url = self.connector_url(name, None);
        let response = self.send(Method::GET, &url, self.client.get(url.clone())).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Presence::Absent);
        }
        Self::ensure_success(Method::GET, &url, response).await?;
        Ok(Presence::Present)
    }

    async fn create(&self, name: &str, config: &ConnectorConfig) -> ConnectResult<bool> {
        let url = &self.base_url;
        let body = ConnectorSpec::new(name, config.clone());
        let request = self.client.post(url.clone()).json(&body);
        let response = self.send(Method::POST, url, request).await?;
        let response = Self::ensure_success(Method::POST, url, response).await?;

        Ok(matches!(response.status(), StatusCode::OK | StatusCode::CREATED))
    }

    async fn update_config(&self, name: &str, config: &ConnectorConfig) -> ConnectResult<bool> {
        let url = self.connector_url(name, Some("config"));
        let request = self.client.put(url.clone()).json(config);
        let response = self.send(Method::PUT, &url, request).await?;
        let response = Self::ensure_success(Method::PUT, &url, response).await?;

        Ok(matches!(response.status(), StatusCode::OK | StatusCode::CREATED))
    }

    async fn restart(&self, name: &str) -> ConnectResult<()> {
        let url = self.connector_url(name, Some("restart"));
        let response = self.send(Method::POST, &url, self.client.post(url.clone())).await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            _ => Err(ConnectError::RestartFailed {
                name: name.to_string(),
                message: server_message(response).await,
            }),
        }
    }

    async fn list(&self) -> ConnectResult<BTreeSet<String>> {
        let url = &self.base_url;
        let response = self.send(Method::GET, url, self.client.get(url.clone())).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(BTreeSet::new());
        }
        let response = Self::ensure_success(Method::GET, url, response).await?;

        let body = response.bytes().await?;
        let names: Vec<String> = serde_json::from_slice(&body)?;
        Ok(names.into_iter().collect())
    }

    async fn delete(&self, name: &str) -> ConnectResult<bool> {
        let url = self.connector_url(name, None);
        let response = self.send(Method::DELETE, &url, self.client.delete(url.clone())).await?;
        let response = Self::ensure_success(Method::DELETE, &url, response).await?;

        Ok(response.status() == StatusCode::OK)
    }
}

/// Message the server attached to a response.
///
/// Connect reports errors as `{"error_code": .., "message": ".."}`; other bodies
/// are used verbatim, and an empty body falls back to the status reason.
async fn server_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    if let Ok(serde_json::Value::Object(body)) = serde_json::from_str::<serde_json::Value>(&text) {
        if let Some(message) = body.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }

    if text.trim().is_empty() {
        status.canonical_reason().unwrap_or("Unknown error").to_string()
    } else {
        text
    }
}
