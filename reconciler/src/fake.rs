//! In-memory Connect server for unit tests.

use async_trait::async_trait;
use connect_models::ConnectorConfig;
use reqwest::{Method, StatusCode};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use crate::client::{ConnectApi, Presence};
use crate::error::{ConnectError, ConnectResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Exists(String),
    Create(String),
    UpdateConfig(String),
    Restart(String),
    List,
    Delete(String),
}

#[derive(Default)]
pub struct FakeConnect {
    pub connectors: Mutex<BTreeMap<String, ConnectorConfig>>,
    pub calls: Mutex<Vec<Call>>,
    /// Create/update answer a status the caller does not count as accepted.
    pub reject_writes: bool,
    pub fail_restart: bool,
    pub fail_list: bool,
    /// Deletes of these names answer 202 and leave the connector in place.
    pub unconfirmed_deletes: BTreeSet<String>,
    /// Deletes of these names answer 500.
    pub broken_deletes: BTreeSet<String>,
}

impl FakeConnect {
    pub fn with_connectors(names: &[&str]) -> Self {
        let fake = Self::default();
        {
            let mut connectors = fake.connectors.lock().unwrap();
            for name in names {
                connectors.insert(name.to_string(), ConnectorConfig::new());
            }
        }
        fake
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn registered(&self) -> Vec<String> {
        self.connectors.lock().unwrap().keys().cloned().collect()
    }

    pub fn config_of(&self, name: &str) -> Option<ConnectorConfig> {
        self.connectors.lock().unwrap().get(name).cloned()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn server_error(&self, method: Method, path: &str) -> ConnectError {
        ConnectError::Transport {
            method,
            url: format!("{}/{}", self.base_url(), path),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal Server Error".to_string(),
        }
    }
}

#[async_trait]
impl ConnectApi for FakeConnect {
    fn base_url(&self) -> &str {
        "http://connect.test/connectors"
    }

    async fn exists(&self, name: &str) -> ConnectResult<Presence> {
        self.record(Call::Exists(name.to_string()));
        if self.connectors.lock().unwrap().contains_key(name) {
            Ok(Presence::Present)
        } else {
            Ok(Presence::Absent)
        }
    }

    async fn create(&self, name: &str, config: &ConnectorConfig) -> ConnectResult<bool> {
        self.record(Call::Create(name.to_string()));
        if self.reject_writes {
            return Ok(false);
        }
        self.connectors
            .lock()
            .unwrap()
            .insert(name.to_string(), config.clone());
        Ok(true)
    }

    async fn update_config(&self, name: &str, config: &ConnectorConfig) -> ConnectResult<bool> {
        self.record(Call::UpdateConfig(name.to_string()));
        if self.reject_writes {
            return Ok(false);
        }
        self.connectors
            .lock()
            .unwrap()
            .insert(name.to_string(), config.clone());
        Ok(true)
    }

    async fn restart(&self, name: &str) -> ConnectResult<()> {
        self.record(Call::Restart(name.to_string()));
        if self.fail_restart {
            return Err(ConnectError::RestartFailed {
                name: name.to_string(),
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(())
    }

    async fn list(&self) -> ConnectResult<BTreeSet<String>> {
        self.record(Call::List);
        if self.fail_list {
            return Err(self.server_error(Method::GET, ""));
        }
        Ok(self.connectors.lock().unwrap().keys().cloned().collect())
    }

    async fn delete(&self, name: &str) -> ConnectResult<bool> {
        self.record(Call::Delete(name.to_string()));
        if self.broken_deletes.contains(name) {
            return Err(self.server_error(Method::DELETE, name));
        }
        if self.unconfirmed_deletes.contains(name) {
            return Ok(false);
        }
        self.connectors.lock().unwrap().remove(name);
        Ok(true)
    }
}
