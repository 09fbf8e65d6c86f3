use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Connector configuration as accepted by the Connect REST server.
///
/// Values stay as raw JSON; the server owns the schema.
pub type ConnectorConfig = serde_json::Map<String, serde_json::Value>;

/// Body of `POST /connectors`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectorSpec {
    pub name: String,
    pub config: ConnectorConfig,
}

impl ConnectorSpec {
    pub fn new(name: impl Into<String>, config: ConnectorConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Names of the connectors that should stay registered.
///
/// Duplicates collapse and ordering carries no meaning.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ActiveList(BTreeSet<String>);

impl ActiveList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Registered names that are not in the active list, in lexicographic order.
    pub fn excess<'a, I>(&self, registered: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        registered
            .into_iter()
            .filter(|name| !self.contains(name))
            .cloned()
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ActiveList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
