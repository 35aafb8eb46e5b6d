//! Store configuration.
//!
//! A [`StoreConfig`] names a store, optionally picks the adapter type that
//! backs it, and carries the adapter [`StoreSettings`]. Configurations are plain
//! serde types, so a whole set of stores can be described in JSON:
//!
//! ```ignore
//! let configs: StoreConfigs = serde_json::from_str(r#"[
//!     "tags",
//!     { "name": "tasks", "type": "memory", "settings": { "recordId": "taskId", "dataSync": true } }
//! ]"#)?;
//!
//! manager.add(configs)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::record::DEFAULT_RECORD_ID;

fn default_record_id() -> String {
    DEFAULT_RECORD_ID.to_string()
}

/// Adapter settings shared by every store type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    /// The name of the identity field.
    #[serde(default = "default_record_id")]
    pub record_id: String,
    /// Whether the store tracks per-record sync status.
    #[serde(default)]
    pub data_sync: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            record_id: default_record_id(),
            data_sync: false,
        }
    }
}

/// The configuration of one named store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub name: String,
    /// The adapter type name. The registry default is used when absent.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub adapter: Option<String>,
    #[serde(default)]
    pub settings: StoreSettings,
}

impl StoreConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            adapter: None,
            settings: StoreSettings::default(),
        }
    }

    pub fn adapter(mut self, adapter: impl Into<String>) -> Self {
        self.adapter = Some(adapter.into());
        self
    }

    pub fn record_id(mut self, record_id: impl Into<String>) -> Self {
        self.settings.record_id = record_id.into();
        self
    }

    pub fn data_sync(mut self, data_sync: bool) -> Self {
        self.settings.data_sync = data_sync;
        self
    }
}

impl From<&str> for StoreConfig {
    fn from(name: &str) -> Self {
        StoreConfig::new(name)
    }
}

impl From<String> for StoreConfig {
    fn from(name: String) -> Self {
        StoreConfig::new(name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ConfigEntry {
    Name(String),
    Config(StoreConfig),
}

impl From<ConfigEntry> for StoreConfig {
    fn from(entry: ConfigEntry) -> Self {
        match entry {
            ConfigEntry::Name(name) => StoreConfig::new(name),
            ConfigEntry::Config(config) => config,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ConfigShape {
    One(ConfigEntry),
    Many(Vec<ConfigEntry>),
}

impl From<ConfigShape> for StoreConfigs {
    fn from(shape: ConfigShape) -> Self {
        match shape {
            ConfigShape::One(entry) => StoreConfigs(vec![entry.into()]),
            ConfigShape::Many(entries) => StoreConfigs(
                entries
                    .into_iter()
                    .map(Into::into)
                    .collect()
            ),
        }
    }
}

/// One or more store configurations, given as names, configs or a list of either.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "ConfigShape")]
pub struct StoreConfigs(pub Vec<StoreConfig>);

impl IntoIterator for StoreConfigs {
    type Item = StoreConfig;
    type IntoIter = std::vec::IntoIter<StoreConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<&str> for StoreConfigs {
    fn from(name: &str) -> Self {
        StoreConfigs(vec![name.into()])
    }
}

impl From<String> for StoreConfigs {
    fn from(name: String) -> Self {
        StoreConfigs(vec![name.into()])
    }
}

impl From<StoreConfig> for StoreConfigs {
    fn from(config: StoreConfig) -> Self {
        StoreConfigs(vec![config])
    }
}

impl<T: Into<StoreConfig>> From<Vec<T>> for StoreConfigs {
    fn from(configs: Vec<T>) -> Self {
        StoreConfigs(
            configs
                .into_iter()
                .map(Into::into)
                .collect()
        )
    }
}

/// One or more store names, used to unregister stores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreNames(pub Vec<String>);

impl From<&str> for StoreNames {
    fn from(name: &str) -> Self {
        StoreNames(vec![name.to_string()])
    }
}

impl From<String> for StoreNames {
    fn from(name: String) -> Self {
        StoreNames(vec![name])
    }
}

impl<T: Into<String>> From<Vec<T>> for StoreNames {
    fn from(names: Vec<T>) -> Self {
        StoreNames(
            names
                .into_iter()
                .map(Into::into)
                .collect()
        )
    }
}
