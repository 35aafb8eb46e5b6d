//! Registry of named stores.
//!
//! A [`DataManager`] maps adapter type names to factories, instantiates stores
//! from [`StoreConfig`]s and keeps them by name until they are explicitly
//! removed.
//!
//! ```ignore
//! let mut manager = DataManager::new()
//!     .with_adapter("memory", |config| Ok(Arc::new(MemoryStore::from_config(config)) as _))
//!     .with_default_adapter("memory");
//!
//! manager.add(vec!["tags", "projects"])?;
//! manager.add(StoreConfig::new("tasks").data_sync(true))?;
//!
//! let tasks = manager.store("tasks")?;
//! ```

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    config::{StoreConfig, StoreConfigs, StoreNames},
    error::{DataStoreError, DataStoreResult},
    store::DataStore,
};

/// Builds a store from its configuration.
pub type AdapterFactory =
    Arc<dyn Fn(&StoreConfig) -> DataStoreResult<Arc<dyn DataStore>> + Send + Sync>;

#[derive(Clone, Default)]
pub struct DataManager {
    adapters: HashMap<String, AdapterFactory>,
    default_adapter: Option<String>,
    stores: HashMap<String, Arc<dyn DataStore>>,
}

impl DataManager {
    /// Creates a registry with no adapters and no stores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an adapter factory under `name`.
    pub fn with_adapter<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&StoreConfig) -> DataStoreResult<Arc<dyn DataStore>> + Send + Sync + 'static,
    {
        self.register_adapter(name, factory);
        self
    }

    /// Sets the adapter used for configs that do not name one.
    pub fn with_default_adapter(mut self, name: impl Into<String>) -> Self {
        self.default_adapter = Some(name.into());
        self
    }

    /// Registers an adapter factory under `name`, replacing any previous one.
    pub fn register_adapter<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&StoreConfig) -> DataStoreResult<Arc<dyn DataStore>> + Send + Sync + 'static,
    {
        self.adapters.insert(name.into(), Arc::new(factory));
        self
    }

    /// Instantiates and registers stores.
    ///
    /// A store registered under an existing name replaces the old one. Either
    /// every config is added or, on error, none is.
    ///
    /// # Errors
    ///
    /// Returns [`DataStoreError::UnknownAdapter`] if a config names an unregistered
    /// adapter type, or any error raised by an adapter factory.
    pub fn add(&mut self, configs: impl Into<StoreConfigs>) -> DataStoreResult<&mut Self> {
        let stores = configs
            .into()
            .into_iter()
            .map(|config| self.instantiate(&config))
            .collect::<DataStoreResult<Vec<_>>>()?;

        for store in stores {
            tracing::info!(store = store.name(), "registered store");
            self.stores.insert(store.name().to_string(), store);
        }

        Ok(self)
    }

    /// Unregisters stores by name. Unknown names are ignored.
    pub fn remove(&mut self, names: impl Into<StoreNames>) -> &mut Self {
        for name in names.into().0 {
            if self.stores.remove(&name).is_some() {
                tracing::info!(store = name.as_str(), "unregistered store");
            }
        }

        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn DataStore>> {
        self.stores.get(name).cloned()
    }

    /// Like [`DataManager::get`], but fails for unknown names.
    pub fn store(&self, name: &str) -> DataStoreResult<Arc<dyn DataStore>> {
        self.get(name)
            .ok_or_else(|| DataStoreError::StoreNotFound(name.to_string()))
    }

    /// Returns the names of all registered stores, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names = self.stores
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        names.sort();

        names
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    fn instantiate(&self, config: &StoreConfig) -> DataStoreResult<Arc<dyn DataStore>> {
        let adapter = config
            .adapter
            .as_deref()
            .or(self.default_adapter.as_deref())
            .ok_or_else(|| DataStoreError::InvalidArgument(format!(
                "no adapter type given for store {} and no default adapter set",
                config.name
            )))?;

        let factory = self.adapters
            .get(adapter)
            .ok_or_else(|| DataStoreError::UnknownAdapter(adapter.to_string()))?;

        factory(config)
    }
}

impl fmt::Debug for DataManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataManager")
            .field("adapters", &self.adapters.keys().collect::<Vec<_>>())
            .field("default_adapter", &self.default_adapter)
            .field("stores", &self.stores)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_adapters_are_rejected() {
        let mut manager = DataManager::new().with_default_adapter("memory");

        let err = manager.add("tasks").unwrap_err();

        assert!(matches!(err, DataStoreError::UnknownAdapter(name) if name == "memory"));
        assert!(manager.is_empty());
    }

    #[test]
    fn missing_default_adapter_is_an_invalid_argument() {
        let mut manager = DataManager::new();

        assert!(matches!(
            manager.add("tasks"),
            Err(DataStoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            manager.store("tasks"),
            Err(DataStoreError::StoreNotFound(name)) if name == "tasks"
        ));
    }
}
