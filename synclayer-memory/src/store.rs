//! In-memory implementation of the store contract.
//!
//! [`MemoryStore`] keeps a [`RecordSet`] behind an async-aware read-write lock,
//! so one store can be shared across tasks and every call is applied atomically.

use std::{any::Any, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;

use synclayer_core::{
    config::{StoreConfig, StoreSettings},
    error::DataStoreResult,
    event::{StoreEvent, StoreEvents, Subscribers},
    filter::FilterSpec,
    record::{Record, RecordId, SaveOptions, Target},
    status::SyncStatus,
    store::{DataStore, DataStoreBuilder},
};

use crate::record_set::{Entry, RecordSet};


/// Thread-safe in-memory record store.
///
/// `MemoryStore` is cloneable; clones share the same records and subscribers.
///
/// # Synchronization
///
/// With `data_sync` enabled the store tracks a [`SyncStatus`] per record,
/// generates identity values for records saved without one, keeps removed
/// records as tombstones until [`MemoryStore::purge`] and publishes a
/// [`StoreEvent`] to subscribers after each save that was not issued with
/// `no_sync`.
///
/// # Example
///
/// ```ignore
/// use synclayer_memory::MemoryStore;
/// use synclayer_core::{store::DataStore, record::SaveOptions};
/// use bson::doc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryStore::new("tasks");
///
///     store.save(vec![doc! { "id": 1, "title": "Write docs" }.into()], SaveOptions::default()).await?;
///
///     let tasks = store.read(Some(1.into())).await?;
///     assert_eq!(tasks.len(), 1);
///
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct MemoryStore {
    // copies of the record set's settings, fixed at construction, so the
    // synchronous getters never take the lock
    name: String,
    record_id: String,
    data_sync: bool,
    records: Arc<RwLock<RecordSet>>,
    subscribers: Arc<RwLock<Subscribers>>,
}

impl MemoryStore {
    /// Creates an empty store with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_settings(name, StoreSettings::default())
    }

    pub fn with_settings(name: impl Into<String>, settings: StoreSettings) -> Self {
        let name = name.into();

        Self {
            record_id: settings.record_id.clone(),
            data_sync: settings.data_sync,
            records: Arc::new(RwLock::new(RecordSet::new(name.clone(), settings))),
            subscribers: Arc::new(RwLock::new(Subscribers::new())),
            name,
        }
    }

    /// Creates a store from a registry configuration.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::with_settings(config.name.clone(), config.settings.clone())
    }

    /// Creates a builder for a store named `name`.
    ///
    /// ```ignore
    /// let store = MemoryStore::builder("tasks")
    ///     .record_id("taskId")
    ///     .data_sync(true)
    ///     .build()
    ///     .await?;
    /// ```
    pub fn builder(name: impl Into<String>) -> MemoryStoreBuilder {
        MemoryStoreBuilder::new(name)
    }

    /// Physically deletes records marked removed and returns them.
    ///
    /// Intended for a sync layer once the removals have been pushed to the
    /// remote source.
    pub async fn purge(&self) -> Vec<Record> {
        self.records
            .write()
            .await
            .purge()
    }

    /// Returns the sync status of a record, including removed ones.
    pub async fn sync_status(&self, id: &RecordId) -> Option<SyncStatus> {
        self.records
            .read()
            .await
            .sync_status(id)
    }

    /// Returns a snapshot of every entry, including removed ones.
    pub async fn entries(&self) -> Vec<Entry> {
        self.records
            .read()
            .await
            .entries()
            .to_vec()
    }

    /// Returns the number of visible records.
    pub async fn len(&self) -> usize {
        self.records
            .read()
            .await
            .len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn record_id(&self) -> &str {
        &self.record_id
    }

    fn data_sync(&self) -> bool {
        self.data_sync
    }

    async fn read(&self, id: Option<RecordId>) -> DataStoreResult<Vec<Record>> {
        Ok(
            self.records
                .read()
                .await
                .read(id.as_ref())
        )
    }

    async fn save(&self, records: Vec<Record>, options: SaveOptions) -> DataStoreResult<Vec<Record>> {
        let mut set = self.records.write().await;
        let visible = set.save(records, options.reset);

        // notify while still holding the write lock so events arrive in save order
        if self.data_sync && !options.no_sync {
            self.subscribers
                .write()
                .await
                .notify(StoreEvent {
                    store: self.name.clone(),
                    records: visible.clone(),
                });
        }

        drop(set);

        Ok(visible)
    }

    async fn remove(&self, target: Target) -> DataStoreResult<Vec<Record>> {
        Ok(
            self.records
                .write()
                .await
                .remove(&target)
        )
    }

    async fn filter(&self, spec: Option<&FilterSpec>, match_any: bool) -> DataStoreResult<Vec<Record>> {
        Ok(
            self.records
                .read()
                .await
                .filter(spec, match_any)
        )
    }

    async fn subscribe(&self) -> StoreEvents {
        self.subscribers
            .write()
            .await
            .subscribe()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}


/// Builder for constructing [`MemoryStore`] instances.
#[derive(Debug, Clone)]
pub struct MemoryStoreBuilder {
    name: String,
    settings: StoreSettings,
}

impl MemoryStoreBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: StoreSettings::default(),
        }
    }

    /// Sets the name of the identity field. Defaults to `"id"`.
    pub fn record_id(mut self, record_id: impl Into<String>) -> Self {
        self.settings.record_id = record_id.into();
        self
    }

    pub fn data_sync(mut self, data_sync: bool) -> Self {
        self.settings.data_sync = data_sync;
        self
    }
}

#[async_trait]
impl DataStoreBuilder for MemoryStoreBuilder {
    type Store = MemoryStore;

    async fn build(self) -> DataStoreResult<Self::Store> {
        Ok(MemoryStore::with_settings(self.name, self.settings))
    }
}
