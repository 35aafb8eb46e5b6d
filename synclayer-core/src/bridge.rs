//! The contract between remote transports and local stores.
//!
//! Data only flows one way here: from a remote source into stores. A store
//! never initiates network calls itself. A [`Transport`] performs the requests;
//! once one succeeds, the [`SyncBridge`] applies its result to every attached store:
//!
//! | Remote request      | Store call                          |
//! |---------------------|-------------------------------------|
//! | fetch               | `save(records, reset)`              |
//! | create / update     | `save(record)`                      |
//! | delete              | `remove(id used in the request)`    |
//!
//! Bridge saves are issued with `no_sync` so that remote results are not
//! re-announced to subscribers as local changes.
//!
//! A [`Pipe`] ties a transport to a named remote collection and drives both halves:
//!
//! ```ignore
//! let pipe = Pipe::new("tasks", "id", MyRestTransport::new("https://example.com/tasks"));
//! let stores = [manager.store("tasks")?];
//!
//! pipe.read(None, &stores).await?;
//! pipe.save(doc! { "title": "New task" }.into(), &stores).await?;
//! pipe.remove(1.into(), &stores).await?;
//! ```

use async_trait::async_trait;
use bson::Document;
use std::{fmt::Debug, sync::Arc};

use crate::{
    error::{DataStoreError, DataStoreResult},
    record::{Record, RecordId, SaveOptions, Target},
    store::DataStore,
};

/// Issues requests against a remote endpoint and resolves with parsed bodies.
///
/// Implementations own retries, cancellation and wire formats; errors should be
/// reported as [`DataStoreError::Transport`].
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Fetches the remote collection, optionally narrowed by query parameters.
    async fn fetch(&self, params: Option<Document>) -> DataStoreResult<Vec<Record>>;

    /// Creates (no identity value) or updates (identity value present) a record,
    /// resolving with the record as stored remotely.
    async fn save(&self, record: Record) -> DataStoreResult<Record>;

    /// Deletes one record, or the whole collection for `None`.
    async fn delete(&self, id: Option<RecordId>) -> DataStoreResult<()>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn fetch(&self, params: Option<Document>) -> DataStoreResult<Vec<Record>> {
        (**self).fetch(params).await
    }

    async fn save(&self, record: Record) -> DataStoreResult<Record> {
        (**self).save(record).await
    }

    async fn delete(&self, id: Option<RecordId>) -> DataStoreResult<()> {
        (**self).delete(id).await
    }
}

/// Applies successful remote results to a set of stores.
#[derive(Debug, Clone, Copy)]
pub struct SyncBridge<'a> {
    stores: &'a [Arc<dyn DataStore>],
}

impl<'a> SyncBridge<'a> {
    pub fn new(stores: &'a [Arc<dyn DataStore>]) -> Self {
        Self { stores }
    }

    /// Seeds or reconciles every store with a fetched collection.
    pub async fn fetched(&self, records: Vec<Record>) -> DataStoreResult<()> {
        for store in self.stores {
            tracing::debug!(store = store.name(), count = records.len(), "applying fetched records");

            store
                .save(records.clone(), SaveOptions::reset().no_sync())
                .await?;
        }

        Ok(())
    }

    /// Applies a created or updated record to every store.
    pub async fn saved(&self, record: Record) -> DataStoreResult<()> {
        for store in self.stores {
            store
                .save(vec![record.clone()], SaveOptions::default().no_sync())
                .await?;
        }

        Ok(())
    }

    /// Applies a deletion to every store. `None` removes everything.
    pub async fn removed(&self, id: Option<RecordId>) -> DataStoreResult<()> {
        for store in self.stores {
            store
                .remove(Target::from(id.clone()))
                .await?;
        }

        Ok(())
    }
}

/// A named remote collection reached through a [`Transport`].
#[derive(Debug, Clone)]
pub struct Pipe<T: Transport> {
    name: String,
    record_id: String,
    transport: T,
}

impl<T: Transport> Pipe<T> {
    pub fn new(name: impl Into<String>, record_id: impl Into<String>, transport: T) -> Self {
        Self {
            name: name.into(),
            record_id: record_id.into(),
            transport,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches the remote collection and reconciles `stores` with it.
    pub async fn read(
        &self,
        params: Option<Document>,
        stores: &[Arc<dyn DataStore>],
    ) -> DataStoreResult<Vec<Record>> {
        let records = self.transport.fetch(params).await?;

        SyncBridge::new(stores)
            .fetched(records.clone())
            .await?;

        Ok(records)
    }

    /// Creates or updates a record remotely and applies the result to `stores`.
    pub async fn save(&self, record: Record, stores: &[Arc<dyn DataStore>]) -> DataStoreResult<Record> {
        let saved = self.transport.save(record).await?;

        SyncBridge::new(stores)
            .saved(saved.clone())
            .await?;

        Ok(saved)
    }

    /// Deletes the targeted records remotely and removes them from `stores`.
    ///
    /// # Errors
    ///
    /// Returns [`DataStoreError::InvalidArgument`] before issuing any request if
    /// the target yields no identity value. Use [`Pipe::remove_all`] to delete
    /// the whole collection.
    pub async fn remove(&self, target: Target, stores: &[Arc<dyn DataStore>]) -> DataStoreResult<()> {
        let ids = target
            .resolve(&self.record_id)
            .unwrap_or_default();

        if ids.is_empty() {
            tracing::warn!(pipe = self.name.as_str(), "rejected remove without an identity value");

            return Err(DataStoreError::InvalidArgument(format!(
                "remove on pipe {} requires an identity value in field {}",
                self.name, self.record_id
            )));
        }

        let bridge = SyncBridge::new(stores);

        for id in ids {
            self.transport
                .delete(Some(id.clone()))
                .await?;
            bridge.removed(Some(id)).await?;
        }

        Ok(())
    }

    /// Deletes the whole remote collection and empties `stores`.
    pub async fn remove_all(&self, stores: &[Arc<dyn DataStore>]) -> DataStoreResult<()> {
        self.transport.delete(None).await?;

        SyncBridge::new(stores)
            .removed(None)
            .await
    }
}
