//! The uniform CRUD contract implemented by every store adapter.
//!
//! A store is a named, ordered collection of [`Record`]s with a configurable
//! identity field and an optional synchronization mode. Every adapter (in-memory,
//! or anything a caller registers) exposes the same four operations, so
//! application code and the sync bridge never care which one they talk to.
//!
//! # Traits
//!
//! - [`DataStore`]: The core, object-safe contract
//! - [`DataStoreExt`]: Convenience methods available on every store
//! - [`DataStoreBuilder`]: Factory trait for creating store instances
//!
//! # Example
//!
//! ```ignore
//! use synclayer::prelude::*;
//! use bson::doc;
//!
//! let tasks = MemoryStore::builder("tasks").data_sync(true).build().await?;
//!
//! tasks.save(vec![doc! { "id": 1, "title": "Write docs" }.into()], SaveOptions::default()).await?;
//! tasks.remove(1.into()).await?;
//!
//! assert!(tasks.read(None).await?.is_empty());
//! ```

use async_trait::async_trait;
use std::{any::Any, fmt::Debug};

use crate::{
    error::DataStoreResult,
    event::StoreEvents,
    filter::FilterSpec,
    record::{Record, RecordId, SaveOptions, Target},
};

/// Abstract interface for record stores.
///
/// # Visibility
///
/// With synchronization enabled, removed records stay in the store with the
/// `REMOVED` status until purged. They are excluded from every method below.
///
/// # Atomicity
///
/// Implementations must apply each call atomically with respect to other calls
/// on the same store: no two mutating calls may interleave.
#[async_trait]
pub trait DataStore: Send + Sync + Debug {
    /// Returns the store's name.
    fn name(&self) -> &str;

    /// Returns the name of the identity field.
    fn record_id(&self) -> &str;

    /// Returns whether the store tracks per-record sync status.
    fn data_sync(&self) -> bool;

    /// Reads records.
    ///
    /// With no id, returns every visible record. With an id, returns the visible
    /// records whose identity equals it (zero or one).
    async fn read(&self, id: Option<RecordId>) -> DataStoreResult<Vec<Record>>;

    /// Saves records, replacing those with a matching identity in place and
    /// appending the rest.
    ///
    /// With `options.reset`, the incoming records replace the whole set; with
    /// synchronization enabled, existing records missing from the incoming set
    /// are marked removed instead.
    ///
    /// # Returns
    ///
    /// The visible set after the save.
    async fn save(&self, records: Vec<Record>, options: SaveOptions) -> DataStoreResult<Vec<Record>>;

    /// Removes the targeted records, or every record for [`Target::None`].
    ///
    /// Targets without a usable identity value are skipped.
    ///
    /// # Returns
    ///
    /// The visible set after the removal.
    async fn remove(&self, target: Target) -> DataStoreResult<Vec<Record>>;

    /// Returns the visible records matching `spec`, in store order.
    ///
    /// `match_any` selects whether a record must match any or all fields of the
    /// spec. With no spec, every visible record is returned.
    async fn filter(&self, spec: Option<&FilterSpec>, match_any: bool) -> DataStoreResult<Vec<Record>>;

    /// Subscribes to change notifications from this store.
    async fn subscribe(&self) -> StoreEvents;

    fn as_any(&self) -> &dyn Any;
}

/// Convenience methods for every [`DataStore`].
#[async_trait]
pub trait DataStoreExt: DataStore {
    /// Saves a single record without resetting.
    async fn save_one(&self, record: Record) -> DataStoreResult<Vec<Record>> {
        self.save(vec![record], SaveOptions::default())
            .await
    }

    /// Returns the visible record with the given identity, if any.
    async fn find(&self, id: RecordId) -> DataStoreResult<Option<Record>> {
        Ok(
            self.read(Some(id))
                .await?
                .into_iter()
                .next()
        )
    }
}

impl<S: DataStore + ?Sized> DataStoreExt for S {}

impl dyn DataStore {
    /// Attempts to downcast to a concrete store type.
    pub fn downcast_ref<S: DataStore + 'static>(&self) -> Option<&S> {
        self.as_any().downcast_ref::<S>()
    }
}

#[async_trait]
pub trait DataStoreBuilder {
    type Store: DataStore;

    async fn build(self) -> DataStoreResult<Self::Store>;
}
