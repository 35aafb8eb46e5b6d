//! Convenient re-exports of commonly used types from synclayer.
//!
//! ```ignore
//! use synclayer::prelude::*;
//! ```

pub use synclayer_core::{
    bridge::{Pipe, SyncBridge, Transport},
    config::{StoreConfig, StoreConfigs, StoreNames, StoreSettings},
    error::{DataStoreError, DataStoreResult},
    event::{StoreEvent, StoreEvents},
    filter::{FieldClause, FieldFilter, FilterSpec, FilterVisitor},
    manager::{AdapterFactory, DataManager},
    record::{Record, RecordId, SaveOptions, Target, TargetItem},
    status::SyncStatus,
    store::{DataStore, DataStoreBuilder, DataStoreExt},
};

pub use synclayer_memory::{MemoryStore, MemoryStoreBuilder};
