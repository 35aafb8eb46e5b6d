//! Main synclayer crate providing one interface for named record stores.
//!
//! This crate is the primary entry point for users of synclayer. It re-exports
//! the core contract from `synclayer-core` and the bundled in-memory adapter.
//!
//! # Features
//!
//! - **Uniform CRUD** - `read`, `save`, `remove` and `filter` behave the same on every adapter
//! - **Schemaless records** - Records are BSON documents with a configurable identity field
//! - **Offline sync support** - Synchronized stores track `NEW`/`MODIFIED`/`REMOVED` per record
//! - **Registry** - Stores are created by name from serde-friendly configuration
//!
//! # Quick Start
//!
//! ```ignore
//! use synclayer::prelude::*;
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> DataStoreResult<()> {
//!     let mut manager = synclayer::data_manager();
//!     manager.add(vec![
//!         StoreConfig::new("tasks").data_sync(true),
//!         StoreConfig::new("tags"),
//!     ])?;
//!
//!     let tasks = manager.store("tasks")?;
//!
//!     tasks.save(
//!         vec![
//!             doc! { "title": "Write docs", "status": "open", "tags": ["docs"] }.into(),
//!             doc! { "title": "Fix bug", "status": "closed", "tags": ["bug"] }.into(),
//!         ],
//!         SaveOptions::default(),
//!     ).await?;
//!
//!     let open = tasks
//!         .filter(Some(&FilterSpec::new().eq("status", "open")), false)
//!         .await?;
//!
//!     println!("Open tasks: {:?}", open);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Syncing with a remote source
//!
//! Stores never talk to the network. A [`bridge::Pipe`] wraps a caller-provided
//! [`bridge::Transport`] and applies each successful remote result to the
//! attached stores:
//!
//! ```ignore
//! let pipe = Pipe::new("tasks", "id", RestTransport::new("https://example.com/tasks"));
//! let stores = [manager.store("tasks")?];
//!
//! // Reconcile the local copy with the remote collection
//! pipe.read(None, &stores).await?;
//! ```
//!
//! # Adapters
//!
//! - [`memory`] - In-memory storage, registered as the default adapter by [`data_manager`]

pub mod prelude;

pub use synclayer_core::{bridge, config, error, event, filter, manager, record, status, store};

// Re-export BSON types for convenience
pub use bson;

use std::sync::Arc;

use manager::DataManager;
use store::DataStore;

/// In-memory storage adapter.
pub mod memory {
    pub use synclayer_memory::{Entry, MemoryStore, MemoryStoreBuilder, RecordSet};

    /// The adapter type name the in-memory store is registered under.
    pub const ADAPTER: &str = "memory";
}

/// Creates a registry with the in-memory adapter registered as the default.
pub fn data_manager() -> DataManager {
    DataManager::new()
        .with_adapter(memory::ADAPTER, |config| {
            Ok(Arc::new(memory::MemoryStore::from_config(config)) as Arc<dyn DataStore>)
        })
        .with_default_adapter(memory::ADAPTER)
}
