//! In-memory record storage for synclayer.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `DataStore` contract. Records live in insertion order inside a
//! [`RecordSet`], guarded by an async-aware read-write lock.
//!
//! # Features
//!
//! - **Identity-based upserts** - Records with a known identity are replaced in place
//! - **Declarative filtering** - Multi-field, multi-value predicates over schemaless records
//! - **Sync tracking** - Optional per-record `NEW`/`MODIFIED`/`REMOVED` status with reconciliation
//! - **Change notifications** - Subscribers are told about local saves on synchronized stores
//!
//! # Quick Start
//!
//! ```ignore
//! use synclayer_core::{store::{DataStore, DataStoreBuilder}, record::SaveOptions, filter::FilterSpec};
//! use synclayer_memory::MemoryStore;
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::builder("tasks").data_sync(true).build().await?;
//!
//!     store.save(
//!         vec![
//!             doc! { "title": "Write docs", "tags": ["docs"] }.into(),
//!             doc! { "title": "Fix bug", "tags": ["bug", "urgent"] }.into(),
//!         ],
//!         SaveOptions::default(),
//!     ).await?;
//!
//!     let urgent = store
//!         .filter(Some(&FilterSpec::new().any_of("tags", ["urgent", "blocker"])), false)
//!         .await?;
//!     assert_eq!(urgent.len(), 1);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as synclayer_memory;

pub mod store;
pub mod record_set;
mod evaluator;

pub use store::{MemoryStore, MemoryStoreBuilder};
pub use record_set::{Entry, RecordSet};
