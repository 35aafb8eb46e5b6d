//! A thin abstraction for managing named collections of records across pluggable
//! backends behind one uniform CRUD contract.
//!
//! This crate is the core of the synclayer project and provides:
//!
//! - **Records** ([`record`]) - Schemaless records, identity values, remove targets and save options
//! - **Store contract** ([`store`]) - The async, object-safe trait every store adapter implements
//! - **Filtering** ([`filter`]) - Declarative multi-field, multi-value predicates
//! - **Sync status** ([`status`]) - The per-record state machine used to reconcile with a remote source
//! - **Change notifications** ([`event`]) - Subscriptions to store mutations
//! - **Registry** ([`manager`]) - Named stores instantiated from configuration
//! - **Configuration** ([`config`]) - Serde-friendly store configuration
//! - **Remote boundary** ([`bridge`]) - The transport trait, the sync bridge and pipes
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use synclayer::prelude::*;
//! use bson::doc;
//!
//! let tasks = MemoryStore::builder("tasks").data_sync(true).build().await?;
//!
//! tasks.save(
//!     vec![doc! { "id": 1, "title": "Write docs", "tags": ["docs"] }.into()],
//!     SaveOptions::default(),
//! ).await?;
//!
//! let docs = tasks
//!     .filter(Some(&FilterSpec::new().eq("tags", "docs")), false)
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as synclayer_core;

pub mod bridge;
pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod manager;
pub mod record;
pub mod status;
pub mod store;
