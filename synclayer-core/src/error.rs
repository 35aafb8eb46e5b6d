//! Error types and result types for data store operations.
//!
//! The in-memory store itself is total over its input domain and never fails;
//! errors come from the registry, the remote boundary and record conversion.
//! Use [`DataStoreResult<T>`] as the return type for fallible operations.

use std::convert::Infallible;
use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when working with data stores and pipes.
#[derive(Error, Debug)]
pub enum DataStoreError {
    /// The caller broke an argument contract, e.g. a remote remove request
    /// without any usable identity value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// No store is registered under the given name.
    #[error("Store not found: {0}")]
    StoreNotFound(String),
    /// No adapter factory is registered under the given type name.
    #[error("Unknown adapter type: {0}")]
    UnknownAdapter(String),
    /// Serialization/deserialization error when converting between record formats (BSON, JSON, typed).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The remote transport failed to complete a request.
    #[error("Transport error: {0}")]
    Transport(String),
    /// An unknown error occurred.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// A specialized `Result` type for data store operations.
pub type DataStoreResult<T> = Result<T, DataStoreError>;

impl From<BsonError> for DataStoreError {
    fn from(err: BsonError) -> Self {
        DataStoreError::Serialization(err.to_string())
    }
}

impl From<Infallible> for DataStoreError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl From<SerdeJsonError> for DataStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DataStoreError::Serialization(err.to_string())
    }
}
