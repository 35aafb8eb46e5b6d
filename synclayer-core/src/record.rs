//! Core types for record representation and addressing.
//!
//! A [`Record`] is an open mapping from field names to BSON values. Exactly one
//! field per store is the identity field; its value is a [`RecordId`]. Removal
//! requests address records through a [`Target`], which accepts identity values,
//! whole records, sequences of either, or nothing at all.

use bson::{Bson, Document, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt;

use crate::error::{DataStoreError, DataStoreResult};

/// The default name of the identity field.
pub const DEFAULT_RECORD_ID: &str = "id";

/// A single data item held by a store.
///
/// Records are schemaless. Any serde type that serializes to a document can be
/// turned into a record and back again.
///
/// # Example
///
/// ```ignore
/// use synclayer::record::Record;
/// use bson::doc;
///
/// let task = Record::from(doc! { "id": 1, "title": "Write docs", "tags": ["docs"] });
/// assert_eq!(task.id("id"), Some(1.into()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Document);

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self(Document::new())
    }

    /// Converts any serializable value into a record.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the value does not serialize to a document.
    pub fn from_serializable<T: Serialize>(value: &T) -> DataStoreResult<Self> {
        match serialize_to_bson(value)? {
            Bson::Document(document) => Ok(Self(document)),
            other => Err(DataStoreError::Serialization(format!(
                "expected a document, got {other}"
            ))),
        }
    }

    /// Deserializes this record into a typed value.
    ///
    /// # Errors
    ///
    /// Returns an error if the record's structure does not match `T`.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> DataStoreResult<T> {
        Ok(deserialize_from_bson(Bson::Document(self.0.clone()))?)
    }

    /// Converts this record to a JSON value.
    pub fn to_json(&self) -> DataStoreResult<Value> {
        Ok(serde_json::to_value(&self.0)?)
    }

    /// Returns the identity value stored under `record_id`, if present.
    ///
    /// A `Null` or NaN value counts as absent, since neither can name a record.
    pub fn id(&self, record_id: &str) -> Option<RecordId> {
        match self.0.get(record_id) {
            None | Some(Bson::Null) => None,
            Some(Bson::Double(value)) if value.is_nan() => None,
            Some(value) => Some(RecordId(value.clone())),
        }
    }

    /// Returns the value of a field.
    pub fn get(&self, field: &str) -> Option<&Bson> {
        self.0.get(field)
    }

    /// Sets the value of a field, returning the previous value if any.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Bson>) -> Option<Bson> {
        self.0.insert(field.into(), value.into())
    }

    pub fn as_document(&self) -> &Document {
        &self.0
    }

    pub fn into_document(self) -> Document {
        self.0
    }
}

impl From<Document> for Record {
    fn from(document: Document) -> Self {
        Self(document)
    }
}

impl From<Record> for Document {
    fn from(record: Record) -> Self {
        record.0
    }
}

/// The value of a record's identity field.
///
/// Identity values are scalars: strings, integers, doubles or UUIDs. Stores
/// compare them by value, so `1i32`, `1i64` and `1.0` name the same record,
/// while the string `"1"` does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Bson);

impl RecordId {
    pub fn new(value: impl Into<Bson>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random identity value (a UUID v4 string).
    pub fn generate() -> Self {
        Self(Bson::String(uuid::Uuid::new_v4().to_string()))
    }

    pub fn as_bson(&self) -> &Bson {
        &self.0
    }

    pub fn into_bson(self) -> Bson {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Bson::String(value) => f.write_str(value),
            other => write!(f, "{other}"),
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(Bson::String(value.to_string()))
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(Bson::String(value))
    }
}

impl From<i32> for RecordId {
    fn from(value: i32) -> Self {
        Self(Bson::Int32(value))
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(Bson::Int64(value))
    }
}

impl From<Bson> for RecordId {
    fn from(value: Bson) -> Self {
        Self(value)
    }
}

/// One element of a [`Target::Sequence`].
#[derive(Debug, Clone, PartialEq)]
pub enum TargetItem {
    Identifier(RecordId),
    Record(Record),
}

impl TargetItem {
    /// Resolves this item to an identity value, or `None` if a record lacks one.
    pub fn resolve(&self, record_id: &str) -> Option<RecordId> {
        match self {
            TargetItem::Identifier(id) => Some(id.clone()),
            TargetItem::Record(record) => record.id(record_id),
        }
    }
}

impl From<RecordId> for TargetItem {
    fn from(id: RecordId) -> Self {
        TargetItem::Identifier(id)
    }
}

impl From<&str> for TargetItem {
    fn from(value: &str) -> Self {
        TargetItem::Identifier(value.into())
    }
}

impl From<String> for TargetItem {
    fn from(value: String) -> Self {
        TargetItem::Identifier(value.into())
    }
}

impl From<i32> for TargetItem {
    fn from(value: i32) -> Self {
        TargetItem::Identifier(value.into())
    }
}

impl From<i64> for TargetItem {
    fn from(value: i64) -> Self {
        TargetItem::Identifier(value.into())
    }
}

impl From<Record> for TargetItem {
    fn from(record: Record) -> Self {
        TargetItem::Record(record)
    }
}

impl From<Document> for TargetItem {
    fn from(document: Document) -> Self {
        TargetItem::Record(Record::from(document))
    }
}

/// Addresses the records a remove call applies to.
///
/// `Target::None` means "everything" for a store. Build targets through the
/// `From` conversions:
///
/// ```ignore
/// store.remove(1.into()).await?;
/// store.remove(vec![TargetItem::from("a"), TargetItem::from(record)].into()).await?;
/// store.remove(Target::None).await?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Target {
    #[default]
    None,
    Identifier(RecordId),
    Record(Record),
    Sequence(Vec<TargetItem>),
}

impl Target {
    /// Normalizes the target into a list of identity values.
    ///
    /// Returns `None` for [`Target::None`]. Records without an identity value are skipped.
    pub fn resolve(&self, record_id: &str) -> Option<Vec<RecordId>> {
        let items = match self {
            Target::None => return None,
            Target::Identifier(id) => return Some(vec![id.clone()]),
            Target::Record(record) => vec![TargetItem::Record(record.clone())],
            Target::Sequence(items) => items.clone(),
        };

        Some(
            items
                .iter()
                .filter_map(|item| {
                    let resolved = item.resolve(record_id);

                    if resolved.is_none() {
                        tracing::warn!(record_id, "skipping remove target without an identity value");
                    }

                    resolved
                })
                .collect()
        )
    }
}

impl From<RecordId> for Target {
    fn from(id: RecordId) -> Self {
        Target::Identifier(id)
    }
}

impl From<&str> for Target {
    fn from(value: &str) -> Self {
        Target::Identifier(value.into())
    }
}

impl From<String> for Target {
    fn from(value: String) -> Self {
        Target::Identifier(value.into())
    }
}

impl From<i32> for Target {
    fn from(value: i32) -> Self {
        Target::Identifier(value.into())
    }
}

impl From<i64> for Target {
    fn from(value: i64) -> Self {
        Target::Identifier(value.into())
    }
}

impl From<Record> for Target {
    fn from(record: Record) -> Self {
        Target::Record(record)
    }
}

impl From<Document> for Target {
    fn from(document: Document) -> Self {
        Target::Record(document.into())
    }
}

impl<T: Into<TargetItem>> From<Vec<T>> for Target {
    fn from(items: Vec<T>) -> Self {
        Target::Sequence(
            items
                .into_iter()
                .map(Into::into)
                .collect()
        )
    }
}

impl<T: Into<Target>> From<Option<T>> for Target {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Options accepted by a store save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Replace the store's contents with the incoming records. With
    /// synchronization enabled this is a reconciliation pass instead.
    pub reset: bool,
    /// Suppress the change notification for this save.
    pub no_sync: bool,
}

impl SaveOptions {
    pub fn reset() -> Self {
        Self { reset: true, no_sync: false }
    }

    pub fn no_sync(mut self) -> Self {
        self.no_sync = true;
        self
    }
}
