//! Declarative predicates over record fields.
//!
//! A [`FilterSpec`] maps field names to either a literal value to match or a
//! multi-value [`FieldClause`]. The clause carries its own match-any flag, which
//! decides how its values combine for that field only. How the per-field results
//! combine into a record's overall match is decided by the `match_any` argument of
//! the filter call (match-all by default).
//!
//! # Building filters
//!
//! ```ignore
//! use synclayer::filter::FilterSpec;
//!
//! let spec = FilterSpec::new()
//!     .eq("status", "open")
//!     .any_of("tags", ["urgent", "bug"]);
//!
//! let open_urgent = store.filter(Some(&spec), false).await?;
//! ```
//!
//! Filters can also be parsed from a document of the form
//! `{ field: literal, field: { data: [..], matchAny: bool } }`:
//!
//! ```ignore
//! let spec = FilterSpec::from(doc! { "a": { "data": [1, 2], "matchAny": true } });
//! ```

use bson::{Bson, Document};

use crate::error::DataStoreError;

/// A multi-value clause for a single field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldClause {
    /// The values to compare the field against.
    pub values: Vec<Bson>,
    /// `true` if any value may match, `false` if every value must match.
    pub match_any: bool,
}

impl FieldClause {
    pub fn any_of(values: impl IntoIterator<Item = impl Into<Bson>>) -> Self {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            match_any: true,
        }
    }

    pub fn all_of(values: impl IntoIterator<Item = impl Into<Bson>>) -> Self {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            match_any: false,
        }
    }

    /// Parses a clause document (`{ data: [..], matchAny: bool }`).
    ///
    /// `values` is accepted in place of `data`. Returns `None` if the document has
    /// no array under either key, in which case it is a literal value.
    fn from_document(document: &Document) -> Option<Self> {
        let values = match document.get("data").or_else(|| document.get("values")) {
            Some(Bson::Array(values)) => values.clone(),
            _ => return None,
        };

        let match_any = matches!(document.get("matchAny"), Some(Bson::Boolean(true)));

        Some(Self { values, match_any })
    }
}

/// The predicate for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldFilter {
    /// Equality (or, against a sequence field, presence) of a literal value.
    Value(Bson),
    /// A multi-value clause.
    Clause(FieldClause),
}

impl From<Bson> for FieldFilter {
    fn from(value: Bson) -> Self {
        match &value {
            Bson::Document(document) => match FieldClause::from_document(document) {
                Some(clause) => FieldFilter::Clause(clause),
                None => FieldFilter::Value(value),
            },
            _ => FieldFilter::Value(value),
        }
    }
}

impl From<FieldClause> for FieldFilter {
    fn from(clause: FieldClause) -> Self {
        FieldFilter::Clause(clause)
    }
}

/// An ordered set of per-field predicates.
///
/// Setting a field twice replaces its earlier predicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    fields: Vec<(String, FieldFilter)>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate for `field`.
    pub fn clause(mut self, field: impl Into<String>, filter: impl Into<FieldFilter>) -> Self {
        let field = field.into();
        let filter = filter.into();

        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = filter,
            None => self.fields.push((field, filter)),
        }

        self
    }

    /// Matches records whose `field` equals `value`.
    pub fn eq(self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.clause(field, FieldFilter::Value(value.into()))
    }

    /// Matches records whose `field` matches at least one of `values`.
    pub fn any_of(self, field: impl Into<String>, values: impl IntoIterator<Item = impl Into<Bson>>) -> Self {
        self.clause(field, FieldClause::any_of(values))
    }

    /// Matches records whose `field` matches every one of `values`.
    pub fn all_of(self, field: impl Into<String>, values: impl IntoIterator<Item = impl Into<Bson>>) -> Self {
        self.clause(field, FieldClause::all_of(values))
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldFilter)> {
        self.fields
            .iter()
            .map(|(field, filter)| (field.as_str(), filter))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Document> for FilterSpec {
    fn from(document: Document) -> Self {
        document
            .into_iter()
            .fold(FilterSpec::new(), |spec, (field, value)| spec.clause(field, value))
    }
}

/// Visitor over a [`FilterSpec`], implemented by each backend's evaluator.
pub trait FilterVisitor {
    type Output;
    type Error: Into<DataStoreError>;

    /// Combines the per-field results of `spec`. `match_any` selects "any field
    /// matched" over "all fields matched".
    fn visit_spec(&mut self, spec: &FilterSpec, match_any: bool) -> Result<Self::Output, Self::Error>;
    fn visit_value(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error>;
    fn visit_clause(&mut self, field: &str, clause: &FieldClause) -> Result<Self::Output, Self::Error>;

    fn visit_field(&mut self, field: &str, filter: &FieldFilter) -> Result<Self::Output, Self::Error> {
        match filter {
            FieldFilter::Value(value) => self.visit_value(field, value),
            FieldFilter::Clause(clause) => self.visit_clause(field, clause),
        }
    }
}
