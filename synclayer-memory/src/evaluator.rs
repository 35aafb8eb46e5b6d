//! Filter evaluation for in-memory records.
//!
//! This module provides the evaluation engine for [`FilterSpec`]s and the value
//! equality used for identity matching.

use std::{collections::HashMap, convert::Infallible};
use bson::Bson;

use synclayer_core::{
    filter::{FieldClause, FilterSpec, FilterVisitor},
    record::{Record, RecordId},
};


/// Type-erased, comparable representation of BSON values.
///
/// Integers are widened to i64 and compared exactly. A double equals an
/// integer only when it is integral and converts to it without loss, so
/// `Int32(1)`, `Int64(1)` and `Double(1.0)` are equal but `Int64(2^53 + 1)` and
/// `Double(2^53)` are not. Types with no natural normalization fall back to
/// structural equality.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (Int32 and Int64 widened to i64)
    Int(i64),
    /// Floating point value
    Double(f64),
    /// String value
    String(&'a str),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
    /// Map/Object of comparable values
    Map(HashMap<&'a str, Comparable<'a>>),
    /// Any other value (dates, uuids, object ids, binary...)
    Other(&'a Bson),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Int(i64::from(*value)),
            Bson::Int64(value) => Comparable::Int(*value),
            Bson::Double(value) => Comparable::Double(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            other => Comparable::Other(other),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Int(a), Comparable::Int(b)) => a == b,
            (Comparable::Double(a), Comparable::Double(b)) => a == b,
            (Comparable::Int(a), Comparable::Double(b))
            | (Comparable::Double(b), Comparable::Int(a)) => integral(*b) == Some(*a),
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            (Comparable::Other(a), Comparable::Other(b)) => a == b,
            _ => false,
        }
    }
}

/// Returns the integer a double represents exactly, if any.
fn integral(value: f64) -> Option<i64> {
    // 2^63 is the first double past i64::MAX
    const UPPER: f64 = 9_223_372_036_854_775_808.0;

    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < UPPER {
        Some(value as i64)
    } else {
        None
    }
}

/// Whether two identity values name the same record.
pub(crate) fn same_identity(left: &RecordId, right: &RecordId) -> bool {
    Comparable::from(left.as_bson()) == Comparable::from(right.as_bson())
}


pub(crate) struct RecordEvaluator<'a> {
    record: &'a Record,
}

impl<'a> RecordEvaluator<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    pub fn evaluate(&mut self, spec: &FilterSpec, match_any: bool) -> bool {
        match self.visit_spec(spec, match_any) {
            Ok(matched) => matched,
            Err(never) => match never {},
        }
    }

    /// Returns copies of the matching records, in their original order.
    pub fn filter_records(
        records: impl IntoIterator<Item = &'a Record>,
        spec: &FilterSpec,
        match_any: bool,
    ) -> Vec<Record> {
        records
            .into_iter()
            .filter(|record| RecordEvaluator::new(record).evaluate(spec, match_any))
            .cloned()
            .collect::<Vec<_>>()
    }
}

impl<'a> FilterVisitor for RecordEvaluator<'a> {
    type Output = bool;
    // matching a record against a spec cannot fail
    type Error = Infallible;

    fn visit_spec(&mut self, spec: &FilterSpec, match_any: bool) -> Result<Self::Output, Self::Error> {
        for (field, filter) in spec.fields() {
            let matched = self.visit_field(field, filter)?;

            if match_any && matched {
                return Ok(true);
            }
            if !match_any && !matched {
                return Ok(false);
            }
        }

        Ok(!match_any)
    }

    fn visit_value(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error> {
        let Some(field_value) = self.record.get(field) else {
            return Ok(false);
        };

        let actual = Comparable::from(field_value);
        let expected = Comparable::from(value);

        if actual == expected {
            return Ok(true);
        }

        // a literal against a sequence field checks for presence
        match actual {
            Comparable::Array(items) => Ok(items.contains(&expected)),
            _ => Ok(false),
        }
    }

    fn visit_clause(&mut self, field: &str, clause: &FieldClause) -> Result<Self::Output, Self::Error> {
        let Some(field_value) = self.record.get(field) else {
            return Ok(false);
        };

        let actual = Comparable::from(field_value);
        let matches_value = |value: &Bson| {
            let expected = Comparable::from(value);

            match &actual {
                Comparable::Array(items) => items.contains(&expected),
                scalar => *scalar == expected,
            }
        };

        if clause.match_any {
            Ok(clause.values.iter().any(matches_value))
        } else {
            Ok(clause.values.iter().all(matches_value))
        }
    }
}
