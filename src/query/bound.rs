//! Cursor bounds
//!
//! A bound is a position in a query's ordering: one value per leading
//! ordering clause, plus whether documents exactly at that position are
//! included. The same bound serves as a start cursor or an end cursor; the
//! role is chosen by which of [`Bound::sorts_before_document`] and
//! [`Bound::sorts_after_document`] the caller asks.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{fatal, QueryError};
use super::order_by::OrderBy;
use crate::model::{values, Document, DocumentKey, ResourcePath};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    position: Vec<Value>,
    inclusive: bool,
}

impl Bound {
    pub fn new(position: Vec<Value>, inclusive: bool) -> Self {
        Self {
            position,
            inclusive,
        }
    }

    pub fn position(&self) -> &[Value] {
        &self.position
    }

    pub fn inclusive(&self) -> bool {
        self.inclusive
    }

    /// Compares this position to `doc` under `order_bys`.
    ///
    /// # Panics
    ///
    /// If the position has more components than `order_bys`, or a component
    /// under a key ordering is not a document path string.
    pub fn compare_to_document(&self, order_bys: &[OrderBy], doc: &Document) -> Ordering {
        if self.position.len() > order_bys.len() {
            fatal(QueryError::BoundTooLong {
                position: self.position.len(),
                order_bys: order_bys.len(),
            });
        }

        for (component, order_by) in self.position.iter().zip(order_bys) {
            let ordering = if order_by.is_key_ordering() {
                key_from_value(component).cmp(doc.key())
            } else {
                match doc.field(order_by.field()) {
                    Some(doc_value) => values::compare(component, doc_value),
                    // Documents lacking an ordering field never reach here
                    // through matching; treat them as sorting first.
                    None => Ordering::Greater,
                }
            };
            let ordering = order_by.direction().apply(ordering);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// True if `doc` is at or after this position (strictly after when
    /// exclusive): the start-cursor test.
    pub fn sorts_before_document(&self, order_bys: &[OrderBy], doc: &Document) -> bool {
        let ordering = self.compare_to_document(order_bys, doc);
        if self.inclusive {
            ordering != Ordering::Greater
        } else {
            ordering == Ordering::Less
        }
    }

    /// True if `doc` is at or before this position (strictly before when
    /// exclusive): the end-cursor test.
    pub fn sorts_after_document(&self, order_bys: &[OrderBy], doc: &Document) -> bool {
        let ordering = self.compare_to_document(order_bys, doc);
        if self.inclusive {
            ordering != Ordering::Less
        } else {
            ordering == Ordering::Greater
        }
    }

    /// `b:` (inclusive) or `a:` (exclusive) followed by the position values.
    pub fn position_string(&self) -> String {
        let values: Vec<String> = self.position.iter().map(values::canonical_id).collect();
        format!(
            "{}{}",
            if self.inclusive { "b:" } else { "a:" },
            values.join(",")
        )
    }
}

/// Interprets a key-valued operand (`"rooms/r1"`) as a document key.
///
/// # Panics
///
/// If the value is not a string holding a document path.
pub(crate) fn key_from_value(value: &Value) -> DocumentKey {
    let path = match value {
        Value::String(s) => ResourcePath::from_string(s),
        other => fatal(QueryError::InvalidDocumentKey(values::canonical_id(other))),
    };
    match DocumentKey::try_new(path) {
        Ok(key) => key,
        Err(err) => fatal(err),
    }
}
