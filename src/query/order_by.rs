//! Ordering clauses

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{values, Document, FieldPath};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }

    pub fn inverted(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }

    /// Applies this direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

/// A (field, direction) sort clause
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderBy {
    field: FieldPath,
    direction: Direction,
}

impl OrderBy {
    pub fn new(field: FieldPath, direction: Direction) -> Self {
        Self { field, direction }
    }

    pub fn asc(field: &str) -> Self {
        Self::new(FieldPath::from_dot_separated(field), Direction::Ascending)
    }

    pub fn desc(field: &str) -> Self {
        Self::new(FieldPath::from_dot_separated(field), Direction::Descending)
    }

    pub fn field(&self) -> &FieldPath {
        &self.field
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_key_ordering(&self) -> bool {
        self.field.is_key_field_path()
    }

    /// Same field, opposite direction.
    pub fn inverted(&self) -> Self {
        Self::new(self.field.clone(), self.direction.inverted())
    }

    /// Compares two documents on this clause.
    ///
    /// Key orderings always resolve. A document missing the field sorts
    /// before one that has it; matching already excludes such documents.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let ordering = if self.field.is_key_field_path() {
            a.key().cmp(b.key())
        } else {
            match (a.field(&self.field), b.field(&self.field)) {
                (Some(a), Some(b)) => values::compare(a, b),
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
            }
        };
        self.direction.apply(ordering)
    }

    pub fn canonical_id(&self) -> String {
        format!("{}{}", self.field.canonical_string(), self.direction.as_str())
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentKey;
    use serde_json::json;

    fn doc(path: &str, body: serde_json::Value) -> Document {
        Document::found(DocumentKey::from_path_string(path), body)
    }

    #[test]
    fn test_compare_by_field() {
        let a = doc("rooms/a", json!({"score": 1}));
        let b = doc("rooms/b", json!({"score": 2}));

        assert_eq!(OrderBy::asc("score").compare(&a, &b), Ordering::Less);
        assert_eq!(OrderBy::desc("score").compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_compare_by_key_ignores_body() {
        let a = doc("rooms/a", json!({}));
        let b = doc("rooms/b", json!({}));
        let key = OrderBy::new(FieldPath::key_field_path(), Direction::Ascending);

        assert_eq!(key.compare(&a, &b), Ordering::Less);
        assert_eq!(key.inverted().compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_missing_field_sorts_first() {
        let a = doc("rooms/a", json!({}));
        let b = doc("rooms/b", json!({"score": 0}));
        assert_eq!(OrderBy::asc("score").compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_canonical_id() {
        assert_eq!(OrderBy::asc("score").canonical_id(), "scoreasc");
        assert_eq!(
            OrderBy::new(FieldPath::key_field_path(), Direction::Descending).canonical_id(),
            "__name__desc"
        );
    }
}
