//! Result ordering
//!
//! Sorts matching documents by a query's normalized ordering. Because that
//! ordering always ends with the document key, the order is total and the
//! sort is deterministic.

use std::cmp::Ordering;

use super::order_by::OrderBy;
use crate::model::Document;

/// Compares documents clause by clause; the first non-equal clause decides.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentComparator {
    order_bys: Vec<OrderBy>,
}

impl DocumentComparator {
    pub fn new(order_bys: Vec<OrderBy>) -> Self {
        Self { order_bys }
    }

    pub fn order_bys(&self) -> &[OrderBy] {
        &self.order_bys
    }

    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        for order_by in &self.order_bys {
            let ordering = order_by.compare(a, b);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Sorts documents in place.
    pub fn sort(&self, documents: &mut [Document]) {
        documents.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentKey, FieldPath};
    use crate::query::order_by::Direction;
    use serde_json::json;

    fn make_doc(id: &str, age: i64) -> Document {
        Document::found(
            DocumentKey::from_path_string(&format!("users/{id}")),
            json!({"age": age}),
        )
    }

    fn ids(docs: &[Document]) -> Vec<String> {
        docs.iter()
            .map(|d| d.key().path().last_segment().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_sort_ascending_with_key_tiebreak() {
        let comparator = DocumentComparator::new(vec![
            OrderBy::asc("age"),
            OrderBy::new(FieldPath::key_field_path(), Direction::Ascending),
        ]);
        let mut docs = vec![make_doc("c", 30), make_doc("b", 20), make_doc("a", 20)];

        comparator.sort(&mut docs);

        assert_eq!(ids(&docs), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_descending() {
        let comparator = DocumentComparator::new(vec![
            OrderBy::desc("age"),
            OrderBy::new(FieldPath::key_field_path(), Direction::Descending),
        ]);
        let mut docs = vec![make_doc("a", 20), make_doc("c", 30), make_doc("b", 20)];

        comparator.sort(&mut docs);

        assert_eq!(ids(&docs), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_equal_only_for_same_key() {
        let comparator = DocumentComparator::new(vec![OrderBy::new(
            FieldPath::key_field_path(),
            Direction::Ascending,
        )]);
        let a = make_doc("a", 1);
        assert_eq!(comparator.compare(&a, &a.clone()), Ordering::Equal);
        assert_eq!(comparator.compare(&a, &make_doc("b", 1)), Ordering::Less);
    }
}
