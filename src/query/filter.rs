//! Query filters
//!
//! A filter is either a single field comparison or an AND/OR composite of
//! filters. Every operation walks the tree structurally.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::bound::key_from_value;
use crate::model::{values, Document, FieldPath};

/// Field comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    LessThan,
    LessThanOrEqual,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    ArrayContains,
    ArrayContainsAny,
    In,
    NotIn,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::ArrayContains => "array-contains",
            Operator::ArrayContainsAny => "array-contains-any",
            Operator::In => "in",
            Operator::NotIn => "not-in",
        }
    }

    /// Operators that exclude a range of values and therefore require the
    /// query to be ordered by their field.
    pub fn is_inequality(&self) -> bool {
        matches!(
            self,
            Operator::LessThan
                | Operator::LessThanOrEqual
                | Operator::GreaterThan
                | Operator::GreaterThanOrEqual
                | Operator::NotEqual
                | Operator::NotIn
        )
    }

    fn matches_comparison(&self, ordering: Ordering) -> bool {
        match self {
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessThanOrEqual => ordering != Ordering::Greater,
            Operator::Equal => ordering == Ordering::Equal,
            Operator::NotEqual => ordering != Ordering::Equal,
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterThanOrEqual => ordering != Ordering::Less,
            _ => false,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `field op value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    field: FieldPath,
    op: Operator,
    value: Value,
}

impl FieldFilter {
    pub fn new(field: FieldPath, op: Operator, value: Value) -> Self {
        Self { field, op, value }
    }

    pub fn field(&self) -> &FieldPath {
        &self.field
    }

    pub fn op(&self) -> Operator {
        self.op
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_inequality(&self) -> bool {
        self.op.is_inequality()
    }

    pub fn matches(&self, doc: &Document) -> bool {
        if self.field.is_key_field_path() {
            return self.matches_key(doc);
        }
        let Some(lhs) = doc.field(&self.field) else {
            return false;
        };

        match self.op {
            Operator::ArrayContains => values::contains(lhs, &self.value),
            Operator::ArrayContainsAny => match (lhs.as_array(), self.value.as_array()) {
                (Some(items), Some(candidates)) => candidates
                    .iter()
                    .any(|c| items.iter().any(|item| values::values_equal(item, c))),
                _ => false,
            },
            Operator::In => values::contains(&self.value, lhs),
            Operator::NotIn => {
                !values::contains(&self.value, &Value::Null)
                    && !lhs.is_null()
                    && !values::contains(&self.value, lhs)
            }
            Operator::NotEqual => {
                !self.value.is_null()
                    && !lhs.is_null()
                    && self.op.matches_comparison(values::compare(lhs, &self.value))
            }
            // Only values of the same type order are comparable
            _ => {
                values::type_order(lhs) == values::type_order(&self.value)
                    && self.op.matches_comparison(values::compare(lhs, &self.value))
            }
        }
    }

    fn matches_key(&self, doc: &Document) -> bool {
        match self.op {
            Operator::In | Operator::NotIn => {
                let listed = self
                    .value
                    .as_array()
                    .is_some_and(|keys| keys.iter().any(|k| &key_from_value(k) == doc.key()));
                listed == (self.op == Operator::In)
            }
            Operator::ArrayContains | Operator::ArrayContainsAny => false,
            op => op.matches_comparison(doc.key().cmp(&key_from_value(&self.value))),
        }
    }

    pub fn canonical_id(&self) -> String {
        format!(
            "{}{}{}",
            self.field.canonical_string(),
            self.op.as_str(),
            values::canonical_id(&self.value)
        )
    }
}

/// Logical combinator of a composite filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositeOperator {
    And,
    Or,
}

impl CompositeOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompositeOperator::And => "and",
            CompositeOperator::Or => "or",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeFilter {
    op: CompositeOperator,
    filters: Vec<Filter>,
}

impl CompositeFilter {
    pub fn new(op: CompositeOperator, filters: Vec<Filter>) -> Self {
        Self { op, filters }
    }

    pub fn op(&self) -> CompositeOperator {
        self.op
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn is_conjunction(&self) -> bool {
        self.op == CompositeOperator::And
    }

    pub fn is_disjunction(&self) -> bool {
        self.op == CompositeOperator::Or
    }

    /// True if every child is a field filter.
    pub fn is_flat(&self) -> bool {
        self.filters.iter().all(|f| matches!(f, Filter::Field(_)))
    }

    pub fn is_flat_conjunction(&self) -> bool {
        self.is_flat() && self.is_conjunction()
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self.op {
            CompositeOperator::And => self.filters.iter().all(|f| f.matches(doc)),
            CompositeOperator::Or => self.filters.iter().any(|f| f.matches(doc)),
        }
    }

    pub fn canonical_id(&self) -> String {
        let children: Vec<String> = self.filters.iter().map(Filter::canonical_id).collect();
        // A flat AND reads the same as the query's own top-level filter list
        if self.is_flat_conjunction() {
            return children.join(",");
        }
        format!("{}({})", self.op.as_str(), children.join(","))
    }
}

/// A node of the filter tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    Field(FieldFilter),
    Composite(CompositeFilter),
}

impl Filter {
    /// Shorthand for a field filter on a dot-separated path.
    pub fn field(path: &str, op: Operator, value: Value) -> Self {
        Filter::Field(FieldFilter::new(FieldPath::from_dot_separated(path), op, value))
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::Composite(CompositeFilter::new(CompositeOperator::And, filters))
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Composite(CompositeFilter::new(CompositeOperator::Or, filters))
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::Field(f) => f.matches(doc),
            Filter::Composite(c) => c.matches(doc),
        }
    }

    /// Field of the first inequality leaf, depth-first.
    pub fn first_inequality_field(&self) -> Option<&FieldPath> {
        match self {
            Filter::Field(f) => f.is_inequality().then(|| f.field()),
            Filter::Composite(c) => c.filters.iter().find_map(Filter::first_inequality_field),
        }
    }

    /// Leaf field filters in depth-first order.
    pub fn flattened_filters(&self) -> Vec<&FieldFilter> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a FieldFilter>) {
        match self {
            Filter::Field(f) => leaves.push(f),
            Filter::Composite(c) => {
                for child in &c.filters {
                    child.collect_leaves(leaves);
                }
            }
        }
    }

    pub fn canonical_id(&self) -> String {
        match self {
            Filter::Field(f) => f.canonical_id(),
            Filter::Composite(c) => c.canonical_id(),
        }
    }
}

impl From<FieldFilter> for Filter {
    fn from(filter: FieldFilter) -> Self {
        Filter::Field(filter)
    }
}

impl From<CompositeFilter> for Filter {
    fn from(filter: CompositeFilter) -> Self {
        Filter::Composite(filter)
    }
}
