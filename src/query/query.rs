//! Immutable queries
//!
//! A [`Query`] is a value: every builder returns a new query and leaves the
//! receiver untouched. Construction-time checks keep every reachable query
//! internally consistent, so matching and ordering never re-validate.
//!
//! Derived state (normalized ordering, listen targets) is computed on first
//! use and memoized in [`OnceLock`] cells. Concurrent first accesses may both
//! compute the value; only one is published and both are identical.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::bound::Bound;
use super::comparator::DocumentComparator;
use super::errors::{fatal, QueryError, QueryResult};
use super::filter::{Filter, Operator};
use super::order_by::{Direction, OrderBy};
use super::target::Target;
use crate::model::{Document, DocumentKey, FieldPath, ResourcePath};
use crate::observability::{is_event_enabled, log_event_with_fields, Event};

/// How a query's limit is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimitType {
    /// No limit
    None,
    /// The first `limit` results of the ordering
    First,
    /// The last `limit` results of the ordering
    Last,
}

#[derive(Debug, Clone)]
pub struct Query {
    path: ResourcePath,
    collection_group: Option<Arc<str>>,
    filters: Vec<Filter>,
    explicit_order_bys: Vec<OrderBy>,
    limit: i32,
    limit_type: LimitType,
    start_at: Option<Bound>,
    end_at: Option<Bound>,

    memoized_normalized_order_bys: OnceLock<Vec<OrderBy>>,
    memoized_target: OnceLock<Arc<Target>>,
    memoized_aggregate_target: OnceLock<Arc<Target>>,
}

impl Query {
    /// Query over the collection or document at `path`.
    pub fn new(path: ResourcePath) -> Self {
        Self::from_parts(path, None, Vec::new(), Vec::new(), 0, LimitType::None, None, None)
    }

    /// Query over every collection named `collection_id`, at any depth.
    pub fn collection_group(collection_id: &str) -> Self {
        Self::with_collection_group(ResourcePath::empty(), collection_id)
    }

    /// Query over every collection named `collection_id` below `path`.
    pub fn with_collection_group(path: ResourcePath, collection_id: &str) -> Self {
        Self::from_parts(
            path,
            Some(Arc::from(collection_id)),
            Vec::new(),
            Vec::new(),
            0,
            LimitType::None,
            None,
            None,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn from_parts(
        path: ResourcePath,
        collection_group: Option<Arc<str>>,
        filters: Vec<Filter>,
        explicit_order_bys: Vec<OrderBy>,
        limit: i32,
        limit_type: LimitType,
        start_at: Option<Bound>,
        end_at: Option<Bound>,
    ) -> Self {
        Self {
            path,
            collection_group,
            filters,
            explicit_order_bys,
            limit,
            limit_type,
            start_at,
            end_at,
            memoized_normalized_order_bys: OnceLock::new(),
            memoized_target: OnceLock::new(),
            memoized_aggregate_target: OnceLock::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    pub fn collection_group_id(&self) -> Option<&str> {
        self.collection_group.as_deref()
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn explicit_order_bys(&self) -> &[OrderBy] {
        &self.explicit_order_bys
    }

    pub fn limit_type(&self) -> LimitType {
        self.limit_type
    }

    pub fn has_limit(&self) -> bool {
        self.limit_type != LimitType::None
    }

    /// # Panics
    ///
    /// If no limit was set.
    pub fn limit(&self) -> i32 {
        if self.limit_type == LimitType::None {
            fatal(QueryError::LimitNotSet);
        }
        self.limit
    }

    pub fn start_at(&self) -> Option<&Bound> {
        self.start_at.as_ref()
    }

    pub fn end_at(&self) -> Option<&Bound> {
        self.end_at.as_ref()
    }

    /// True if this query reads exactly one document by key.
    pub fn is_document_query(&self) -> bool {
        DocumentKey::is_document_key(&self.path)
            && self.collection_group.is_none()
            && self.filters.is_empty()
    }

    pub fn is_collection_group_query(&self) -> bool {
        self.collection_group.is_some()
    }

    /// True if every document in scope is part of the result.
    pub fn matches_all_documents(&self) -> bool {
        self.filters.is_empty()
            && self.limit_type == LimitType::None
            && self.start_at.is_none()
            && self.end_at.is_none()
            && match self.explicit_order_bys.as_slice() {
                [] => true,
                [only] => only.is_key_ordering(),
                _ => false,
            }
    }

    /// Field of the first inequality filter, depth-first across filters.
    pub fn inequality_filter_field(&self) -> Option<&FieldPath> {
        self.filters.iter().find_map(Filter::first_inequality_field)
    }

    pub fn first_order_by_field(&self) -> Option<&FieldPath> {
        self.explicit_order_bys.first().map(OrderBy::field)
    }

    /// First operator from `ops` used by any leaf filter.
    pub fn find_op_inside_filters(&self, ops: &[Operator]) -> Option<Operator> {
        self.filters
            .iter()
            .flat_map(Filter::flattened_filters)
            .map(|leaf| leaf.op())
            .find(|op| ops.contains(op))
    }

    // =========================================================================
    // Builders
    // =========================================================================

    /// Returns a copy with `filter` appended.
    ///
    /// # Panics
    ///
    /// On a document query, or if the filter's inequality field differs from
    /// the query's inequality field or first ordering.
    pub fn adding_filter(&self, filter: Filter) -> Query {
        if let Err(err) = self.check_filter(&filter) {
            fatal(err);
        }
        self.appending_filter(filter)
    }

    /// Checked form of [`Query::adding_filter`].
    pub fn try_adding_filter(&self, filter: Filter) -> QueryResult<Query> {
        self.check_filter(&filter).map_err(rejected)?;
        Ok(self.appending_filter(filter))
    }

    fn check_filter(&self, filter: &Filter) -> QueryResult<()> {
        if self.is_document_query() {
            return Err(QueryError::DocumentQueryFilter);
        }

        let Some(new_inequality) = filter.first_inequality_field() else {
            return Ok(());
        };
        if let Some(existing) = self.inequality_filter_field() {
            if existing != new_inequality {
                return Err(QueryError::MultipleInequalityFields {
                    existing: existing.canonical_string(),
                    new: new_inequality.canonical_string(),
                });
            }
        }
        if let Some(first) = self.first_order_by_field() {
            if first != new_inequality {
                return Err(QueryError::FirstOrderByMismatch {
                    order_by: first.canonical_string(),
                    inequality: new_inequality.canonical_string(),
                });
            }
        }
        Ok(())
    }

    fn appending_filter(&self, filter: Filter) -> Query {
        let mut filters = self.filters.clone();
        filters.push(filter);
        Self::from_parts(
            self.path.clone(),
            self.collection_group.clone(),
            filters,
            self.explicit_order_bys.clone(),
            self.limit,
            self.limit_type,
            self.start_at.clone(),
            self.end_at.clone(),
        )
    }

    /// Returns a copy with `order_by` appended to the explicit ordering.
    ///
    /// # Panics
    ///
    /// On a document query, or if this is the first ordering and its field
    /// differs from the query's inequality field.
    pub fn adding_order_by(&self, order_by: OrderBy) -> Query {
        if let Err(err) = self.check_order_by(&order_by) {
            fatal(err);
        }
        self.appending_order_by(order_by)
    }

    /// Checked form of [`Query::adding_order_by`].
    pub fn try_adding_order_by(&self, order_by: OrderBy) -> QueryResult<Query> {
        self.check_order_by(&order_by).map_err(rejected)?;
        Ok(self.appending_order_by(order_by))
    }

    fn check_order_by(&self, order_by: &OrderBy) -> QueryResult<()> {
        if self.is_document_query() {
            return Err(QueryError::DocumentQueryOrderBy);
        }
        if self.explicit_order_bys.is_empty() {
            if let Some(inequality) = self.inequality_filter_field() {
                if inequality != order_by.field() {
                    return Err(QueryError::FirstOrderByMismatch {
                        order_by: order_by.field().canonical_string(),
                        inequality: inequality.canonical_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn appending_order_by(&self, order_by: OrderBy) -> Query {
        let mut order_bys = self.explicit_order_bys.clone();
        order_bys.push(order_by);
        Self::from_parts(
            self.path.clone(),
            self.collection_group.clone(),
            self.filters.clone(),
            order_bys,
            self.limit,
            self.limit_type,
            self.start_at.clone(),
            self.end_at.clone(),
        )
    }

    /// Returns a copy limited to the first `limit` results.
    pub fn with_limit_to_first(&self, limit: i32) -> Query {
        self.with_limit(limit, LimitType::First)
    }

    /// Returns a copy limited to the last `limit` results.
    pub fn with_limit_to_last(&self, limit: i32) -> Query {
        self.with_limit(limit, LimitType::Last)
    }

    fn with_limit(&self, limit: i32, limit_type: LimitType) -> Query {
        Self::from_parts(
            self.path.clone(),
            self.collection_group.clone(),
            self.filters.clone(),
            self.explicit_order_bys.clone(),
            limit,
            limit_type,
            self.start_at.clone(),
            self.end_at.clone(),
        )
    }

    /// Returns a copy whose start cursor is `bound`.
    pub fn starting_at(&self, bound: Bound) -> Query {
        Self::from_parts(
            self.path.clone(),
            self.collection_group.clone(),
            self.filters.clone(),
            self.explicit_order_bys.clone(),
            self.limit,
            self.limit_type,
            Some(bound),
            self.end_at.clone(),
        )
    }

    /// Returns a copy whose end cursor is `bound`.
    pub fn ending_at(&self, bound: Bound) -> Query {
        Self::from_parts(
            self.path.clone(),
            self.collection_group.clone(),
            self.filters.clone(),
            self.explicit_order_bys.clone(),
            self.limit,
            self.limit_type,
            self.start_at.clone(),
            Some(bound),
        )
    }

    /// Returns a copy scoped to the plain collection at `path`; collection
    /// group scoping is dropped.
    pub fn as_collection_query_at_path(&self, path: ResourcePath) -> Query {
        Self::from_parts(
            path,
            None,
            self.filters.clone(),
            self.explicit_order_bys.clone(),
            self.limit,
            self.limit_type,
            self.start_at.clone(),
            self.end_at.clone(),
        )
    }

    // =========================================================================
    // Normalization
    // =========================================================================

    /// The effective ordering: explicit orderings plus the implicit
    /// inequality and key orderings. Always ends with a key ordering.
    pub fn normalized_order_bys(&self) -> &[OrderBy] {
        self.memoized_normalized_order_bys
            .get_or_init(|| self.compute_normalized_order_bys())
    }

    fn compute_normalized_order_bys(&self) -> Vec<OrderBy> {
        let inequality_field = self.inequality_filter_field();
        let first_order_by_field = self.first_order_by_field();

        let result = match (inequality_field, first_order_by_field) {
            // An inequality needs an ordering on its field; default ascending
            (Some(inequality), None) => {
                if inequality.is_key_field_path() {
                    vec![OrderBy::new(FieldPath::key_field_path(), Direction::Ascending)]
                } else {
                    vec![
                        OrderBy::new(inequality.clone(), Direction::Ascending),
                        OrderBy::new(FieldPath::key_field_path(), Direction::Ascending),
                    ]
                }
            }
            (inequality, first) => {
                if let (Some(inequality), Some(first)) = (inequality, first) {
                    if inequality != first {
                        fatal(QueryError::FirstOrderByMismatch {
                            order_by: first.canonical_string(),
                            inequality: inequality.canonical_string(),
                        });
                    }
                }

                let mut result = self.explicit_order_bys.clone();
                if !result.iter().any(OrderBy::is_key_ordering) {
                    // The implicit key ordering follows the last explicit direction
                    let last_direction = self
                        .explicit_order_bys
                        .last()
                        .map_or(Direction::Ascending, OrderBy::direction);
                    result.push(OrderBy::new(FieldPath::key_field_path(), last_direction));
                }
                result
            }
        };

        if is_event_enabled(Event::OrderByNormalized) {
            let explicit = self.explicit_order_bys.len().to_string();
            let normalized = result.len().to_string();
            log_event_with_fields(
                Event::OrderByNormalized,
                &[("explicit", explicit.as_str()), ("normalized", normalized.as_str())],
            );
        }
        result
    }

    // =========================================================================
    // Matching
    // =========================================================================

    /// True if `doc` belongs to this query's result set, ignoring the limit.
    pub fn matches(&self, doc: &Document) -> bool {
        doc.is_found_document()
            && self.matches_path_and_collection_group(doc)
            && self.matches_order_by(doc)
            && self.matches_filters(doc)
            && self.matches_bounds(doc)
    }

    fn matches_path_and_collection_group(&self, doc: &Document) -> bool {
        let doc_path = doc.key().path();
        if let Some(group) = &self.collection_group {
            doc.key().has_collection_group(group) && self.path.is_prefix_of(doc_path)
        } else if DocumentKey::is_document_key(&self.path) {
            self.path == *doc_path
        } else {
            // Shallow: only documents directly in the collection
            self.path.is_immediate_parent_of(doc_path)
        }
    }

    /// Every non-key ordering field must be present, including implicit ones:
    /// `a > 1 || b == 1` is ordered by `a`, so `{b: 1}` does not match.
    fn matches_order_by(&self, doc: &Document) -> bool {
        self.normalized_order_bys()
            .iter()
            .all(|order_by| order_by.is_key_ordering() || doc.field(order_by.field()).is_some())
    }

    fn matches_filters(&self, doc: &Document) -> bool {
        self.filters.iter().all(|filter| filter.matches(doc))
    }

    fn matches_bounds(&self, doc: &Document) -> bool {
        let order_bys = self.normalized_order_bys();
        if let Some(start_at) = &self.start_at {
            if !start_at.sorts_before_document(order_bys, doc) {
                return false;
            }
        }
        if let Some(end_at) = &self.end_at {
            if !end_at.sorts_after_document(order_bys, doc) {
                return false;
            }
        }
        true
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    /// Comparator implementing the normalized ordering.
    ///
    /// # Panics
    ///
    /// If the normalized ordering has no key ordering.
    pub fn comparator(&self) -> DocumentComparator {
        let ordering = self.normalized_order_bys().to_vec();
        if !ordering.iter().any(OrderBy::is_key_ordering) {
            fatal(QueryError::MissingKeyOrdering(self.to_string()));
        }
        if is_event_enabled(Event::ComparatorBuilt) {
            let clauses = ordering.len().to_string();
            log_event_with_fields(Event::ComparatorBuilt, &[("clauses", clauses.as_str())]);
        }
        DocumentComparator::new(ordering)
    }

    /// Sorts `documents` by this query's ordering.
    pub fn sort_documents(&self, documents: &mut [Document]) {
        self.comparator().sort(documents);
    }

    /// Compares two documents under this query's ordering.
    pub fn compare_documents(&self, a: &Document, b: &Document) -> Ordering {
        self.comparator().compare(a, b)
    }

    // =========================================================================
    // Canonicalization
    // =========================================================================

    /// Listen identity: the target's canonical id, suffixed with the limit
    /// kind when a limit is set.
    pub fn canonical_id(&self) -> String {
        let target_id = self.to_target().canonical_id();
        match self.limit_type {
            LimitType::None => target_id.to_owned(),
            LimitType::First => format!("{target_id}|lt:f"),
            LimitType::Last => format!("{target_id}|lt:l"),
        }
    }

    /// First eight bytes (big-endian) of the SHA-256 of
    /// [`Query::canonical_id`]; stable across builds and platforms.
    pub fn hash_code(&self) -> u64 {
        let digest = Sha256::digest(self.canonical_id().as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(prefix)
    }

    /// Target built from the normalized ordering.
    pub fn to_target(&self) -> &Target {
        self.memoized_target
            .get_or_init(|| Arc::new(self.build_target(self.normalized_order_bys())))
    }

    /// Target built from the explicit ordering only.
    pub fn to_aggregate_target(&self) -> &Target {
        self.memoized_aggregate_target
            .get_or_init(|| Arc::new(self.build_target(&self.explicit_order_bys)))
    }

    /// Limit-to-last is served as limit-to-first over the inverted ordering,
    /// so directions flip and the cursors trade places.
    fn build_target(&self, order_bys: &[OrderBy]) -> Target {
        let limit = self.has_limit().then_some(self.limit);
        let target = if self.limit_type == LimitType::Last {
            Target::new(
                self.path.clone(),
                self.collection_group.clone(),
                self.filters.clone(),
                order_bys.iter().map(OrderBy::inverted).collect(),
                limit,
                self.end_at.clone(),
                self.start_at.clone(),
            )
        } else {
            Target::new(
                self.path.clone(),
                self.collection_group.clone(),
                self.filters.clone(),
                order_bys.to_vec(),
                limit,
                self.start_at.clone(),
                self.end_at.clone(),
            )
        };
        if is_event_enabled(Event::TargetDerived) {
            log_event_with_fields(
                Event::TargetDerived,
                &[("canonical_id", target.canonical_id())],
            );
        }
        target
    }
}

fn rejected(err: QueryError) -> QueryError {
    let message = err.to_string();
    log_event_with_fields(
        Event::QueryRejected,
        &[("code", err.code().code()), ("message", message.as_str())],
    );
    err
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.limit_type == other.limit_type && self.to_target() == other.to_target()
    }
}

impl Eq for Query {}

impl Hash for Query {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_id().hash(state);
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Query(canonical_id={})", self.canonical_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::errors::QueryErrorCode;
    use crate::query::filter::FieldFilter;
    use serde_json::json;

    fn rooms() -> Query {
        Query::new(ResourcePath::from_string("rooms"))
    }

    fn key_asc() -> OrderBy {
        OrderBy::new(FieldPath::key_field_path(), Direction::Ascending)
    }

    fn doc(path: &str, body: serde_json::Value) -> Document {
        Document::found(DocumentKey::from_path_string(path), body)
    }

    #[test]
    fn test_builders_do_not_mutate_receiver() {
        let base = rooms();
        let filtered = base.adding_filter(Filter::field("a", Operator::Equal, json!(1)));
        let limited = filtered.with_limit_to_first(3);

        assert!(base.filters().is_empty());
        assert_eq!(filtered.filters().len(), 1);
        assert!(!filtered.has_limit());
        assert_eq!(limited.limit(), 3);
    }

    #[test]
    fn test_normalized_order_bys_default_to_key() {
        assert_eq!(rooms().normalized_order_bys(), &[key_asc()]);
    }

    #[test]
    fn test_inequality_adds_implicit_ordering() {
        let query = rooms().adding_filter(Filter::field("score", Operator::GreaterThan, json!(10)));
        assert_eq!(
            query.normalized_order_bys(),
            &[OrderBy::asc("score"), key_asc()]
        );
    }

    #[test]
    fn test_key_inequality_orders_by_key_only() {
        let query = rooms().adding_filter(Filter::Field(FieldFilter::new(
            FieldPath::key_field_path(),
            Operator::GreaterThan,
            json!("rooms/a"),
        )));
        assert_eq!(query.normalized_order_bys(), &[key_asc()]);
    }

    #[test]
    fn test_implicit_key_follows_last_direction() {
        let query = rooms()
            .adding_order_by(OrderBy::asc("a"))
            .adding_order_by(OrderBy::desc("b"));
        assert_eq!(
            query.normalized_order_bys(),
            &[
                OrderBy::asc("a"),
                OrderBy::desc("b"),
                OrderBy::new(FieldPath::key_field_path(), Direction::Descending),
            ]
        );
    }

    #[test]
    fn test_explicit_key_ordering_is_kept() {
        let explicit_key = OrderBy::new(FieldPath::key_field_path(), Direction::Descending);
        let query = rooms()
            .adding_order_by(explicit_key.clone())
            .adding_order_by(OrderBy::asc("a"));
        assert_eq!(
            query.normalized_order_bys(),
            &[explicit_key, OrderBy::asc("a")]
        );
    }

    #[test]
    #[should_panic(expected = "LQ_QUERY_MULTIPLE_INEQUALITY")]
    fn test_two_inequality_fields_are_fatal() {
        rooms()
            .adding_filter(Filter::field("a", Operator::GreaterThan, json!(1)))
            .adding_filter(Filter::field("b", Operator::LessThan, json!(1)));
    }

    #[test]
    fn test_try_adding_filter_reports_mismatch() {
        let ordered = rooms().adding_order_by(OrderBy::asc("a"));
        let err = ordered
            .try_adding_filter(Filter::field("b", Operator::NotEqual, json!(1)))
            .unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::FirstOrderByMismatch);

        assert!(ordered
            .try_adding_filter(Filter::field("a", Operator::GreaterThan, json!(1)))
            .is_ok());
    }

    #[test]
    fn test_try_adding_order_by_checks_only_first_clause() {
        let query = rooms().adding_filter(Filter::field("a", Operator::GreaterThan, json!(1)));
        assert!(query.try_adding_order_by(OrderBy::asc("b")).is_err());

        let ordered = query.adding_order_by(OrderBy::desc("a"));
        assert!(ordered.try_adding_order_by(OrderBy::asc("b")).is_ok());
    }

    #[test]
    #[should_panic(expected = "LQ_QUERY_DOCUMENT_FILTER")]
    fn test_filter_on_document_query_is_fatal() {
        Query::new(ResourcePath::from_string("rooms/r1"))
            .adding_filter(Filter::field("a", Operator::Equal, json!(1)));
    }

    #[test]
    #[should_panic(expected = "LQ_QUERY_DOCUMENT_ORDER_BY")]
    fn test_order_by_on_document_query_is_fatal() {
        Query::new(ResourcePath::from_string("rooms/r1")).adding_order_by(OrderBy::asc("a"));
    }

    #[test]
    #[should_panic(expected = "LQ_QUERY_LIMIT_NOT_SET")]
    fn test_limit_without_limit_type_is_fatal() {
        rooms().limit();
    }

    #[test]
    fn test_last_limit_call_wins() {
        let query = rooms().with_limit_to_first(5).with_limit_to_last(2);
        assert_eq!(query.limit_type(), LimitType::Last);
        assert_eq!(query.limit(), 2);
    }

    #[test]
    fn test_matches_all_documents() {
        assert!(rooms().matches_all_documents());
        assert!(rooms().adding_order_by(key_asc()).matches_all_documents());
        assert!(!rooms().adding_order_by(OrderBy::asc("a")).matches_all_documents());
        assert!(!rooms().with_limit_to_first(1).matches_all_documents());
    }

    #[test]
    fn test_find_op_inside_filters() {
        let query = rooms().adding_filter(Filter::or(vec![
            Filter::field("a", Operator::Equal, json!(1)),
            Filter::field("b", Operator::ArrayContains, json!(1)),
        ]));
        assert_eq!(
            query.find_op_inside_filters(&[Operator::ArrayContains, Operator::In]),
            Some(Operator::ArrayContains)
        );
        assert_eq!(query.find_op_inside_filters(&[Operator::NotIn]), None);
    }

    #[test]
    fn test_collection_group_scope() {
        let query = Query::collection_group("messages");
        assert!(query.is_collection_group_query());
        assert!(query.matches(&doc("rooms/r1/messages/m1", json!({}))));
        assert!(query.matches(&doc("messages/m1", json!({}))));
        assert!(!query.matches(&doc("rooms/r1", json!({}))));

        let rooted = Query::with_collection_group(ResourcePath::from_string("rooms/r1"), "messages");
        assert!(rooted.matches(&doc("rooms/r1/messages/m1", json!({}))));
        assert!(!rooted.matches(&doc("rooms/r2/messages/m1", json!({}))));
    }

    #[test]
    fn test_as_collection_query_drops_group() {
        let query = Query::collection_group("messages")
            .adding_filter(Filter::field("a", Operator::Equal, json!(1)))
            .as_collection_query_at_path(ResourcePath::from_string("rooms/r1/messages"));

        assert!(!query.is_collection_group_query());
        assert_eq!(query.filters().len(), 1);
        assert!(query.matches(&doc("rooms/r1/messages/m1", json!({"a": 1}))));
        assert!(!query.matches(&doc("rooms/r2/messages/m1", json!({"a": 1}))));
    }

    #[test]
    fn test_missing_documents_never_match() {
        let key = DocumentKey::from_path_string("rooms/r1");
        assert!(!rooms().matches(&Document::no_document(key.clone())));
        assert!(!rooms().matches(&Document::unknown(key)));
    }

    #[test]
    fn test_aggregate_target_uses_explicit_ordering() {
        let query = rooms().adding_filter(Filter::field("a", Operator::GreaterThan, json!(1)));
        assert!(query.to_aggregate_target().order_bys().is_empty());
        assert_eq!(query.to_target().order_bys().len(), 2);
    }

    #[test]
    fn test_limit_to_last_inverts_target() {
        let start = Bound::new(vec![json!(1)], true);
        let end = Bound::new(vec![json!(9)], false);
        let query = rooms()
            .adding_order_by(OrderBy::asc("a"))
            .starting_at(start.clone())
            .ending_at(end.clone())
            .with_limit_to_last(3);

        let target = query.to_target();
        assert_eq!(
            target.order_bys(),
            &[
                OrderBy::desc("a"),
                OrderBy::new(FieldPath::key_field_path(), Direction::Descending),
            ]
        );
        assert_eq!(target.start_at(), Some(&end));
        assert_eq!(target.end_at(), Some(&start));
        assert_eq!(target.limit(), Some(3));
    }

    #[test]
    fn test_canonical_id_suffixes() {
        let base = rooms();
        assert!(!base.canonical_id().contains("|lt:"));
        assert!(base.with_limit_to_first(2).canonical_id().ends_with("|lt:f"));
        assert!(base.with_limit_to_last(2).canonical_id().ends_with("|lt:l"));
    }

    #[test]
    fn test_equality_goes_through_target() {
        // Explicit key ordering equals the implicit one
        let implicit = rooms();
        let explicit = rooms().adding_order_by(key_asc());
        assert_eq!(implicit, explicit);
        assert_eq!(implicit.hash_code(), explicit.hash_code());

        assert_ne!(rooms().with_limit_to_first(1), rooms().with_limit_to_last(1));
    }

    #[test]
    fn test_hash_code_is_fixed() {
        assert_eq!(rooms().canonical_id(), "rooms|f:|ob:__name__asc");
        assert_eq!(rooms().hash_code(), 10095173067514133335);
        assert_ne!(rooms().hash_code(), rooms().with_limit_to_first(1).hash_code());
    }

    #[test]
    fn test_display() {
        assert_eq!(rooms().to_string(), "Query(canonical_id=rooms|f:|ob:__name__asc)");
    }
}
