//! Listen targets
//!
//! A target is the normalized, wire-visible identity of a query: its ordering
//! is already total and, for limit-to-last queries, already inverted. Two
//! queries that produce equal targets listen to the same result stream.

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::bound::Bound;
use super::filter::Filter;
use super::order_by::OrderBy;
use crate::model::{DocumentKey, ResourcePath};

#[derive(Debug, Clone)]
pub struct Target {
    path: ResourcePath,
    collection_group: Option<Arc<str>>,
    filters: Vec<Filter>,
    order_bys: Vec<OrderBy>,
    limit: Option<i32>,
    start_at: Option<Bound>,
    end_at: Option<Bound>,
    canonical_id: OnceLock<String>,
}

impl Target {
    pub fn new(
        path: ResourcePath,
        collection_group: Option<Arc<str>>,
        filters: Vec<Filter>,
        order_bys: Vec<OrderBy>,
        limit: Option<i32>,
        start_at: Option<Bound>,
        end_at: Option<Bound>,
    ) -> Self {
        Self {
            path,
            collection_group,
            filters,
            order_bys,
            limit,
            start_at,
            end_at,
            canonical_id: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    pub fn collection_group(&self) -> Option<&str> {
        self.collection_group.as_deref()
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn order_bys(&self) -> &[OrderBy] {
        &self.order_bys
    }

    pub fn limit(&self) -> Option<i32> {
        self.limit
    }

    pub fn start_at(&self) -> Option<&Bound> {
        self.start_at.as_ref()
    }

    pub fn end_at(&self) -> Option<&Bound> {
        self.end_at.as_ref()
    }

    /// True if this target reads exactly one document by key.
    pub fn is_document_query(&self) -> bool {
        DocumentKey::is_document_key(&self.path)
            && self.collection_group.is_none()
            && self.filters.is_empty()
    }

    /// Deterministic encoding of every field; computed once.
    pub fn canonical_id(&self) -> &str {
        self.canonical_id.get_or_init(|| self.compute_canonical_id())
    }

    fn compute_canonical_id(&self) -> String {
        let mut id = self.path.canonical_string();

        if let Some(group) = &self.collection_group {
            id.push_str("|cg:");
            id.push_str(group);
        }

        let filters: Vec<String> = self.filters.iter().map(Filter::canonical_id).collect();
        id.push_str("|f:");
        id.push_str(&filters.join(","));

        let order_bys: Vec<String> = self.order_bys.iter().map(OrderBy::canonical_id).collect();
        id.push_str("|ob:");
        id.push_str(&order_bys.join(","));

        if let Some(limit) = self.limit {
            id.push_str("|l:");
            id.push_str(&limit.to_string());
        }
        if let Some(start_at) = &self.start_at {
            id.push_str("|lb:");
            id.push_str(&start_at.position_string());
        }
        if let Some(end_at) = &self.end_at {
            id.push_str("|ub:");
            id.push_str(&end_at.position_string());
        }
        id
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.collection_group == other.collection_group
            && self.filters == other.filters
            && self.order_bys == other.order_bys
            && self.limit == other.limit
            && self.start_at == other.start_at
            && self.end_at == other.end_at
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target(canonical_id={})", self.canonical_id())
    }
}
