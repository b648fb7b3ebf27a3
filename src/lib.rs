//! localquery - client-side query matching for a document cache
//!
//! Given an immutable [`Query`], this crate decides which cached documents
//! belong to its result set, how those documents are ordered, and which
//! canonical listen [`Target`] the query maps to.

pub mod config;
pub mod model;
pub mod observability;
pub mod query;

pub use model::{Document, DocumentKey, DocumentState, FieldPath, ResourcePath};
pub use query::{
    Bound, CompositeFilter, CompositeOperator, Direction, DocumentComparator, FieldFilter,
    Filter, LimitType, Operator, OrderBy, Query, QueryError, QueryErrorCode, QueryResult, Target,
};
