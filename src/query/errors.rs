//! Query error types
//!
//! Every error here is a contract violation by the code building the query,
//! not a runtime condition. The unchecked builders route them through
//! [`fatal`]; the `try_` builders hand them back to the caller.
//!
//! Error codes:
//! - LQ_QUERY_DOCUMENT_FILTER
//! - LQ_QUERY_DOCUMENT_ORDER_BY
//! - LQ_QUERY_MULTIPLE_INEQUALITY
//! - LQ_QUERY_ORDER_BY_MISMATCH
//! - LQ_QUERY_LIMIT_NOT_SET
//! - LQ_QUERY_MISSING_KEY_ORDER
//! - LQ_QUERY_BOUND_TOO_LONG
//! - LQ_QUERY_INVALID_DOCUMENT_KEY
//! - LQ_QUERY_INVALID_DOCUMENT_BODY

use std::fmt;

use thiserror::Error;

use crate::observability::{log_event_with_fields, Event};

/// Stable error codes for query contract violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryErrorCode {
    DocumentQueryFilter,
    DocumentQueryOrderBy,
    MultipleInequalityFields,
    FirstOrderByMismatch,
    LimitNotSet,
    MissingKeyOrdering,
    BoundTooLong,
    InvalidDocumentKey,
    InvalidDocumentBody,
}

impl QueryErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            QueryErrorCode::DocumentQueryFilter => "LQ_QUERY_DOCUMENT_FILTER",
            QueryErrorCode::DocumentQueryOrderBy => "LQ_QUERY_DOCUMENT_ORDER_BY",
            QueryErrorCode::MultipleInequalityFields => "LQ_QUERY_MULTIPLE_INEQUALITY",
            QueryErrorCode::FirstOrderByMismatch => "LQ_QUERY_ORDER_BY_MISMATCH",
            QueryErrorCode::LimitNotSet => "LQ_QUERY_LIMIT_NOT_SET",
            QueryErrorCode::MissingKeyOrdering => "LQ_QUERY_MISSING_KEY_ORDER",
            QueryErrorCode::BoundTooLong => "LQ_QUERY_BOUND_TOO_LONG",
            QueryErrorCode::InvalidDocumentKey => "LQ_QUERY_INVALID_DOCUMENT_KEY",
            QueryErrorCode::InvalidDocumentBody => "LQ_QUERY_INVALID_DOCUMENT_BODY",
        }
    }

    /// The query property this error protects
    pub fn invariant(&self) -> &'static str {
        match self {
            QueryErrorCode::DocumentQueryFilter | QueryErrorCode::DocumentQueryOrderBy => {
                "document queries carry no filters or orderings"
            }
            QueryErrorCode::MultipleInequalityFields => "one inequality field per query",
            QueryErrorCode::FirstOrderByMismatch => "first ordering matches the inequality field",
            QueryErrorCode::LimitNotSet => "limit is read only when a limit kind is set",
            QueryErrorCode::MissingKeyOrdering => "normalized ordering ends with the key",
            QueryErrorCode::BoundTooLong => "bound position fits the ordering",
            QueryErrorCode::InvalidDocumentKey => "document keys have an even segment count",
            QueryErrorCode::InvalidDocumentBody => "found documents have an object body",
        }
    }
}

impl fmt::Display for QueryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Query contract violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("No filter is allowed for document query")]
    DocumentQueryFilter,

    #[error("No ordering is allowed for document query")]
    DocumentQueryOrderBy,

    #[error("Query must only have one inequality field: '{existing}' and '{new}'")]
    MultipleInequalityFields { existing: String, new: String },

    #[error("First orderBy '{order_by}' must match inequality field '{inequality}'")]
    FirstOrderByMismatch { order_by: String, inequality: String },

    #[error("Called limit() when no limit was set")]
    LimitNotSet,

    #[error("Query comparator needs to have a key ordering: {0}")]
    MissingKeyOrdering(String),

    #[error("Bound has {position} components but only {order_bys} orderings")]
    BoundTooLong { position: usize, order_bys: usize },

    #[error("Path '{0}' is not a document path")]
    InvalidDocumentKey(String),

    #[error("Body of document '{0}' is not an object")]
    InvalidDocumentBody(String),
}

impl QueryError {
    pub fn code(&self) -> QueryErrorCode {
        match self {
            QueryError::DocumentQueryFilter => QueryErrorCode::DocumentQueryFilter,
            QueryError::DocumentQueryOrderBy => QueryErrorCode::DocumentQueryOrderBy,
            QueryError::MultipleInequalityFields { .. } => {
                QueryErrorCode::MultipleInequalityFields
            }
            QueryError::FirstOrderByMismatch { .. } => QueryErrorCode::FirstOrderByMismatch,
            QueryError::LimitNotSet => QueryErrorCode::LimitNotSet,
            QueryError::MissingKeyOrdering(_) => QueryErrorCode::MissingKeyOrdering,
            QueryError::BoundTooLong { .. } => QueryErrorCode::BoundTooLong,
            QueryError::InvalidDocumentKey(_) => QueryErrorCode::InvalidDocumentKey,
            QueryError::InvalidDocumentBody(_) => QueryErrorCode::InvalidDocumentBody,
        }
    }
}

/// Result type for checked query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Logs the violation as a FATAL event and panics with its message.
pub fn fatal(err: QueryError) -> ! {
    let message = err.to_string();
    log_event_with_fields(
        Event::InvariantViolation,
        &[
            ("code", err.code().code()),
            ("invariant", err.code().invariant()),
            ("message", message.as_str()),
        ],
    );
    panic!("[{}] {}", err.code(), message);
}
