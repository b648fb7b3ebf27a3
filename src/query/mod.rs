//! Query model and evaluation
//!
//! - `filter`: field and composite predicates
//! - `order_by`: ordering clauses
//! - `bound`: start and end cursors
//! - `query`: the immutable query and its derived state
//! - `target`: canonical listen targets
//! - `comparator`: document ordering
//!
//! Queries are checked as they are built. A query that exists is valid, so
//! matching and ordering are infallible.

mod bound;
mod comparator;
pub mod errors;
mod filter;
mod order_by;
mod query;
mod target;

pub use bound::Bound;
pub use comparator::DocumentComparator;
pub use errors::{QueryError, QueryErrorCode, QueryResult};
pub use filter::{CompositeFilter, CompositeOperator, FieldFilter, Filter, Operator};
pub use order_by::{Direction, OrderBy};
pub use query::{LimitType, Query};
pub use target::Target;
