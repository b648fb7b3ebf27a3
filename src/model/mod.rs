//! Document model consumed by the query core
//!
//! Paths, document keys, cached documents, and the value ordering shared by
//! filters, bounds and comparators.

mod document;
mod path;
pub mod values;

pub use document::{Document, DocumentKey, DocumentState};
pub use path::{FieldPath, ResourcePath, KEY_FIELD_NAME};
