//! Documents and document keys

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::path::{FieldPath, ResourcePath};
use crate::query::errors::{fatal, QueryError};

/// Path of a single document: an even, non-zero number of segments
/// alternating collection id and document id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "ResourcePath", into = "ResourcePath")]
pub struct DocumentKey {
    path: ResourcePath,
}

impl DocumentKey {
    /// Returns true if `path` addresses a document rather than a collection.
    pub fn is_document_key(path: &ResourcePath) -> bool {
        !path.is_empty() && path.len() % 2 == 0
    }

    /// Wraps a document path.
    ///
    /// # Panics
    ///
    /// If `path` is not a document path.
    pub fn new(path: ResourcePath) -> Self {
        match Self::try_new(path) {
            Ok(key) => key,
            Err(err) => fatal(err),
        }
    }

    pub fn try_new(path: ResourcePath) -> Result<Self, QueryError> {
        if Self::is_document_key(&path) {
            Ok(Self { path })
        } else {
            Err(QueryError::InvalidDocumentKey(path.canonical_string()))
        }
    }

    /// Parses `rooms/r1`.
    ///
    /// # Panics
    ///
    /// If the string is not a document path.
    pub fn from_path_string(path: &str) -> Self {
        Self::new(ResourcePath::from_string(path))
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    /// Id of the collection directly containing this document.
    pub fn collection_group(&self) -> &str {
        // Document paths have at least two segments
        &self.path.segments()[self.path.len() - 2]
    }

    pub fn has_collection_group(&self, collection_id: &str) -> bool {
        self.collection_group() == collection_id
    }
}

impl TryFrom<ResourcePath> for DocumentKey {
    type Error = QueryError;

    fn try_from(path: ResourcePath) -> Result<Self, Self::Error> {
        Self::try_new(path)
    }
}

impl From<DocumentKey> for ResourcePath {
    fn from(key: DocumentKey) -> Self {
        key.path
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// What the cache knows about a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentState {
    /// The document exists and its body is known
    Found,
    /// The document is known to be absent (deleted or never written)
    NoDocument,
    /// The document exists but its body is not known locally
    Unknown,
}

/// A cached document: its key, its state and, when found, its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    key: DocumentKey,
    state: DocumentState,
    data: Map<String, Value>,
}

impl Document {
    /// An existing document with the given body.
    ///
    /// # Panics
    ///
    /// If `data` is not a JSON object.
    pub fn found(key: DocumentKey, data: Value) -> Self {
        match Self::try_found(key, data) {
            Ok(doc) => doc,
            Err(err) => fatal(err),
        }
    }

    pub fn try_found(key: DocumentKey, data: Value) -> Result<Self, QueryError> {
        match data {
            Value::Object(data) => Ok(Self {
                key,
                state: DocumentState::Found,
                data,
            }),
            _ => Err(QueryError::InvalidDocumentBody(key.to_string())),
        }
    }

    /// A document known to be absent.
    pub fn no_document(key: DocumentKey) -> Self {
        Self {
            key,
            state: DocumentState::NoDocument,
            data: Map::new(),
        }
    }

    /// A document whose contents are unknown.
    pub fn unknown(key: DocumentKey) -> Self {
        Self {
            key,
            state: DocumentState::Unknown,
            data: Map::new(),
        }
    }

    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    pub fn is_found_document(&self) -> bool {
        self.state == DocumentState::Found
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Value at `path`, walking nested objects.
    ///
    /// The key path is not a body field; key comparisons go through
    /// [`Document::key`].
    pub fn field(&self, path: &FieldPath) -> Option<&Value> {
        let (first, rest) = path.segments().split_first()?;
        let mut current = self.data.get(first)?;
        for segment in rest {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}
