pub mod filter;
pub mod sqlite_index;
pub mod fts5_index;
pub mod orchestrator;

use std::sync::{Arc, Mutex};

use clinic_model::Searchable;

pub use filter::{Filter, FilterBuilder, FilterOp};

/// Thin abstraction for the local index (DB-agnostic).
///
/// Documents are addressed by `(kind, uuid)`; `kind` separates entity types
/// sharing one index.
pub trait IndexStore: Send {
    /// Upsert a batch of documents atomically: either all land or none do.
    fn upsert_documents(&mut self, docs: &[IndexedDocument]) -> Result<(), StoreError>;

    /// Replace an existing document; `StoreError::NotFound` when absent.
    fn replace_document(&mut self, doc: &IndexedDocument) -> Result<(), StoreError>;

    fn get_document(&self, kind: &str, uuid: &str) -> Result<Option<DocumentRecord>, StoreError>;

    /// Documents of `kind` matching every filter, in insertion order.
    fn find_documents(
        &self,
        kind: &str,
        filters: &[Filter],
        page: Option<Page>,
    ) -> Result<Vec<DocumentRecord>, StoreError>;

    /// Full-text query over the documents' search text, best match first.
    /// A blank query behaves like `find_documents`.
    fn search_documents(
        &self,
        kind: &str,
        query: &str,
        filters: &[Filter],
        page: Option<Page>,
    ) -> Result<Vec<DocumentRecord>, StoreError>;

    fn count_documents(&self, kind: &str, filters: &[Filter]) -> Result<usize, StoreError>;

    /// Delete by uuid. Returns the number of documents actually removed.
    fn delete_documents(&mut self, kind: &str, uuids: &[String]) -> Result<usize, StoreError>;
}

/// Index handle shared by every DAO; the mutex is the single-writer guard.
pub type SharedIndex = Arc<Mutex<dyn IndexStore>>;

pub fn share<S: IndexStore + 'static>(store: S) -> SharedIndex {
    Arc::new(Mutex::new(store))
}

/// Write-side shape of a record: payload plus the values the index filters on.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedDocument {
    pub kind: String,
    pub uuid: String,
    /// Resource descriptor the record was saved through.
    pub resource: String,
    pub payload: String,
    pub fields: Vec<(String, String)>,
    pub search_text: String,
}

impl IndexedDocument {
    pub fn from_searchable<T: Searchable>(record: &T, resource: &str) -> Result<Self, StoreError> {
        let payload = serde_json::to_string(record).map_err(|e| StoreError::Codec(e.to_string()))?;
        Ok(Self {
            kind: T::KIND.to_string(),
            uuid: record.uuid().to_string(),
            resource: resource.to_string(),
            payload,
            fields: record.index_fields().into_iter().map(|(f, v)| (f.to_string(), v)).collect(),
            search_text: record.search_text(),
        })
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.kind.trim().is_empty() {
            return Err(StoreError::Invalid("document kind is empty".into()));
        }
        if self.uuid.trim().is_empty() {
            return Err(StoreError::Invalid(format!("{} document has no uuid", self.kind)));
        }
        Ok(())
    }
}

/// Read-side shape of a stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    pub kind: String,
    pub uuid: String,
    pub resource: String,
    pub payload: String,
    /// RFC 3339 time of the last write.
    pub updated_at: String,
}

impl DocumentRecord {
    pub fn decode<T: Searchable>(&self) -> Result<T, StoreError> {
        serde_json::from_str(&self.payload)
            .map_err(|e| StoreError::Codec(format!("{} {}: {e}", self.kind, self.uuid)))
    }
}

/// Zero-based page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub size: usize,
}

impl Page {
    pub fn new(number: usize, size: usize) -> Self {
        Self { number, size }
    }

    pub fn offset(&self) -> usize {
        self.number.saturating_mul(self.size)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),
    #[error("query syntax error: {0}")]
    QuerySyntax(String),
    #[error("{kind} {uuid} not found")]
    NotFound { kind: String, uuid: String },
    #[error("invalid document: {0}")]
    Invalid(String),
    #[error("codec error: {0}")]
    Codec(String),
}
