use clinic_model::ModelError;
use clinic_store::StoreError;

use crate::remote::RemoteError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("invalid query: {0}")]
    QuerySyntaxInvalid(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("{resource} matched {count} records where one was expected")]
    AmbiguousResult { resource: String, count: usize },
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error("remote error: {0}")]
    Remote(String),
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Backend(msg) => ServiceError::StoreUnavailable(msg),
            StoreError::QuerySyntax(msg) => ServiceError::QuerySyntaxInvalid(msg),
            StoreError::NotFound { kind, uuid } => ServiceError::NotFound(format!("{kind} {uuid}")),
            StoreError::Invalid(msg) | StoreError::Codec(msg) => ServiceError::InvalidRecord(msg),
        }
    }
}

// Model errors only arise while mapping server payloads.
impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        ServiceError::Remote(format!("unreadable payload: {e}"))
    }
}

impl From<RemoteError> for ServiceError {
    fn from(e: RemoteError) -> Self {
        ServiceError::Remote(e.to_string())
    }
}
