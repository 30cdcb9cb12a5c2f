//! Data access: the generic indexed store, its remote-aware wrapper and the
//! per-entity lookups built on them.

pub mod entities;
pub mod openmrs;
pub mod searchable;

pub use entities::*;
pub use openmrs::OpenmrsDao;
pub use searchable::SearchableDao;

use tracing::warn;

use crate::error::{Result, ServiceError};

/// At most one record is allowed; more is an identity conflict.
pub(crate) fn single<T>(mut found: Vec<T>, resource: &str) -> Result<Option<T>> {
    match found.len() {
        0 | 1 => Ok(found.pop()),
        count => {
            warn!(resource, count, "expected a unique record");
            Err(ServiceError::AmbiguousResult { resource: resource.to_string(), count })
        }
    }
}
