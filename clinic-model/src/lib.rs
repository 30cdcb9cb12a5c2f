//! Shared clinical record models used across crates

pub mod algorithm;
pub mod form;
pub mod observation;
pub mod patient;
pub mod person;
pub mod user;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use algorithm::Algorithm;
pub use form::{Form, FormData, FormTemplate};
pub use observation::Observation;
pub use patient::{Patient, PatientIdentifier, PatientIdentifierType};
pub use person::PersonName;
pub use user::{Credential, Privilege, Role, User};

/// A record type eligible for indexing and predicate-based lookup.
pub trait Searchable: Clone + Serialize + DeserializeOwned {
    /// Key under which records of this type are indexed; distinct per type.
    const KIND: &'static str;

    /// Stable identity, assigned at creation.
    fn uuid(&self) -> &str;

    /// `(field, value)` pairs the local index can filter on.
    /// A field may appear more than once (e.g. several names).
    fn index_fields(&self) -> Vec<(&'static str, String)>;

    /// Free text fed to the full-text index.
    fn search_text(&self) -> String {
        let mut out = String::new();
        for (_, value) in self.index_fields() {
            if value.trim().is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&value);
        }
        out
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Push `(field, value)` only when `value` carries text.
pub(crate) fn push_field(out: &mut Vec<(&'static str, String)>, field: &'static str, value: &str) {
    if !value.trim().is_empty() {
        out.push((field, value.to_string()));
    }
}
