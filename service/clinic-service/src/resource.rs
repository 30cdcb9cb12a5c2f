//! Named descriptors of remote endpoints and their response shapes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::remote::RemoteError;

pub const UUID_PATIENT: &str = "Uuid Patient Resource";
pub const SEARCH_PATIENT: &str = "Search Patient Resource";
pub const UUID_FORM: &str = "Uuid Form Resource";
pub const SEARCH_FORM: &str = "Search Form Resource";
pub const UUID_FORM_TEMPLATE: &str = "Uuid Form Template Resource";
pub const SEARCH_FORM_TEMPLATE: &str = "Search Form Template Resource";
pub const UUID_OBSERVATION: &str = "Uuid Observation Resource";
pub const SEARCH_OBSERVATION: &str = "Search Observation Resource";
pub const UUID_PRIVILEGE: &str = "Uuid Privilege Resource";
pub const SEARCH_PRIVILEGE: &str = "Search Privilege Resource";
pub const UUID_ROLE: &str = "Uuid Role Resource";
pub const SEARCH_ROLE: &str = "Search Role Resource";
pub const UUID_USER: &str = "Uuid User Resource";
pub const SEARCH_USER: &str = "Search User Resource";
pub const LOCAL_CREDENTIAL: &str = "Local Credential Resource";
pub const LOCAL_FORM_DATA: &str = "Local Form Data Resource";

/// Where the records sit in a response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultShape {
    /// The body is the record (a bare array is read as several records).
    Single,
    /// The records are an array under `field`.
    List { field: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub name: String,
    /// Server-relative path with `{param}` placeholders; `None` for local-only resources.
    #[serde(default)]
    pub path: Option<String>,
    pub shape: ResultShape,
}

impl ResourceDescriptor {
    pub fn remote(name: &str, path: &str, shape: ResultShape) -> Self {
        Self { name: name.to_string(), path: Some(path.to_string()), shape }
    }

    pub fn local(name: &str) -> Self {
        Self { name: name.to_string(), path: None, shape: ResultShape::Single }
    }

    pub fn is_local(&self) -> bool {
        self.path.is_none()
    }

    /// Fill `{param}` placeholders with url-encoded values.
    pub fn expand(&self, params: &[(&str, &str)]) -> Result<String, RemoteError> {
        let template = self
            .path
            .as_deref()
            .ok_or_else(|| RemoteError::Template(format!("{} has no remote path", self.name)))?;

        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| RemoteError::Template(format!("unclosed placeholder in {template}")))?;
            let key = &after[..close];
            let value = params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| *v)
                .ok_or_else(|| RemoteError::Template(format!("no value for {{{key}}} in {}", self.name)))?;
            out.push_str(&urlencoding::encode(value));
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    /// Pull the record objects out of a response body.
    pub fn extract(&self, body: &str) -> Result<Vec<Value>, RemoteError> {
        let value: Value = serde_json::from_str(body).map_err(|e| RemoteError::Payload(e.to_string()))?;
        match (&self.shape, value) {
            (ResultShape::Single, Value::Array(items)) => Ok(items),
            (ResultShape::Single, Value::Null) => Ok(Vec::new()),
            (ResultShape::Single, v) => Ok(vec![v]),
            (ResultShape::List { field }, Value::Object(mut map)) => match map.remove(field) {
                Some(Value::Array(items)) => Ok(items),
                Some(other) => Err(RemoteError::Payload(format!("`{field}` is not an array: {other}"))),
                None => Err(RemoteError::Payload(format!("missing `{field}` in {} response", self.name))),
            },
            (ResultShape::List { .. }, Value::Array(items)) => Ok(items),
            (ResultShape::List { field }, other) => {
                Err(RemoteError::Payload(format!("expected an object holding `{field}`, got {other}")))
            }
        }
    }
}

/// Resource key to descriptor lookup.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    descriptors: HashMap<String, ResourceDescriptor>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// OpenMRS REST v1 endpoints plus the local-only resources.
    pub fn openmrs_defaults() -> Self {
        let results = || ResultShape::List { field: "results".to_string() };
        let mut registry = Self::new();
        for (uuid_key, search_key, entity) in [
            (UUID_PATIENT, SEARCH_PATIENT, "patient"),
            (UUID_FORM, SEARCH_FORM, "form"),
            (UUID_PRIVILEGE, SEARCH_PRIVILEGE, "privilege"),
            (UUID_ROLE, SEARCH_ROLE, "role"),
            (UUID_USER, SEARCH_USER, "user"),
        ] {
            registry.register(ResourceDescriptor::remote(
                uuid_key,
                &format!("ws/rest/v1/{entity}/{{uuid}}?v=full"),
                ResultShape::Single,
            ));
            registry.register(ResourceDescriptor::remote(
                search_key,
                &format!("ws/rest/v1/{entity}?q={{q}}&v=full"),
                results(),
            ));
        }
        registry.register(ResourceDescriptor::remote(
            UUID_FORM_TEMPLATE,
            "ws/rest/v1/muzima/formTemplate/{uuid}?v=full",
            ResultShape::Single,
        ));
        registry.register(ResourceDescriptor::remote(
            SEARCH_FORM_TEMPLATE,
            "ws/rest/v1/muzima/formTemplate?form={form}&v=full",
            results(),
        ));
        registry.register(ResourceDescriptor::remote(UUID_OBSERVATION, "ws/rest/v1/obs/{uuid}?v=full", ResultShape::Single));
        registry.register(ResourceDescriptor::remote(
            SEARCH_OBSERVATION,
            "ws/rest/v1/obs?patient={patient}&v=full",
            results(),
        ));
        registry.register(ResourceDescriptor::local(LOCAL_CREDENTIAL));
        registry.register(ResourceDescriptor::local(LOCAL_FORM_DATA));
        registry
    }

    /// Add or replace the descriptor under its name.
    pub fn register(&mut self, descriptor: ResourceDescriptor) {
        self.descriptors.insert(descriptor.name.clone(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&ResourceDescriptor> {
        self.descriptors.get(name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
