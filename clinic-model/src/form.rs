use serde::{Deserialize, Serialize};

use crate::{push_field, Searchable};

/// A form definition as published by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Form {
    pub uuid: String,
    pub name: String,
    pub description: String,
    pub version: String,
}

impl Form {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self { uuid: uuid.into(), name: name.into(), version: "1".into(), ..Self::default() }
    }
}

impl Searchable for Form {
    const KIND: &'static str = "form";

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn index_fields(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_field(&mut out, "name", &self.name);
        push_field(&mut out, "version", &self.version);
        out
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.description).trim().to_string()
    }
}

/// A filled-in form captured on the device for a patient.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    pub uuid: String,
    pub patient_uuid: String,
    pub user_uuid: String,
    pub template_uuid: String,
    /// Workflow state, e.g. "draft", "complete", "uploaded".
    pub status: String,
    pub payload: String,
}

impl Searchable for FormData {
    const KIND: &'static str = "form_data";

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn index_fields(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_field(&mut out, "patientUuid", &self.patient_uuid);
        push_field(&mut out, "userUuid", &self.user_uuid);
        push_field(&mut out, "templateUuid", &self.template_uuid);
        push_field(&mut out, "status", &self.status);
        out
    }
}

/// Renderable body (HTML or XML) of a form definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormTemplate {
    pub uuid: String,
    pub form_uuid: String,
    pub payload: String,
}

impl FormTemplate {
    pub fn new(uuid: impl Into<String>, form_uuid: impl Into<String>, payload: impl Into<String>) -> Self {
        Self { uuid: uuid.into(), form_uuid: form_uuid.into(), payload: payload.into() }
    }
}

impl Searchable for FormTemplate {
    const KIND: &'static str = "form_template";

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn index_fields(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_field(&mut out, "formUuid", &self.form_uuid);
        out
    }
}
