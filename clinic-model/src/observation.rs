use serde::{Deserialize, Serialize};

use crate::{push_field, Searchable};

/// A single clinical observation recorded against a patient.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Observation {
    pub uuid: String,
    pub patient_uuid: String,
    pub concept_uuid: String,
    pub concept_name: String,
    pub value_text: Option<String>,
    pub value_numeric: Option<f64>,
    /// Uuid of the coded answer concept.
    pub value_coded: Option<String>,
    pub obs_datetime: Option<String>,
}

impl Observation {
    pub fn new(
        uuid: impl Into<String>,
        patient_uuid: impl Into<String>,
        concept_uuid: impl Into<String>,
        concept_name: impl Into<String>,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            patient_uuid: patient_uuid.into(),
            concept_uuid: concept_uuid.into(),
            concept_name: concept_name.into(),
            ..Self::default()
        }
    }

    /// Display form of whichever value is set.
    pub fn value_display(&self) -> String {
        if let Some(n) = self.value_numeric {
            return n.to_string();
        }
        self.value_text.clone().or_else(|| self.value_coded.clone()).unwrap_or_default()
    }
}

impl Searchable for Observation {
    const KIND: &'static str = "observation";

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn index_fields(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_field(&mut out, "patientUuid", &self.patient_uuid);
        push_field(&mut out, "conceptUuid", &self.concept_uuid);
        push_field(&mut out, "name", &self.concept_name);
        out
    }

    // Uuids are left out so free-text search only hits clinical text.
    fn search_text(&self) -> String {
        format!("{} {}", self.concept_name, self.value_display()).trim().to_string()
    }
}
