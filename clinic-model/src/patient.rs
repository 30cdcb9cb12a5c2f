use serde::{Deserialize, Serialize};

use crate::person::{self, PersonName};
use crate::{push_field, Searchable};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Patient {
    pub uuid: String,
    /// "m" / "f" as delivered by the server; empty when unknown.
    pub gender: String,
    pub birthdate: Option<String>,
    pub names: Vec<PersonName>,
    pub identifiers: Vec<PatientIdentifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientIdentifier {
    pub identifier: String,
    pub identifier_type: PatientIdentifierType,
    pub preferred: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientIdentifierType {
    pub uuid: String,
    pub name: String,
}

impl PatientIdentifier {
    pub fn new(type_name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            identifier_type: PatientIdentifierType { uuid: String::new(), name: type_name.into() },
            preferred: true,
        }
    }
}

impl Patient {
    /// Patient with a single preferred name and nothing else.
    pub fn new(uuid: impl Into<String>, given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            names: vec![PersonName::new(given_name, family_name)],
            ..Self::default()
        }
    }

    pub fn preferred_name(&self) -> Option<&PersonName> {
        person::preferred(&self.names)
    }

    pub fn preferred_identifier(&self) -> Option<&PatientIdentifier> {
        self.identifiers.iter().find(|i| i.preferred).or_else(|| self.identifiers.first())
    }

    /// Identifier whose type carries `type_name`.
    pub fn identifier(&self, type_name: &str) -> Option<&PatientIdentifier> {
        self.identifiers.iter().find(|i| i.identifier_type.name == type_name)
    }

    /// One-line listing text, e.g. `♀ Doe, j m, ID-42`.
    pub fn summary(&self) -> String {
        let symbol = if self.gender.eq_ignore_ascii_case("f") { '♀' } else { '♂' };
        let (family, initials) = match self.preferred_name() {
            Some(name) => {
                let initials: Vec<String> = [&name.given_name, &name.middle_name]
                    .iter()
                    .filter_map(|part| part.chars().next())
                    .map(|c| c.to_string())
                    .collect();
                (name.family_name.as_str(), initials.join(" "))
            }
            None => ("", String::new()),
        };
        let identifier = self.preferred_identifier().map(|i| i.identifier.as_str()).unwrap_or("");
        format!("{symbol} {family}, {initials}, {identifier}")
    }
}

impl Searchable for Patient {
    const KIND: &'static str = "patient";

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn index_fields(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        for name in &self.names {
            for part in name.parts() {
                push_field(&mut out, "name", part);
            }
        }
        for id in &self.identifiers {
            push_field(&mut out, "identifier", &id.identifier);
        }
        push_field(&mut out, "gender", &self.gender);
        out
    }
}
