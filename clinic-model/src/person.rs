use serde::{Deserialize, Serialize};

/// One name of a person (patient or user).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonName {
    pub given_name: String,
    pub middle_name: String,
    pub family_name: String,
    pub preferred: bool,
}

impl PersonName {
    pub fn new(given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            given_name: given_name.into(),
            middle_name: String::new(),
            family_name: family_name.into(),
            preferred: true,
        }
    }

    /// "given middle family" with empty parts dropped.
    pub fn full_name(&self) -> String {
        [&self.given_name, &self.middle_name, &self.family_name]
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(crate) fn parts(&self) -> [&str; 3] {
        [&self.given_name, &self.middle_name, &self.family_name]
    }
}

/// The preferred name, falling back to the first one.
pub(crate) fn preferred(names: &[PersonName]) -> Option<&PersonName> {
    names.iter().find(|n| n.preferred).or_else(|| names.first())
}
