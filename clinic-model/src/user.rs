use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use crate::person::{self, PersonName};
use crate::{push_field, Searchable};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub uuid: String,
    pub username: String,
    pub system_id: String,
    pub names: Vec<PersonName>,
    pub role_uuids: Vec<String>,
    pub privilege_uuids: Vec<String>,
}

impl User {
    pub fn new(uuid: impl Into<String>, username: impl Into<String>) -> Self {
        Self { uuid: uuid.into(), username: username.into(), ..Self::default() }
    }

    pub fn preferred_name(&self) -> Option<&PersonName> {
        person::preferred(&self.names)
    }
}

impl Searchable for User {
    const KIND: &'static str = "user";

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn index_fields(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_field(&mut out, "username", &self.username);
        push_field(&mut out, "systemId", &self.system_id);
        for name in &self.names {
            for part in name.parts() {
                push_field(&mut out, "name", part);
            }
        }
        out
    }
}

/// Locally cached login material for a user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credential {
    pub uuid: String,
    pub user_uuid: String,
    pub username: String,
    /// Lowercase hex SHA-512 of `password + salt`.
    pub password: String,
    pub salt: String,
}

impl Credential {
    /// Build a credential from a clear-text password, hashing it with `salt`.
    pub fn with_password(
        uuid: impl Into<String>,
        user_uuid: impl Into<String>,
        username: impl Into<String>,
        password: &str,
        salt: impl Into<String>,
    ) -> Self {
        let salt = salt.into();
        Self {
            uuid: uuid.into(),
            user_uuid: user_uuid.into(),
            username: username.into(),
            password: hash_password(password, &salt),
            salt,
        }
    }

    /// True when `candidate` hashes to the stored password.
    pub fn matches(&self, candidate: &str) -> bool {
        !self.password.is_empty() && hash_password(candidate, &self.salt).eq_ignore_ascii_case(&self.password)
    }
}

pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

impl Searchable for Credential {
    const KIND: &'static str = "credential";

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn index_fields(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_field(&mut out, "username", &self.username);
        push_field(&mut out, "userUuid", &self.user_uuid);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Privilege {
    pub uuid: String,
    pub name: String,
}

impl Privilege {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self { uuid: uuid.into(), name: name.into() }
    }
}

impl Searchable for Privilege {
    const KIND: &'static str = "privilege";

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn index_fields(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_field(&mut out, "name", &self.name);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Role {
    pub uuid: String,
    pub name: String,
    pub description: String,
    pub privilege_uuids: Vec<String>,
}

impl Role {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self { uuid: uuid.into(), name: name.into(), ..Self::default() }
    }
}

impl Searchable for Role {
    const KIND: &'static str = "role";

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn index_fields(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_field(&mut out, "name", &self.name);
        out
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.description).trim().to_string()
    }
}
