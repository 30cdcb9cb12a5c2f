use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};
use crate::resource::ResourceDescriptor;

/// Values used when neither the config file nor the environment says otherwise.
pub struct ConnectionDefaults {
    pub server: &'static str,
    pub db_path: &'static str,
    pub timeout_secs: u64,
    /// Documents removed per round trip by the bulk delete.
    pub delete_batch: usize,
}

pub const CONNECTION_DEFAULTS: ConnectionDefaults = ConnectionDefaults {
    server: "http://localhost:8081/openmrs",
    db_path: "target/clinic/clinic.db",
    timeout_secs: 30,
    delete_batch: 500,
};

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub db_path: PathBuf,
    pub server: String,
    pub username: String,
    pub password: String,
    pub timeout_secs: u64,
    /// Extra descriptors; one with an existing name replaces the default.
    pub resources: Vec<ResourceDescriptor>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(CONNECTION_DEFAULTS.db_path),
            server: CONNECTION_DEFAULTS.server.to_string(),
            username: String::new(),
            password: String::new(),
            timeout_secs: CONNECTION_DEFAULTS.timeout_secs,
            resources: Vec::new(),
        }
    }
}

impl ServiceConfig {
    /// Load from a JSON file; absent keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Config(format!("read {}: {e}", path.display())))?;
        serde_json::from_str(&raw).map_err(|e| ServiceError::Config(format!("parse {}: {e}", path.display())))
    }

    /// Apply `CLINIC_*` environment overrides.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CLINIC_DB_PATH") {
            self.db_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("CLINIC_SERVER") {
            self.server = v;
        }
        if let Some(v) = lookup("CLINIC_USERNAME") {
            self.username = v;
        }
        if let Some(v) = lookup("CLINIC_PASSWORD") {
            self.password = v;
        }
        self
    }

    /// Set the account and server used for downloads.
    pub fn configure(&mut self, username: &str, password: &str, server: &str) {
        self.username = username.to_string();
        self.password = password.to_string();
        self.server = server.to_string();
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(ServiceError::Config("timeout_secs must be positive".into()));
        }
        if !(self.server.starts_with("http://") || self.server.starts_with("https://")) {
            return Err(ServiceError::Config(format!("server is not an http(s) url: {}", self.server)));
        }
        Ok(())
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("db_path", &self.db_path)
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("resources", &self.resources.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_keys() {
        let cfg = ServiceConfig::default().with_overrides(|k| match k {
            "CLINIC_SERVER" => Some("https://demo.example/openmrs".into()),
            "CLINIC_USERNAME" => Some("admin".into()),
            _ => None,
        });
        assert_eq!(cfg.server, "https://demo.example/openmrs");
        assert_eq!(cfg.username, "admin");
        assert_eq!(cfg.db_path, PathBuf::from(CONNECTION_DEFAULTS.db_path));
    }

    #[test]
    fn debug_hides_password() {
        let mut cfg = ServiceConfig::default();
        cfg.configure("admin", "Admin123", "http://localhost/openmrs");
        let shown = format!("{cfg:?}");
        assert!(!shown.contains("Admin123"));
        assert!(shown.contains("admin"));
    }

    #[test]
    fn validate_checks_server_and_timeout() {
        assert!(ServiceConfig::default().validate().is_ok());
        let mut cfg = ServiceConfig::default();
        cfg.server = "localhost".into();
        assert!(matches!(cfg.validate(), Err(ServiceError::Config(_))));
        let cfg = ServiceConfig { timeout_secs: 0, ..ServiceConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn file_keeps_defaults_for_absent_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clinic.json");
        std::fs::write(
            &path,
            r#"{"username":"nurse","resources":[{"name":"Search Patient Resource","path":"ws/rest/v1/patient?identifier={q}","shape":{"type":"list","field":"results"}}]}"#,
        )
        .expect("write");
        let cfg = ServiceConfig::from_file(&path).expect("loads");
        assert_eq!(cfg.username, "nurse");
        assert_eq!(cfg.timeout_secs, CONNECTION_DEFAULTS.timeout_secs);
        assert_eq!(cfg.resources.len(), 1);
    }
}
