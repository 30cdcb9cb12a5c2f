//! Remote side of downloads: a plain authenticated GET returning the body.

use std::time::Duration;

use tracing::debug;

use crate::config::ServiceConfig;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("http client: {0}")]
    Client(String),
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },
    #[error("{url} answered {status}")]
    Status { url: String, status: u16 },
    #[error("path template: {0}")]
    Template(String),
    #[error("payload: {0}")]
    Payload(String),
}

/// Fetches the body behind a server-relative path.
pub trait RemoteFetcher: Send + Sync {
    fn fetch(&self, path: &str) -> Result<String, RemoteError>;
}

/// `RemoteFetcher` over reqwest's blocking client with basic auth.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    server: String,
    username: String,
    password: String,
}

impl HttpFetcher {
    pub fn new(server: &str, username: &str, password: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("clinic-service/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::Client(e.to_string()))?;
        Ok(Self {
            client,
            server: server.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn from_config(cfg: &ServiceConfig) -> Result<Self, RemoteError> {
        Self::new(&cfg.server, &cfg.username, &cfg.password, Duration::from_secs(cfg.timeout_secs))
    }
}

impl RemoteFetcher for HttpFetcher {
    fn fetch(&self, path: &str) -> Result<String, RemoteError> {
        let url = join_url(&self.server, path);
        debug!(%url, "GET");
        let resp = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| RemoteError::Request { url: url.clone(), reason: e.to_string() })?;

        if !resp.status().is_success() {
            return Err(RemoteError::Status { url, status: resp.status().as_u16() });
        }
        resp.text().map_err(|e| RemoteError::Request { url, reason: e.to_string() })
    }
}

/// Join a server base and a relative path with exactly one slash between.
pub fn join_url(server: &str, path: &str) -> String {
    format!("{}/{}", server.trim_end_matches('/'), path.trim_start_matches('/'))
}
