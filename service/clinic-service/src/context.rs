use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use crate::remote::{HttpFetcher, RemoteFetcher};
use crate::resource::{ResourceDescriptor, ResourceRegistry};

/// Resource descriptors plus the fetcher used to reach them.
pub struct Context {
    registry: ResourceRegistry,
    fetcher: Arc<dyn RemoteFetcher>,
}

impl Context {
    pub fn new(registry: ResourceRegistry, fetcher: Arc<dyn RemoteFetcher>) -> Self {
        Self { registry, fetcher }
    }

    /// Default OpenMRS descriptors with the configured ones layered on top,
    /// reached over HTTP.
    pub fn from_config(cfg: &ServiceConfig) -> Result<Self> {
        let mut registry = ResourceRegistry::openmrs_defaults();
        for descriptor in &cfg.resources {
            registry.register(descriptor.clone());
        }
        let fetcher = HttpFetcher::from_config(cfg)?;
        Ok(Self::new(registry, Arc::new(fetcher)))
    }

    pub fn get_resource(&self, key: &str) -> Result<&ResourceDescriptor> {
        self.registry
            .get(key)
            .ok_or_else(|| ServiceError::NotFound(format!("resource descriptor `{key}`")))
    }

    /// GET the resource behind `key` and return its raw record objects.
    pub fn fetch_records(&self, key: &str, params: &[(&str, &str)]) -> Result<Vec<Value>> {
        let descriptor = self.get_resource(key)?;
        if descriptor.is_local() {
            return Err(ServiceError::Unsupported(format!("`{key}` is a local-only resource")));
        }
        let path = descriptor.expand(params)?;
        let body = self.fetcher.fetch(&path)?;
        let records = descriptor.extract(&body)?;
        debug!(resource = key, %path, records = records.len(), "fetched");
        Ok(records)
    }
}
