use std::sync::Arc;

use clinic_model::{Algorithm, Searchable};
use clinic_store::SharedIndex;
use tracing::info;

use crate::context::Context;
use crate::dao::{single, SearchableDao};
use crate::error::Result;

/// A `SearchableDao` that can also pull its records from the server.
pub struct OpenmrsDao<T: Searchable> {
    local: SearchableDao<T>,
    algorithm: Arc<dyn Algorithm<T>>,
}

impl<T: Searchable> OpenmrsDao<T> {
    pub fn new(index: SharedIndex, context: Arc<Context>, algorithm: Arc<dyn Algorithm<T>>) -> Self {
        Self { local: SearchableDao::new(index, context), algorithm }
    }

    pub fn local(&self) -> &SearchableDao<T> {
        &self.local
    }

    /// Fetch and map remote records without persisting them.
    pub fn fetch(&self, params: &[(&str, &str)], resource: &str) -> Result<Vec<T>> {
        let values = self.local.context().fetch_records(resource, params)?;
        values
            .iter()
            .map(|v| self.algorithm.deserialize(v).map_err(Into::into))
            .collect()
    }

    /// Fetch remote records and store them as one batch. Any failure leaves
    /// the local store as it was.
    pub fn download(&self, params: &[(&str, &str)], resource: &str) -> Result<Vec<T>> {
        let records = self.fetch(params, resource)?;
        self.local.save_all(&records, resource)?;
        info!(kind = T::KIND, resource, count = records.len(), "downloaded");
        Ok(records)
    }

    /// Download a record expected to be unique (e.g. by uuid). Several
    /// matches are rejected before anything is stored.
    pub fn download_one(&self, params: &[(&str, &str)], resource: &str) -> Result<Option<T>> {
        let found = single(self.fetch(params, resource)?, resource)?;
        if let Some(record) = &found {
            self.local.save(record, resource)?;
            info!(kind = T::KIND, resource, uuid = record.uuid(), "downloaded");
        }
        Ok(found)
    }
}
