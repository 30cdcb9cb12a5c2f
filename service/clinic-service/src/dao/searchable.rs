use std::marker::PhantomData;
use std::sync::{Arc, MutexGuard};

use clinic_model::Searchable;
use clinic_store::orchestrator::delete_by_filter_orchestrated;
use clinic_store::{DocumentRecord, Filter, FilterBuilder, IndexStore, IndexedDocument, Page, SharedIndex};
use tracing::{debug, info};

use crate::config::CONNECTION_DEFAULTS;
use crate::context::Context;
use crate::error::{Result, ServiceError};

/// Typed CRUD and lookup over one record kind in the shared index.
pub struct SearchableDao<T: Searchable> {
    index: SharedIndex,
    context: Arc<Context>,
    _kind: PhantomData<fn() -> T>,
}

impl<T: Searchable> Clone for SearchableDao<T> {
    fn clone(&self) -> Self {
        Self { index: Arc::clone(&self.index), context: Arc::clone(&self.context), _kind: PhantomData }
    }
}

impl<T: Searchable> SearchableDao<T> {
    pub fn new(index: SharedIndex, context: Arc<Context>) -> Self {
        Self { index, context, _kind: PhantomData }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn save(&self, record: &T, resource: &str) -> Result<()> {
        self.save_all(std::slice::from_ref(record), resource)
    }

    /// Upsert every record in one transaction.
    pub fn save_all(&self, records: &[T], resource: &str) -> Result<()> {
        let docs = self.documents(records, resource)?;
        self.lock()?.upsert_documents(&docs)?;
        debug!(kind = T::KIND, count = records.len(), resource, "saved");
        Ok(())
    }

    /// Replace a stored record; `NotFound` when its uuid is not stored yet.
    pub fn update(&self, record: &T, resource: &str) -> Result<()> {
        let doc = self.document(record, resource)?;
        self.lock()?.replace_document(&doc)?;
        Ok(())
    }

    /// Replace several stored records; nothing is written unless all exist.
    pub fn update_all(&self, records: &[T], resource: &str) -> Result<()> {
        let docs = self.documents(records, resource)?;
        let mut store = self.lock()?;
        for doc in &docs {
            if store.get_document(&doc.kind, &doc.uuid)?.is_none() {
                return Err(ServiceError::NotFound(format!("{} {}", doc.kind, doc.uuid)));
            }
        }
        store.upsert_documents(&docs)?;
        Ok(())
    }

    pub fn get_by_uuid(&self, uuid: &str) -> Result<Option<T>> {
        let found = self.lock()?.get_document(T::KIND, uuid)?;
        found.map(|r| decode(&r)).transpose()
    }

    /// Records whose `name` field starts with `partial`; blank means all.
    pub fn get_by_name(&self, partial: &str) -> Result<Vec<T>> {
        let filters = FilterBuilder::new().prefix("name", Some(partial)).build();
        self.find(&filters, None)
    }

    pub fn get_all(&self) -> Result<Vec<T>> {
        self.find(&[], None)
    }

    pub fn get_all_paged(&self, page: Page) -> Result<Vec<T>> {
        self.find(&[], Some(page))
    }

    pub fn find(&self, filters: &[Filter], page: Option<Page>) -> Result<Vec<T>> {
        let found = self.lock()?.find_documents(T::KIND, filters, page)?;
        found.iter().map(decode::<T>).collect()
    }

    /// Full-text search narrowed by `filters`; a blank term behaves like `find`.
    pub fn search(&self, term: &str, filters: &[Filter], page: Option<Page>) -> Result<Vec<T>> {
        let found = self.lock()?.search_documents(T::KIND, term, filters, page)?;
        found.iter().map(decode::<T>).collect()
    }

    pub fn count(&self, filters: &[Filter]) -> Result<usize> {
        Ok(self.lock()?.count_documents(T::KIND, filters)?)
    }

    /// Remove a stored record; deleting an absent record is `NotFound`.
    pub fn delete(&self, record: &T, resource: &str) -> Result<()> {
        self.context.get_resource(resource)?;
        let removed = self.lock()?.delete_documents(T::KIND, &[record.uuid().to_string()])?;
        if removed == 0 {
            return Err(ServiceError::NotFound(format!("{} {}", T::KIND, record.uuid())));
        }
        debug!(kind = T::KIND, uuid = record.uuid(), "deleted");
        Ok(())
    }

    /// Remove every record of this kind; returns how many went.
    pub fn delete_all(&self, resource: &str) -> Result<usize> {
        self.context.get_resource(resource)?;
        let mut store = self.lock()?;
        let report = delete_by_filter_orchestrated(&mut *store, T::KIND, &[], CONNECTION_DEFAULTS.delete_batch)?;
        info!(kind = T::KIND, deleted = report.deleted, "cleared");
        Ok(report.deleted)
    }

    fn document(&self, record: &T, resource: &str) -> Result<IndexedDocument> {
        self.context.get_resource(resource)?;
        if record.uuid().trim().is_empty() {
            return Err(ServiceError::InvalidRecord(format!("{} without uuid", T::KIND)));
        }
        Ok(IndexedDocument::from_searchable(record, resource)?)
    }

    fn documents(&self, records: &[T], resource: &str) -> Result<Vec<IndexedDocument>> {
        records.iter().map(|r| self.document(r, resource)).collect()
    }

    fn lock(&self) -> Result<MutexGuard<'_, dyn IndexStore + 'static>> {
        self.index
            .lock()
            .map_err(|_| ServiceError::StoreUnavailable("index lock poisoned".into()))
    }
}

fn decode<T: Searchable>(record: &DocumentRecord) -> Result<T> {
    record
        .decode()
        .map_err(|e| ServiceError::StoreUnavailable(format!("stored record unreadable: {e}")))
}
