#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use clinic_service::context::Context;
use clinic_service::remote::{RemoteError, RemoteFetcher};
use clinic_service::resource::ResourceRegistry;
use clinic_service::ClinicServices;
use clinic_store::sqlite_index::SqliteIndex;
use clinic_store::{share, IndexStore, SharedIndex};

/// Serves canned bodies by path and records every request.
#[derive(Default)]
pub struct StubFetcher {
    bodies: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn respond(&self, path: &str, body: impl Into<String>) {
        self.bodies.lock().expect("stub lock").insert(path.to_string(), body.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("stub lock").clone()
    }
}

impl RemoteFetcher for StubFetcher {
    fn fetch(&self, path: &str) -> Result<String, RemoteError> {
        self.calls.lock().expect("stub lock").push(path.to_string());
        self.bodies
            .lock()
            .expect("stub lock")
            .get(path)
            .cloned()
            .ok_or_else(|| RemoteError::Status { url: path.to_string(), status: 404 })
    }
}

pub struct Harness {
    pub services: ClinicServices,
    pub fetcher: Arc<StubFetcher>,
    pub index: SharedIndex,
}

/// Services over an in-memory index and a stub server.
pub fn harness() -> Harness {
    let fetcher = Arc::new(StubFetcher::default());
    let index = share(SqliteIndex::open_in_memory().expect("in-memory index"));
    let context = Context::new(ResourceRegistry::openmrs_defaults(), fetcher.clone());
    Harness { services: ClinicServices::new(index.clone(), Arc::new(context)), fetcher, index }
}

pub fn count_kind(index: &SharedIndex, kind: &str) -> usize {
    index.lock().expect("index lock").count_documents(kind, &[]).expect("count")
}
