//! Offline clinical data access: typed DAOs over the local index, remote
//! downloads from an OpenMRS server, and the service façades apps call.

pub mod config;
pub mod context;
pub mod dao;
pub mod error;
pub mod remote;
pub mod resource;
pub mod services;

use std::sync::Arc;

use clinic_model::algorithm::{
    FormAlgorithm, FormTemplateAlgorithm, ObservationAlgorithm, PatientAlgorithm, PrivilegeAlgorithm, RoleAlgorithm, UserAlgorithm,
};
use clinic_store::sqlite_index::SqliteIndex;
use clinic_store::{share, SharedIndex};
use tracing::info;

pub use config::{ServiceConfig, CONNECTION_DEFAULTS};
pub use context::Context;
pub use error::{Result, ServiceError};
pub use services::{FormService, ObservationService, PatientService, UserService};

use crate::dao::{OpenmrsDao, SearchableDao};

/// Every service wired to one index and one remote context.
pub struct ClinicServices {
    pub patients: PatientService,
    pub users: UserService,
    pub forms: FormService,
    pub observations: ObservationService,
}

impl ClinicServices {
    pub fn new(index: SharedIndex, context: Arc<Context>) -> Self {
        Self {
            patients: PatientService::new(OpenmrsDao::new(index.clone(), context.clone(), Arc::new(PatientAlgorithm))),
            users: UserService::new(
                OpenmrsDao::new(index.clone(), context.clone(), Arc::new(UserAlgorithm)),
                SearchableDao::new(index.clone(), context.clone()),
                OpenmrsDao::new(index.clone(), context.clone(), Arc::new(PrivilegeAlgorithm)),
                OpenmrsDao::new(index.clone(), context.clone(), Arc::new(RoleAlgorithm)),
            ),
            forms: FormService::new(
                OpenmrsDao::new(index.clone(), context.clone(), Arc::new(FormAlgorithm)),
                OpenmrsDao::new(index.clone(), context.clone(), Arc::new(FormTemplateAlgorithm)),
                SearchableDao::new(index.clone(), context.clone()),
            ),
            observations: ObservationService::new(OpenmrsDao::new(index, context, Arc::new(ObservationAlgorithm))),
        }
    }

    /// Open the file-backed index and HTTP context described by `cfg`.
    pub fn open(cfg: &ServiceConfig) -> Result<Self> {
        cfg.validate()?;
        if let Some(parent) = cfg.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ServiceError::StoreUnavailable(format!("create {}: {e}", parent.display())))?;
            }
        }
        let index = SqliteIndex::open(&cfg.db_path)?;
        index.maybe_rebuild_fts()?;
        let context = Context::from_config(cfg)?;
        info!(db = %cfg.db_path.display(), server = %cfg.server, "clinic services ready");
        Ok(Self::new(share(index), Arc::new(context)))
    }
}
