use clinic_model::Observation;
use clinic_store::{FilterBuilder, Page};

use crate::dao::ObservationDao;
use crate::error::{Result, ServiceError};
use crate::resource::{SEARCH_OBSERVATION, UUID_OBSERVATION};

pub struct ObservationService {
    observations: ObservationDao,
}

impl ObservationService {
    pub fn new(observations: ObservationDao) -> Self {
        Self { observations }
    }

    pub fn download_observation_by_uuid(&self, uuid: &str) -> Result<Option<Observation>> {
        self.observations.download_one(&[("uuid", uuid)], UUID_OBSERVATION)
    }

    pub fn download_observations_by_patient(&self, patient_uuid: &str) -> Result<Vec<Observation>> {
        self.observations.download(&[("patient", patient_uuid)], SEARCH_OBSERVATION)
    }

    pub fn save_observation(&self, observation: &Observation) -> Result<()> {
        self.observations.local().save(observation, UUID_OBSERVATION)
    }

    pub fn update_observation(&self, observation: &Observation) -> Result<()> {
        self.observations.local().update(observation, UUID_OBSERVATION)
    }

    pub fn get_observation_by_uuid(&self, uuid: &str) -> Result<Option<Observation>> {
        self.observations.local().get_by_uuid(uuid)
    }

    pub fn get_observations_by_patient(&self, patient_uuid: &str) -> Result<Vec<Observation>> {
        let filters = FilterBuilder::new().eq("patientUuid", Some(patient_uuid)).build();
        self.observations.local().find(&filters, None)
    }

    pub fn get_observations_by_concept(&self, patient_uuid: &str, concept_uuid: &str) -> Result<Vec<Observation>> {
        self.observations.get(patient_uuid, concept_uuid)
    }

    pub fn get_observations_by_concept_paged(
        &self,
        patient_uuid: &str,
        concept_uuid: &str,
        page: Page,
    ) -> Result<Vec<Observation>> {
        self.observations.get_paged(patient_uuid, concept_uuid, page)
    }

    pub fn search_observations(&self, patient_uuid: &str, term: &str) -> Result<Vec<Observation>> {
        self.observations.search(patient_uuid, term)
    }

    /// Observations are never removed from the device.
    pub fn delete_observation(&self, _observation: &Observation) -> Result<()> {
        Err(ServiceError::Unsupported("observations cannot be deleted".into()))
    }
}
