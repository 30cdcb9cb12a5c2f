use clinic_model::{Credential, Form, FormData, FormTemplate, Observation, Patient, Privilege, Role, User};
use clinic_store::{FilterBuilder, Page};

use crate::dao::{single, OpenmrsDao, SearchableDao};
use crate::error::Result;

pub type PatientDao = OpenmrsDao<Patient>;
pub type UserDao = OpenmrsDao<User>;
pub type PrivilegeDao = OpenmrsDao<Privilege>;
pub type RoleDao = OpenmrsDao<Role>;
pub type FormDao = OpenmrsDao<Form>;
pub type FormTemplateDao = OpenmrsDao<FormTemplate>;
pub type ObservationDao = OpenmrsDao<Observation>;
pub type CredentialDao = SearchableDao<Credential>;
pub type FormDataDao = SearchableDao<FormData>;

impl OpenmrsDao<Patient> {
    /// Exact identifier lookup; two patients sharing it is an error.
    pub fn get_by_identifier(&self, identifier: &str) -> Result<Option<Patient>> {
        let filters = FilterBuilder::new().eq("identifier", Some(identifier)).build();
        if filters.is_empty() {
            return Ok(None);
        }
        single(self.local().find(&filters, None)?, "patient identifier")
    }

    pub fn search(&self, term: &str) -> Result<Vec<Patient>> {
        self.local().search(term, &[], None)
    }
}

impl OpenmrsDao<User> {
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let filters = FilterBuilder::new().eq("username", Some(username)).build();
        if filters.is_empty() {
            return Ok(None);
        }
        single(self.local().find(&filters, None)?, "username")
    }
}

impl SearchableDao<Credential> {
    pub fn get_by_username(&self, username: &str) -> Result<Option<Credential>> {
        let filters = FilterBuilder::new().eq("username", Some(username)).build();
        if filters.is_empty() {
            return Ok(None);
        }
        single(self.find(&filters, None)?, "credential username")
    }

    pub fn get_by_user_uuid(&self, user_uuid: &str) -> Result<Option<Credential>> {
        let filters = FilterBuilder::new().eq("userUuid", Some(user_uuid)).build();
        if filters.is_empty() {
            return Ok(None);
        }
        single(self.find(&filters, None)?, "credential user")
    }
}

impl OpenmrsDao<FormTemplate> {
    /// Templates belonging to `form_uuid`.
    pub fn get_by_form(&self, form_uuid: &str) -> Result<Vec<FormTemplate>> {
        let filters = FilterBuilder::new().eq("formUuid", Some(form_uuid)).build();
        if filters.is_empty() {
            return Ok(Vec::new());
        }
        self.local().find(&filters, None)
    }
}

impl OpenmrsDao<Observation> {
    /// Observations of `concept_uuid` for a patient; blank arguments widen the match.
    pub fn get(&self, patient_uuid: &str, concept_uuid: &str) -> Result<Vec<Observation>> {
        self.local().find(&observation_filters(patient_uuid, concept_uuid), None)
    }

    pub fn get_paged(&self, patient_uuid: &str, concept_uuid: &str, page: Page) -> Result<Vec<Observation>> {
        self.local().find(&observation_filters(patient_uuid, concept_uuid), Some(page))
    }

    /// Full-text search within one patient's observations.
    pub fn search(&self, patient_uuid: &str, term: &str) -> Result<Vec<Observation>> {
        let filters = FilterBuilder::new().eq("patientUuid", Some(patient_uuid)).build();
        self.local().search(term, &filters, None)
    }
}

fn observation_filters(patient_uuid: &str, concept_uuid: &str) -> Vec<clinic_store::Filter> {
    FilterBuilder::new()
        .eq("patientUuid", Some(patient_uuid))
        .eq("conceptUuid", Some(concept_uuid))
        .build()
}

impl SearchableDao<FormData> {
    /// Form data narrowed by whichever of patient, user and status are given.
    pub fn get_all_for(
        &self,
        patient_uuid: Option<&str>,
        user_uuid: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<FormData>> {
        self.find(&form_data_filters(patient_uuid, user_uuid, status), None)
    }

    pub fn get_page_for(
        &self,
        patient_uuid: Option<&str>,
        user_uuid: Option<&str>,
        status: Option<&str>,
        page: Page,
    ) -> Result<Vec<FormData>> {
        self.find(&form_data_filters(patient_uuid, user_uuid, status), Some(page))
    }
}

fn form_data_filters(patient_uuid: Option<&str>, user_uuid: Option<&str>, status: Option<&str>) -> Vec<clinic_store::Filter> {
    FilterBuilder::new()
        .eq("patientUuid", patient_uuid)
        .eq("userUuid", user_uuid)
        .eq("status", status)
        .build()
}
