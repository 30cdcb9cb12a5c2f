use clinic_model::Patient;

use crate::dao::PatientDao;
use crate::error::Result;
use crate::resource::{SEARCH_PATIENT, UUID_PATIENT};

pub struct PatientService {
    patients: PatientDao,
}

impl PatientService {
    pub fn new(patients: PatientDao) -> Self {
        Self { patients }
    }

    /// Download and store the patient with `uuid`, if the server has one.
    pub fn download_patient_by_uuid(&self, uuid: &str) -> Result<Option<Patient>> {
        self.patients.download_one(&[("uuid", uuid)], UUID_PATIENT)
    }

    /// Download the server's matches for `name`, then answer from the local
    /// store so earlier downloads are included.
    pub fn download_patients_by_name(&self, name: &str) -> Result<Vec<Patient>> {
        self.patients.download(&[("q", name)], SEARCH_PATIENT)?;
        self.get_patients_by_name(name)
    }

    pub fn save_patient(&self, patient: &Patient) -> Result<()> {
        self.patients.local().save(patient, UUID_PATIENT)
    }

    pub fn save_patients(&self, patients: &[Patient]) -> Result<()> {
        self.patients.local().save_all(patients, UUID_PATIENT)
    }

    pub fn update_patient(&self, patient: &Patient) -> Result<()> {
        self.patients.local().update(patient, UUID_PATIENT)
    }

    pub fn update_patients(&self, patients: &[Patient]) -> Result<()> {
        self.patients.local().update_all(patients, UUID_PATIENT)
    }

    pub fn get_patient_by_uuid(&self, uuid: &str) -> Result<Option<Patient>> {
        self.patients.local().get_by_uuid(uuid)
    }

    pub fn get_patient_by_identifier(&self, identifier: &str) -> Result<Option<Patient>> {
        self.patients.get_by_identifier(identifier)
    }

    pub fn get_all_patients(&self) -> Result<Vec<Patient>> {
        self.patients.local().get_all()
    }

    pub fn get_patients_by_name(&self, name: &str) -> Result<Vec<Patient>> {
        self.patients.local().get_by_name(name)
    }

    pub fn search_patients(&self, term: &str) -> Result<Vec<Patient>> {
        self.patients.search(term)
    }

    pub fn count_patients(&self) -> Result<usize> {
        self.patients.local().count(&[])
    }

    pub fn delete_patient(&self, patient: &Patient) -> Result<()> {
        self.patients.local().delete(patient, UUID_PATIENT)
    }
}
