use clinic_model::{Form, FormData, FormTemplate};
use clinic_store::Page;

use crate::dao::{FormDao, FormDataDao, FormTemplateDao};
use crate::error::Result;
use crate::resource::{LOCAL_FORM_DATA, SEARCH_FORM, SEARCH_FORM_TEMPLATE, UUID_FORM, UUID_FORM_TEMPLATE};

pub struct FormService {
    forms: FormDao,
    templates: FormTemplateDao,
    form_data: FormDataDao,
}

impl FormService {
    pub fn new(forms: FormDao, templates: FormTemplateDao, form_data: FormDataDao) -> Self {
        Self { forms, templates, form_data }
    }

    pub fn download_form_by_uuid(&self, uuid: &str) -> Result<Option<Form>> {
        self.forms.download_one(&[("uuid", uuid)], UUID_FORM)
    }

    pub fn download_forms_by_name(&self, name: &str) -> Result<Vec<Form>> {
        self.forms.download(&[("q", name)], SEARCH_FORM)
    }

    pub fn save_form(&self, form: &Form) -> Result<()> {
        self.forms.local().save(form, UUID_FORM)
    }

    pub fn save_forms(&self, forms: &[Form]) -> Result<()> {
        self.forms.local().save_all(forms, UUID_FORM)
    }

    pub fn update_form(&self, form: &Form) -> Result<()> {
        self.forms.local().update(form, UUID_FORM)
    }

    pub fn get_form_by_uuid(&self, uuid: &str) -> Result<Option<Form>> {
        self.forms.local().get_by_uuid(uuid)
    }

    pub fn get_forms_by_name(&self, name: &str) -> Result<Vec<Form>> {
        self.forms.local().get_by_name(name)
    }

    pub fn get_all_forms(&self) -> Result<Vec<Form>> {
        self.forms.local().get_all()
    }

    pub fn delete_form(&self, form: &Form) -> Result<()> {
        self.forms.local().delete(form, UUID_FORM)
    }

    pub fn delete_all_forms(&self) -> Result<usize> {
        self.forms.local().delete_all(UUID_FORM)
    }

    pub fn download_form_template_by_uuid(&self, uuid: &str) -> Result<Option<FormTemplate>> {
        self.templates.download_one(&[("uuid", uuid)], UUID_FORM_TEMPLATE)
    }

    /// Download every template the server holds for `form_uuid`.
    pub fn download_form_templates(&self, form_uuid: &str) -> Result<Vec<FormTemplate>> {
        self.templates.download(&[("form", form_uuid)], SEARCH_FORM_TEMPLATE)
    }

    pub fn save_form_template(&self, template: &FormTemplate) -> Result<()> {
        self.templates.local().save(template, UUID_FORM_TEMPLATE)
    }

    pub fn get_form_template_by_uuid(&self, uuid: &str) -> Result<Option<FormTemplate>> {
        self.templates.local().get_by_uuid(uuid)
    }

    pub fn get_form_templates_by_form(&self, form_uuid: &str) -> Result<Vec<FormTemplate>> {
        self.templates.get_by_form(form_uuid)
    }

    pub fn delete_form_template(&self, template: &FormTemplate) -> Result<()> {
        self.templates.local().delete(template, UUID_FORM_TEMPLATE)
    }

    pub fn save_form_data(&self, data: &FormData) -> Result<()> {
        self.form_data.save(data, LOCAL_FORM_DATA)
    }

    pub fn update_form_data(&self, data: &FormData) -> Result<()> {
        self.form_data.update(data, LOCAL_FORM_DATA)
    }

    pub fn get_form_data_by_uuid(&self, uuid: &str) -> Result<Option<FormData>> {
        self.form_data.get_by_uuid(uuid)
    }

    pub fn get_all_form_data(
        &self,
        patient_uuid: Option<&str>,
        user_uuid: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<FormData>> {
        self.form_data.get_all_for(patient_uuid, user_uuid, status)
    }

    pub fn get_form_data_page(
        &self,
        patient_uuid: Option<&str>,
        user_uuid: Option<&str>,
        status: Option<&str>,
        page: Page,
    ) -> Result<Vec<FormData>> {
        self.form_data.get_page_for(patient_uuid, user_uuid, status, page)
    }

    pub fn delete_form_data(&self, data: &FormData) -> Result<()> {
        self.form_data.delete(data, LOCAL_FORM_DATA)
    }
}
