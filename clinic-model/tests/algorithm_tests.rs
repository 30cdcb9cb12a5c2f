use clinic_model::algorithm::{
    Algorithm, CredentialAlgorithm, FormAlgorithm, FormTemplateAlgorithm, ObservationAlgorithm, PatientAlgorithm, PrivilegeAlgorithm,
    RoleAlgorithm, UserAlgorithm,
};
use clinic_model::user::hash_password;
use clinic_model::{Credential, FormTemplate, ModelError, Privilege, Searchable};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn patient_payload_maps_person_names_and_identifiers() {
    let payload = json!({
        "uuid": "p-1",
        "person": {
            "gender": "F",
            "birthdate": "1980-01-01T00:00:00.000+0000",
            "names": [{ "givenName": "Jane", "familyName": "Doe", "preferred": true }]
        },
        "identifiers": [{
            "identifier": "MRN-7",
            "preferred": true,
            "identifierType": { "uuid": "it-1", "name": "Medical Record Number" }
        }]
    });

    let patient = PatientAlgorithm.deserialize(&payload).expect("valid patient payload");

    assert_eq!(patient.uuid, "p-1");
    assert_eq!(patient.gender, "F");
    assert_eq!(patient.names[0].full_name(), "Jane Doe");
    assert_eq!(patient.identifier("Medical Record Number").map(|i| i.identifier.as_str()), Some("MRN-7"));
    assert!(patient.summary().starts_with('♀'));
}

#[test]
fn patient_without_uuid_is_rejected() {
    let err = PatientAlgorithm.deserialize(&json!({ "person": {} })).expect_err("uuid is required");
    match err {
        ModelError::MissingField(field) => assert_eq!(field, "uuid"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn user_reads_preferred_name_and_reference_lists() {
    let payload = json!({
        "uuid": "u-1",
        "username": "admin",
        "systemId": "admin-1",
        "person": { "preferredName": { "givenName": "Super", "familyName": "User" } },
        "roles": [{ "uuid": "r-1" }, { "uuid": "r-2" }],
        "privileges": [{ "uuid": "pr-1" }]
    });

    let user = UserAlgorithm.deserialize(&payload).expect("valid user payload");

    assert_eq!(user.username, "admin");
    assert_eq!(user.preferred_name().map(|n| n.full_name()), Some("Super User".to_string()));
    assert_eq!(user.role_uuids, vec!["r-1".to_string(), "r-2".to_string()]);
    assert_eq!(user.privilege_uuids, vec!["pr-1".to_string()]);
}

#[test]
fn form_without_uuid_gets_generated_identity_and_default_version() {
    let payload = json!({ "name": "Registration", "description": "Intake form" });

    let a = FormAlgorithm.deserialize(&payload).expect("valid form");
    let b = FormAlgorithm.deserialize(&payload).expect("valid form");

    assert_eq!(a.version, "1");
    assert_eq!(a.name, "Registration");
    assert!(!a.uuid.is_empty());
    assert_ne!(a.uuid, b.uuid);
}

#[test]
fn form_keeps_server_uuid_when_present() {
    let form = FormAlgorithm
        .deserialize(&json!({ "uuid": "f-9", "name": "Vitals", "version": "3" }))
        .expect("valid form");
    assert_eq!(form.uuid, "f-9");
    assert_eq!(form.version, "3");
}

#[test]
fn credential_uses_flat_user_uuid_key() {
    let credential = Credential::with_password("c-1", "u-1", "nurse", "secret", "pepper");

    let json = CredentialAlgorithm.serialize(&credential).expect("serializable");
    assert_eq!(json["user.uuid"], "u-1");

    let back = CredentialAlgorithm.deserialize_str(&json.to_string()).expect("round trip");
    assert_eq!(back, credential);
}

#[test]
fn credential_matches_only_the_stored_password() {
    let credential = Credential::with_password("c-1", "u-1", "nurse", "secret", "pepper");
    assert_eq!(credential.password, hash_password("secret", "pepper"));
    assert!(credential.matches("secret"));
    assert!(!credential.matches("Secret"));
    assert!(!Credential::default().matches(""));
}

#[test]
fn privilege_serializes_its_name() {
    let json = PrivilegeAlgorithm.serialize(&Privilege::new("pr-1", "View Patients")).expect("serializable");
    assert_eq!(json, json!({ "uuid": "pr-1", "name": "View Patients" }));
}

#[test]
fn role_collects_privilege_uuids() {
    let role = RoleAlgorithm
        .deserialize(&json!({ "uuid": "r-1", "name": "Nurse", "privileges": [{ "uuid": "pr-1" }] }))
        .expect("valid role");
    assert_eq!(role.privilege_uuids, vec!["pr-1".to_string()]);
}

#[test]
fn observation_value_kinds() {
    let numeric = ObservationAlgorithm
        .deserialize(&json!({
            "uuid": "o-1",
            "person": { "uuid": "p-1" },
            "concept": { "uuid": "c-1", "name": { "name": "WEIGHT (KG)" } },
            "value": 71.5
        }))
        .expect("numeric obs");
    assert_eq!(numeric.value_numeric, Some(71.5));
    assert_eq!(numeric.concept_name, "WEIGHT (KG)");

    let coded = ObservationAlgorithm
        .deserialize(&json!({
            "uuid": "o-2",
            "person": { "uuid": "p-1" },
            "concept": { "uuid": "c-2", "display": "HIV STATUS" },
            "value": { "uuid": "c-neg", "display": "NEGATIVE" }
        }))
        .expect("coded obs");
    assert_eq!(coded.value_coded.as_deref(), Some("c-neg"));
    assert_eq!(coded.value_text.as_deref(), Some("NEGATIVE"));
    assert_eq!(coded.concept_name, "HIV STATUS");
}

#[test]
fn observation_requires_person() {
    let err = ObservationAlgorithm
        .deserialize(&json!({ "uuid": "o-1", "concept": { "uuid": "c-1" } }))
        .expect_err("person is required");
    assert!(matches!(err, ModelError::MissingField(ref f) if f == "person.uuid"));
}

#[test]
fn form_template_reads_form_reference_or_flat_uuid() {
    let nested = json!({ "uuid": "t-1", "form": { "uuid": "f-1" }, "payload": "<html/>" });
    let flat = json!({ "uuid": "t-1", "formUuid": "f-1", "payload": "<html/>" });
    let expected = FormTemplate::new("t-1", "f-1", "<html/>");

    assert_eq!(FormTemplateAlgorithm.deserialize(&nested).expect("nested"), expected);
    assert_eq!(FormTemplateAlgorithm.deserialize(&flat).expect("flat"), expected);
    assert_eq!(expected.index_fields(), vec![("formUuid", "f-1".to_string())]);
}

#[test]
fn form_template_requires_its_form() {
    let err = FormTemplateAlgorithm
        .deserialize(&json!({ "uuid": "t-1", "payload": "<html/>" }))
        .expect_err("no form");
    assert!(matches!(err, ModelError::MissingField(ref f) if f == "form.uuid"));
}
