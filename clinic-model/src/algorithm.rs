//! Conversions between server JSON payloads and typed records.
//!
//! Each entity gets one strategy object; DAOs receive them as
//! `Arc<dyn Algorithm<T>>` so payload handling can be swapped per deployment.

use serde_json::{json, Map, Value};

use crate::{
    Credential, Form, FormTemplate, ModelError, Observation, Patient, PatientIdentifier, PatientIdentifierType, PersonName,
    Privilege, Role, User,
};

pub trait Algorithm<T>: Send + Sync {
    fn deserialize(&self, json: &Value) -> Result<T, ModelError>;
    fn serialize(&self, record: &T) -> Result<Value, ModelError>;

    /// Parse a raw JSON string and deserialize it.
    fn deserialize_str(&self, json: &str) -> Result<T, ModelError> {
        let value: Value = serde_json::from_str(json)?;
        self.deserialize(&value)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PatientAlgorithm;

#[derive(Debug, Default, Clone, Copy)]
pub struct UserAlgorithm;

#[derive(Debug, Default, Clone, Copy)]
pub struct CredentialAlgorithm;

#[derive(Debug, Default, Clone, Copy)]
pub struct PrivilegeAlgorithm;

#[derive(Debug, Default, Clone, Copy)]
pub struct RoleAlgorithm;

#[derive(Debug, Default, Clone, Copy)]
pub struct FormAlgorithm;

#[derive(Debug, Default, Clone, Copy)]
pub struct FormTemplateAlgorithm;

#[derive(Debug, Default, Clone, Copy)]
pub struct ObservationAlgorithm;

impl Algorithm<Patient> for PatientAlgorithm {
    fn deserialize(&self, json: &Value) -> Result<Patient, ModelError> {
        let person = json.get("person").unwrap_or(&Value::Null);
        let identifiers = array_at(json, "identifiers")
            .iter()
            .map(|id| PatientIdentifier {
                identifier: str_at(id, "identifier"),
                identifier_type: PatientIdentifierType {
                    uuid: str_at(id.get("identifierType").unwrap_or(&Value::Null), "uuid"),
                    name: str_at(id.get("identifierType").unwrap_or(&Value::Null), "name"),
                },
                preferred: bool_at(id, "preferred"),
            })
            .collect();
        Ok(Patient {
            uuid: required_str(json, "uuid")?,
            gender: str_at(person, "gender"),
            birthdate: opt_str_at(person, "birthdate"),
            names: person_names(person),
            identifiers,
        })
    }

    fn serialize(&self, record: &Patient) -> Result<Value, ModelError> {
        let identifiers: Vec<Value> = record
            .identifiers
            .iter()
            .map(|id| {
                json!({
                    "identifier": id.identifier,
                    "preferred": id.preferred,
                    "identifierType": { "uuid": id.identifier_type.uuid, "name": id.identifier_type.name },
                })
            })
            .collect();
        Ok(json!({
            "uuid": record.uuid,
            "person": {
                "gender": record.gender,
                "birthdate": record.birthdate,
                "names": names_json(&record.names),
            },
            "identifiers": identifiers,
        }))
    }
}

impl Algorithm<User> for UserAlgorithm {
    fn deserialize(&self, json: &Value) -> Result<User, ModelError> {
        let person = json.get("person").unwrap_or(&Value::Null);
        Ok(User {
            uuid: required_str(json, "uuid")?,
            username: str_at(json, "username"),
            system_id: str_at(json, "systemId"),
            names: person_names(person),
            role_uuids: uuid_list(json, "roles"),
            privilege_uuids: uuid_list(json, "privileges"),
        })
    }

    fn serialize(&self, record: &User) -> Result<Value, ModelError> {
        Ok(json!({
            "uuid": record.uuid,
            "username": record.username,
            "systemId": record.system_id,
            "person": { "names": names_json(&record.names) },
            "roles": uuid_refs(&record.role_uuids),
            "privileges": uuid_refs(&record.privilege_uuids),
        }))
    }
}

// Credentials never come from the server; the flat `user.uuid` key is the
// device-local storage layout.
impl Algorithm<Credential> for CredentialAlgorithm {
    fn deserialize(&self, json: &Value) -> Result<Credential, ModelError> {
        Ok(Credential {
            uuid: required_str(json, "uuid")?,
            user_uuid: str_at(json, "user.uuid"),
            username: required_str(json, "username")?,
            password: str_at(json, "password"),
            salt: str_at(json, "salt"),
        })
    }

    fn serialize(&self, record: &Credential) -> Result<Value, ModelError> {
        Ok(json!({
            "uuid": record.uuid,
            "user.uuid": record.user_uuid,
            "username": record.username,
            "password": record.password,
            "salt": record.salt,
        }))
    }
}

impl Algorithm<Privilege> for PrivilegeAlgorithm {
    fn deserialize(&self, json: &Value) -> Result<Privilege, ModelError> {
        Ok(Privilege { uuid: required_str(json, "uuid")?, name: str_at(json, "name") })
    }

    fn serialize(&self, record: &Privilege) -> Result<Value, ModelError> {
        Ok(json!({ "uuid": record.uuid, "name": record.name }))
    }
}

impl Algorithm<Role> for RoleAlgorithm {
    fn deserialize(&self, json: &Value) -> Result<Role, ModelError> {
        Ok(Role {
            uuid: required_str(json, "uuid")?,
            name: str_at(json, "name"),
            description: str_at(json, "description"),
            privilege_uuids: uuid_list(json, "privileges"),
        })
    }

    fn serialize(&self, record: &Role) -> Result<Value, ModelError> {
        Ok(json!({
            "uuid": record.uuid,
            "name": record.name,
            "description": record.description,
            "privileges": uuid_refs(&record.privilege_uuids),
        }))
    }
}

impl Algorithm<Form> for FormAlgorithm {
    /// Payloads without a uuid get a fresh v4 one; a missing version defaults to "1".
    fn deserialize(&self, json: &Value) -> Result<Form, ModelError> {
        let uuid = opt_str_at(json, "uuid").unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let version = opt_str_at(json, "version").unwrap_or_else(|| "1".to_string());
        Ok(Form {
            uuid,
            name: required_str(json, "name")?,
            description: str_at(json, "description"),
            version,
        })
    }

    fn serialize(&self, record: &Form) -> Result<Value, ModelError> {
        Ok(json!({
            "uuid": record.uuid,
            "name": record.name,
            "description": record.description,
            "version": record.version,
        }))
    }
}

// The owning form arrives as a `form` reference; a flat `formUuid` is accepted too.
impl Algorithm<FormTemplate> for FormTemplateAlgorithm {
    fn deserialize(&self, json: &Value) -> Result<FormTemplate, ModelError> {
        let form_uuid = json
            .get("form")
            .and_then(|f| opt_str_at(f, "uuid"))
            .or_else(|| opt_str_at(json, "formUuid"))
            .ok_or_else(|| ModelError::MissingField("form.uuid".into()))?;
        Ok(FormTemplate { uuid: required_str(json, "uuid")?, form_uuid, payload: str_at(json, "payload") })
    }

    fn serialize(&self, record: &FormTemplate) -> Result<Value, ModelError> {
        Ok(json!({
            "uuid": record.uuid,
            "form": { "uuid": record.form_uuid },
            "payload": record.payload,
        }))
    }
}

impl Algorithm<Observation> for ObservationAlgorithm {
    fn deserialize(&self, json: &Value) -> Result<Observation, ModelError> {
        let concept = json.get("concept").unwrap_or(&Value::Null);
        let concept_name = concept
            .get("name")
            .and_then(|n| n.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| str_at(concept, "display"));
        let mut obs = Observation {
            uuid: required_str(json, "uuid")?,
            patient_uuid: required_str(json.get("person").unwrap_or(&Value::Null), "uuid")
                .map_err(|_| ModelError::MissingField("person.uuid".into()))?,
            concept_uuid: str_at(concept, "uuid"),
            concept_name,
            obs_datetime: opt_str_at(json, "obsDatetime"),
            ..Observation::default()
        };
        match json.get("value") {
            None | Some(Value::Null) => {}
            Some(Value::Number(n)) => obs.value_numeric = n.as_f64(),
            Some(Value::String(s)) => obs.value_text = Some(s.clone()),
            Some(Value::Bool(b)) => obs.value_text = Some(b.to_string()),
            Some(coded @ Value::Object(_)) => {
                obs.value_coded = opt_str_at(coded, "uuid");
                obs.value_text = opt_str_at(coded, "display");
            }
            Some(Value::Array(_)) => {
                return Err(ModelError::InvalidField {
                    field: "value".into(),
                    reason: "arrays are not observation values".into(),
                })
            }
        }
        Ok(obs)
    }

    fn serialize(&self, record: &Observation) -> Result<Value, ModelError> {
        let value = match (&record.value_coded, record.value_numeric, &record.value_text) {
            (Some(coded), _, display) => json!({ "uuid": coded, "display": display }),
            (None, Some(n), _) => json!(n),
            (None, None, Some(text)) => json!(text),
            (None, None, None) => Value::Null,
        };
        Ok(json!({
            "uuid": record.uuid,
            "person": { "uuid": record.patient_uuid },
            "concept": { "uuid": record.concept_uuid, "display": record.concept_name },
            "value": value,
            "obsDatetime": record.obs_datetime,
        }))
    }
}

fn required_str(json: &Value, key: &str) -> Result<String, ModelError> {
    match json.get(key).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        _ => Err(ModelError::MissingField(key.to_string())),
    }
}

fn opt_str_at(json: &Value, key: &str) -> Option<String> {
    json.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_string)
}

fn str_at(json: &Value, key: &str) -> String {
    opt_str_at(json, key).unwrap_or_default()
}

fn bool_at(json: &Value, key: &str) -> bool {
    json.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn array_at<'a>(json: &'a Value, key: &str) -> &'a [Value] {
    json.get(key).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

fn uuid_list(json: &Value, key: &str) -> Vec<String> {
    array_at(json, key).iter().filter_map(|v| opt_str_at(v, "uuid")).collect()
}

fn uuid_refs(uuids: &[String]) -> Vec<Value> {
    uuids.iter().map(|u| json!({ "uuid": u })).collect()
}

/// Reads `names`, falling back to a lone `preferredName`.
fn person_names(person: &Value) -> Vec<PersonName> {
    let parse = |n: &Value| PersonName {
        given_name: str_at(n, "givenName"),
        middle_name: str_at(n, "middleName"),
        family_name: str_at(n, "familyName"),
        preferred: bool_at(n, "preferred"),
    };
    let names: Vec<PersonName> = array_at(person, "names").iter().map(parse).collect();
    if !names.is_empty() {
        return names;
    }
    match person.get("preferredName") {
        Some(n @ Value::Object(_)) => vec![PersonName { preferred: true, ..parse(n) }],
        _ => Vec::new(),
    }
}

fn names_json(names: &[PersonName]) -> Vec<Value> {
    names
        .iter()
        .map(|n| {
            let mut m = Map::new();
            m.insert("givenName".into(), json!(n.given_name));
            m.insert("middleName".into(), json!(n.middle_name));
            m.insert("familyName".into(), json!(n.family_name));
            m.insert("preferred".into(), json!(n.preferred));
            Value::Object(m)
        })
        .collect()
}
