use clinic_model::{Patient, PatientIdentifier, PersonName, Searchable};

fn person_name() -> PersonName {
    PersonName {
        given_name: "givenName".into(),
        middle_name: "middleName".into(),
        family_name: "familyName".into(),
        preferred: true,
    }
}

fn patient() -> Patient {
    Patient {
        uuid: "p-1".into(),
        names: vec![person_name()],
        identifiers: vec![
            PatientIdentifier::new("PatientIdTypeName1", "Identifier1"),
            PatientIdentifier::new("PatientIdTypeName2", "Identifier2"),
        ],
        ..Patient::default()
    }
}

#[test]
fn summary_defaults_to_male_symbol() {
    assert_eq!(patient().summary(), "♂ familyName, g m, Identifier1");
}

#[test]
fn summary_for_male_patient() {
    let mut p = patient();
    p.gender = "m".into();
    assert_eq!(p.summary(), "♂ familyName, g m, Identifier1");
}

#[test]
fn summary_for_female_patient() {
    let mut p = patient();
    p.gender = "f".into();
    assert_eq!(p.summary(), "♀ familyName, g m, Identifier1");
}

#[test]
fn summary_skips_missing_middle_name() {
    let p = Patient::new("p-2", "Jane", "Doe");
    assert_eq!(p.summary(), "♂ Doe, J, ");
}

#[test]
fn identifier_lookup_by_type_name() {
    let p = patient();
    let id = p.identifier("PatientIdTypeName1").expect("identifier type exists");
    assert_eq!(id.identifier, "Identifier1");
    assert!(p.identifier("InvalidIdType").is_none());
}

#[test]
fn preferred_name_falls_back_to_first() {
    let mut p = patient();
    p.names[0].preferred = false;
    p.names.push(PersonName { preferred: false, ..PersonName::new("Other", "Name") });
    assert_eq!(p.preferred_name().map(|n| n.given_name.as_str()), Some("givenName"));
}

#[test]
fn index_fields_cover_every_name_part_and_identifier() {
    let fields = patient().index_fields();
    let names: Vec<&str> = fields.iter().filter(|(f, _)| *f == "name").map(|(_, v)| v.as_str()).collect();
    assert_eq!(names, vec!["givenName", "middleName", "familyName"]);
    assert!(fields.iter().any(|(f, v)| *f == "identifier" && v == "Identifier2"));
    // Gender is unset, so it is not indexed.
    assert!(!fields.iter().any(|(f, _)| *f == "gender"));
}
