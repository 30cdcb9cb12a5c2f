mod common;

use clinic_model::{Observation, Searchable};
use clinic_service::ServiceError;
use clinic_store::Page;
use common::{count_kind, harness};
use pretty_assertions::assert_eq;
use serde_json::json;

fn weight(uuid: &str, patient: &str, kg: f64) -> Observation {
    let mut o = Observation::new(uuid, patient, "c-weight", "Weight (kg)");
    o.value_numeric = Some(kg);
    o
}

fn diagnosis(uuid: &str, patient: &str, text: &str) -> Observation {
    let mut o = Observation::new(uuid, patient, "c-dx", "Diagnosis");
    o.value_text = Some(text.into());
    o
}

#[test]
fn observations_by_patient_and_concept() {
    let h = harness();
    for o in [weight("o1", "p1", 61.5), diagnosis("o2", "p1", "malaria"), weight("o3", "p2", 70.0), weight("o4", "p1", 62.0)] {
        h.services.observations.save_observation(&o).expect("save");
    }

    let uuids = |found: Vec<Observation>| found.into_iter().map(|o| o.uuid).collect::<Vec<_>>();
    assert_eq!(uuids(h.services.observations.get_observations_by_patient("p1").expect("query")), vec!["o1", "o2", "o4"]);
    assert_eq!(
        uuids(h.services.observations.get_observations_by_concept("p1", "c-weight").expect("query")),
        vec!["o1", "o4"]
    );
    assert_eq!(
        uuids(h.services.observations.get_observations_by_concept_paged("p1", "c-weight", Page::new(1, 1)).expect("page")),
        vec!["o4"]
    );
    assert_eq!(h.services.observations.get_observation_by_uuid("o1").expect("get"), Some(weight("o1", "p1", 61.5)));
}

#[test]
fn search_is_scoped_to_the_patient() {
    let h = harness();
    h.services.observations.save_observation(&diagnosis("o1", "p1", "malaria")).expect("save");
    h.services.observations.save_observation(&diagnosis("o2", "p2", "malaria")).expect("save");
    h.services.observations.save_observation(&diagnosis("o3", "p1", "influenza")).expect("save");

    let hits = h.services.observations.search_observations("p1", "malaria").expect("search");
    assert_eq!(hits.into_iter().map(|o| o.uuid).collect::<Vec<_>>(), vec!["o1"]);
    assert_eq!(h.services.observations.search_observations("p1", "").expect("search").len(), 2);
}

#[test]
fn delete_observation_is_unsupported() {
    let h = harness();
    let stored = weight("o1", "p1", 61.5);
    h.services.observations.save_observation(&stored).expect("save");

    for o in [stored.clone(), Observation::default(), weight("missing", "p9", 1.0)] {
        assert!(matches!(h.services.observations.delete_observation(&o), Err(ServiceError::Unsupported(_))));
    }
    assert!(h.services.observations.get_observation_by_uuid("o1").expect("get").is_some());
}

#[test]
fn update_observation_replaces_value() {
    let h = harness();
    h.services.observations.save_observation(&weight("o1", "p1", 61.5)).expect("save");
    h.services.observations.update_observation(&weight("o1", "p1", 60.0)).expect("update");
    assert_eq!(
        h.services.observations.get_observation_by_uuid("o1").expect("get").and_then(|o| o.value_numeric),
        Some(60.0)
    );
    assert!(matches!(
        h.services.observations.update_observation(&weight("o2", "p1", 1.0)),
        Err(ServiceError::NotFound(_))
    ));
}

#[test]
fn download_by_patient_maps_values() {
    let h = harness();
    h.fetcher.respond(
        "ws/rest/v1/obs?patient=p1&v=full",
        json!({ "results": [
            { "uuid": "o1", "person": { "uuid": "p1" }, "concept": { "uuid": "c-weight", "display": "Weight (kg)" }, "value": 61.5 },
            { "uuid": "o2", "person": { "uuid": "p1" }, "concept": { "uuid": "c-dx", "display": "Diagnosis" },
              "value": { "uuid": "c-malaria", "display": "Malaria" } },
        ]})
        .to_string(),
    );

    let downloaded = h.services.observations.download_observations_by_patient("p1").expect("download");
    assert_eq!(downloaded.len(), 2);
    assert_eq!(downloaded[0].value_numeric, Some(61.5));
    assert_eq!(downloaded[1].value_coded.as_deref(), Some("c-malaria"));
    assert_eq!(h.services.observations.search_observations("p1", "malaria").expect("search").len(), 1);
}

#[test]
fn ambiguous_observation_download_stores_nothing() {
    let h = harness();
    let one = json!({ "uuid": "o1", "person": { "uuid": "p1" }, "concept": { "uuid": "c", "display": "C" }, "value": 1 });
    h.fetcher.respond("ws/rest/v1/obs/o1?v=full", json!([one.clone(), one]).to_string());

    let err = h.services.observations.download_observation_by_uuid("o1").expect_err("duplicate");
    assert!(matches!(err, ServiceError::AmbiguousResult { count: 2, .. }));
    assert_eq!(count_kind(&h.index, Observation::KIND), 0);

    h.fetcher.respond(
        "ws/rest/v1/obs/o5?v=full",
        json!({ "uuid": "o5", "person": { "uuid": "p1" }, "concept": { "uuid": "c", "display": "C" }, "value": "x" }).to_string(),
    );
    assert!(h.services.observations.download_observation_by_uuid("o5").expect("download").is_some());
    assert_eq!(count_kind(&h.index, Observation::KIND), 1);
}
