use gf_core::{Hru, SimInfo, parse_timestamp};
use gf_publish::{HruRecord, TABLE_CONTENT_TYPE, publish, result_prefix};
use gf_runner::{BatchResults, HruOutcome, HruSuccess};
use gf_store::MemStore;

fn test_info() -> SimInfo {
    // Three 480-minute steps over one day keeps the artifacts small.
    SimInfo::new(
        parse_timestamp("2001-07-04").unwrap(),
        parse_timestamp("2001-07-05").unwrap(),
        480,
        "HIS",
        "R17C42",
    )
    .unwrap()
}

fn hru(code: &str) -> Hru {
    code.parse().expect("test hru code")
}

fn success_outcome() -> HruOutcome {
    HruOutcome::Success(HruSuccess {
        surface_runoff: vec![0.0, 0.25, 0.5],
        groundwater_outflow: vec![0.0; 3],
        interflow: vec![0.0; 3],
        messages: vec!["clamped 1 negative PET value".to_string()],
    })
}

fn failure_outcome() -> HruOutcome {
    HruOutcome::Failure {
        message: "INFILT must be positive".to_string(),
        detail: "InvalidParameter { .. }".to_string(),
    }
}

#[test]
fn publish_writes_artifact_record_and_failure_marker() {
    let store = MemStore::new();
    let info = test_info();
    let mut results = BatchResults::new();
    results.insert(hru("hru000"), success_outcome());
    results.insert(hru("hru250"), failure_outcome());

    let summary = publish(&store, &info, &results, 4).expect("publish failed");

    assert_eq!(result_prefix(&info), "HIS/results/R17C42");
    assert_eq!(summary.paths.len(), 2);
    assert_eq!(
        summary.paths[0].artifact.as_deref(),
        Some("HIS/results/R17C42/hru000.csv")
    );
    assert_eq!(summary.paths[0].record, "HIS/results/R17C42/hru000.json");
    assert_eq!(summary.paths[1].artifact, None);
    assert_eq!(summary.paths[1].record, "HIS/results/R17C42/hru250.error");

    assert_eq!(
        store.content_type("HIS/results/R17C42/hru000.csv").as_deref(),
        Some(TABLE_CONTENT_TYPE)
    );
    let table = String::from_utf8(store.get_bytes("HIS/results/R17C42/hru000.csv").unwrap())
        .expect("artifact is utf-8");
    assert_eq!(table.lines().count(), 4);
    assert!(table.lines().nth(1).unwrap().starts_with("0,0,0,0,HIS,"));

    let record: HruRecord = serde_json::from_slice(
        &store.get_bytes("HIS/results/R17C42/hru000.json").unwrap(),
    )
    .expect("success record parses");
    assert!(!record.is_failure());
    assert_eq!(record.messages, vec!["clamped 1 negative PET value"]);
    assert_eq!(record.steps, 3);

    let marker: HruRecord = serde_json::from_slice(
        &store.get_bytes("HIS/results/R17C42/hru250.error").unwrap(),
    )
    .expect("failure record parses");
    assert!(marker.is_failure());
    assert_eq!(marker.error.as_deref(), Some("INFILT must be positive"));
    assert!(!store.contains("HIS/results/R17C42/hru250.csv"));
}

#[test]
fn success_retracts_stale_failure_marker() {
    let store = MemStore::new();
    let info = test_info();
    let marker_path = "HIS/results/R17C42/hru000.error";

    let mut failing = BatchResults::new();
    failing.insert(hru("hru000"), failure_outcome());
    publish(&store, &info, &failing, 1).expect("publish failure failed");
    assert!(store.contains(marker_path));

    let mut fixed = BatchResults::new();
    fixed.insert(hru("hru000"), success_outcome());
    publish(&store, &info, &fixed, 1).expect("publish success failed");

    assert!(!store.contains(marker_path), "stale marker must be retracted");
    assert!(store.contains("HIS/results/R17C42/hru000.csv"));
    assert!(store.contains("HIS/results/R17C42/hru000.json"));
}

#[test]
fn retraction_tolerates_absent_marker() {
    let store = MemStore::new();
    let info = test_info();
    let mut results = BatchResults::new();
    results.insert(hru("hru222"), success_outcome());

    publish(&store, &info, &results, 2).expect("publish failed");
    publish(&store, &info, &results, 2).expect("second publish failed");

    assert!(store.contains("HIS/results/R17C42/hru222.json"));
    assert!(!store.contains("HIS/results/R17C42/hru222.error"));
}
