//! Failures stay inside their own case

use std::sync::Arc;

use mapshootout::catalog::{StdBTreeMap, StdHashMap};

use crate::common::*;

#[test]
fn panicking_implementation_fails_only_its_cases() {
    let implementations: Vec<Arc<dyn ContainerImplementation>> = vec![
        Arc::new(StdHashMap),
        Arc::new(ExplodingImplementation),
        Arc::new(StdBTreeMap),
    ];
    let matrix = TestMatrix::new(integers_only(), implementations).unwrap();
    let (summary, sink) = run_to_vec(matrix);

    assert_eq!(summary.failures.len(), 2 * 8);
    assert_eq!(summary.passed, 2 * 2 * 8);
    for failure in &summary.failures {
        assert!(failure.path.contains("Exploding"));
        assert!(failure.message.contains("cannot build integer maps"));
    }
    assert!(sink.rows.iter().all(|r| r.implementation != "Exploding"));
    assert_eq!(sink.rows.len(), 2 * 2 * 8);
}

#[test]
fn failure_does_not_stop_later_suites() {
    let mut config = tiny_config();
    config.suites.small_strings = false;
    let implementations: Vec<Arc<dyn ContainerImplementation>> =
        vec![Arc::new(ExplodingImplementation), Arc::new(StdHashMap)];
    let matrix = TestMatrix::new(config, implementations).unwrap();
    let (summary, sink) = run_to_vec(matrix);

    assert_eq!(summary.failures.len(), (5 + 8) * 2);
    assert!(sink.rows.iter().any(|r| r.key_label == "largeString"));
    assert!(sink.rows.iter().any(|r| r.key_label == "int64"));
}

#[test]
fn filter_runs_matching_cases_only() {
    let implementations: Vec<Arc<dyn ContainerImplementation>> = vec![Arc::new(StdHashMap)];
    let matrix = TestMatrix::new(integers_only(), implementations).unwrap();
    let mut sink = VecSink::new();
    let probe = NoopProbe;
    let summary = Runner::new(&mut sink, &probe)
        .with_filter("/ 500 keys")
        .run_matrix(matrix);

    assert_eq!(summary.passed, 8);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.pruned, 1);
    assert!(sink.rows.iter().all(|r| r.dataset_size == 500));
}

#[test]
fn duplicate_names_fail_before_running() {
    let implementations: Vec<Arc<dyn ContainerImplementation>> = vec![
        RecordingImplementation::new("Same"),
        RecordingImplementation::new("Same"),
    ];
    let err = TestMatrix::new(tiny_config(), implementations).unwrap_err();
    assert!(err.to_string().contains("Same"));
}
