//! Every implementation in a cell sees the same keys

use std::sync::Arc;

use crate::common::*;

fn recorded_run(
    config: ShootoutConfig,
) -> (Arc<RecordingImplementation>, Arc<RecordingImplementation>) {
    let a = RecordingImplementation::new("A");
    let b = RecordingImplementation::new("B");
    let implementations: Vec<Arc<dyn ContainerImplementation>> = vec![a.clone(), b.clone()];
    let matrix = TestMatrix::new(config, implementations).unwrap();
    let (summary, _sink) = run_to_vec(matrix);
    assert!(summary.is_success(), "{:?}", summary.failures);
    (a, b)
}

#[test]
fn integer_keys_identical_across_implementations() {
    let (a, b) = recorded_run(integers_only());
    let a_logs = a.int_logs();
    assert_eq!(a_logs.len(), 2 * 8);
    assert_eq!(a_logs, b.int_logs());
}

#[test]
fn integer_domains_and_regeneration() {
    let (a, _b) = recorded_run(integers_only());
    let logs = a.int_logs();

    // 1000 keys: Insert draws non-negative keys, FullInsert and Delete share the full set
    assert_eq!(logs[0].len(), 1000);
    assert!(logs[0].iter().all(|k| *k >= 0));
    assert_eq!(logs[1], logs[2]);
    assert!(logs[1].iter().any(|k| *k < 0));

    // 500 keys are regenerated, not sliced
    assert_eq!(logs[8].len(), 500);
    assert_ne!(logs[8][..], logs[0][..500]);
}

#[test]
fn string_keys_identical_across_implementations() {
    let mut config = tiny_config();
    config.suites.integers = false;
    let (a, b) = recorded_run(config);
    let a_logs = a.string_logs();
    assert_eq!(a_logs.len(), 2 * 2 * 5);
    assert_eq!(a_logs, b.string_logs());
}

#[test]
fn large_strings_are_prefix_sliced() {
    let mut config = tiny_config();
    config.suites.integers = false;
    let (a, _b) = recorded_run(config);
    let logs = a.string_logs();

    let large_1000 = &logs[0];
    let large_500 = &logs[5];
    assert_eq!(large_1000.len(), 1000);
    assert_eq!(large_500[..], large_1000[..500]);
    assert!(large_1000.iter().all(|k| k.chars().count() == 8));
}

#[test]
fn small_strings_truncate_large_strings_positionally() {
    let mut config = tiny_config();
    config.suites.integers = false;
    let (a, _b) = recorded_run(config);
    let logs = a.string_logs();

    let large = &logs[0];
    let small = &logs[10];
    assert_eq!(small.len(), large.len());
    for (short, long) in small.iter().zip(large) {
        assert_eq!(short.chars().count(), 3);
        assert!(long.starts_with(short.as_str()));
    }
}
