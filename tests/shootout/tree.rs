//! Matrix tree shape

use crate::common::*;

fn all_paths(matrix: TestMatrix) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    let mut prefix = Vec::new();
    for node in matrix.into_nodes() {
        leaf_paths(node, &mut prefix, &mut out);
    }
    out
}

#[test]
fn default_set_tree_has_every_case() {
    let matrix = TestMatrix::from_config(tiny_config()).unwrap();
    let expected = matrix.case_count();
    assert_eq!(expected, (5 + 5 + 8) * 2 * 3);

    let paths = all_paths(matrix);
    assert_eq!(paths.len(), expected);
    assert!(paths.iter().all(|p| p.len() == 4));
}

#[test]
fn tree_order_is_suite_size_implementation_workload() {
    let paths = all_paths(TestMatrix::from_config(tiny_config()).unwrap());
    assert_eq!(
        paths.first().unwrap(),
        &["Large String Tests", "1000 keys", "HashMap", "inserts"]
    );
    assert_eq!(
        paths.last().unwrap(),
        &[
            "Integer Tests",
            "500 keys",
            "BTreeMap",
            "randomFullIteration"
        ]
    );

    let suites: Vec<&str> = paths.iter().map(|p| p[0].as_str()).collect();
    let mut distinct = suites.clone();
    distinct.dedup();
    assert_eq!(
        distinct,
        vec![
            "Large String Tests",
            "Small String Tests",
            "Integer Tests"
        ]
    );
}

#[test]
fn sizes_count_down() {
    let paths = all_paths(TestMatrix::from_config(integers_only()).unwrap());
    let mut sizes: Vec<&str> = paths.iter().map(|p| p[1].as_str()).collect();
    sizes.dedup();
    assert_eq!(sizes, vec!["1000 keys", "500 keys"]);
}

#[test]
fn integer_workload_labels() {
    let paths = all_paths(TestMatrix::from_config(integers_only()).unwrap());
    let labels: Vec<&str> = paths.iter().take(8).map(|p| p[3].as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "randomShuffleInserts",
            "randomShuffleFullInserts",
            "randomShuffleFullDeletes",
            "randomShuffleReads",
            "randomShuffleFullReads",
            "randomShuffleFullReadMisses",
            "randomShuffleFullReadsAfterDeletingHalf",
            "randomFullIteration",
        ]
    );
}

#[test]
fn selected_implementations_keep_config_order() {
    let mut config = integers_only();
    config.implementations = vec!["DashMap".to_string(), "FxHashMap".to_string()];
    let paths = all_paths(TestMatrix::from_config(config).unwrap());
    let mut names: Vec<&str> = paths.iter().map(|p| p[2].as_str()).collect();
    names.dedup();
    assert_eq!(names, vec!["DashMap", "FxHashMap", "DashMap", "FxHashMap"]);
}
