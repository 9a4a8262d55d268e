//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub use mapshootout::{
    BenchMap, ContainerImplementation, Counter, MatrixNode, NoopProbe, RunSummary, Runner,
    ShootoutConfig, TestMatrix, VecSink,
};

// ============================================================================
// Configuration
// ============================================================================

/// Two sizes (1000, 500), short strings, fixed seed.
pub fn tiny_config() -> ShootoutConfig {
    ShootoutConfig {
        max_dataset_size: 1000,
        size_step: 500,
        large_string_length: 8,
        small_string_length: 3,
        seed: Some(0x5EED),
        ..ShootoutConfig::default()
    }
}

/// `tiny_config` with only the integer suite enabled.
pub fn integers_only() -> ShootoutConfig {
    let mut config = tiny_config();
    config.suites.large_strings = false;
    config.suites.small_strings = false;
    config
}

/// Run `matrix` into an in-memory sink.
pub fn run_to_vec(matrix: TestMatrix) -> (RunSummary, VecSink) {
    let mut sink = VecSink::new();
    let probe = NoopProbe;
    let summary = Runner::new(&mut sink, &probe).run_matrix(matrix);
    (summary, sink)
}

/// Flatten a node into (path, leaf) pairs, building every lazy group.
pub fn leaf_paths(node: MatrixNode, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
    match node {
        MatrixNode::Group { name, children } => {
            prefix.push(name);
            for child in children {
                leaf_paths(child, prefix, out);
            }
            prefix.pop();
        }
        leaf => {
            let mut path = prefix.clone();
            path.push(leaf.name().to_string());
            out.push(path);
        }
    }
}

// ============================================================================
// RecordingImplementation - remembers every key it was asked to insert
// ============================================================================

/// Insert log of one map instance
pub type InsertLog<K> = Arc<Mutex<Vec<K>>>;

/// HashMap wrapper that appends every inserted key to a shared log.
pub struct RecordingMap<K> {
    inner: HashMap<K, Counter>,
    inserted: InsertLog<K>,
}

impl<K> BenchMap<K> for RecordingMap<K>
where
    K: Clone + Eq + std::hash::Hash + Send,
{
    fn insert(&mut self, key: K, value: Counter) -> Option<Counter> {
        self.inserted.lock().unwrap().push(key.clone());
        self.inner.insert(key, value)
    }

    fn get(&self, key: &K) -> Option<Counter> {
        self.inner.get(key).copied()
    }

    fn remove(&mut self, key: &K) -> Option<Counter> {
        self.inner.remove(key)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn visit_all(&self) -> usize {
        self.inner.iter().count()
    }
}

/// Capability whose maps record their inserts, one log per map created.
pub struct RecordingImplementation {
    name: String,
    pub string_maps: Mutex<Vec<InsertLog<String>>>,
    pub int_maps: Mutex<Vec<InsertLog<i64>>>,
}

impl RecordingImplementation {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            string_maps: Mutex::new(Vec::new()),
            int_maps: Mutex::new(Vec::new()),
        })
    }

    /// Snapshot of every string map's insert sequence, in creation order
    pub fn string_logs(&self) -> Vec<Vec<String>> {
        snapshot(&self.string_maps)
    }

    /// Snapshot of every integer map's insert sequence, in creation order
    pub fn int_logs(&self) -> Vec<Vec<i64>> {
        snapshot(&self.int_maps)
    }
}

fn snapshot<K: Clone>(logs: &Mutex<Vec<InsertLog<K>>>) -> Vec<Vec<K>> {
    logs.lock()
        .unwrap()
        .iter()
        .map(|log| log.lock().unwrap().clone())
        .collect()
}

impl ContainerImplementation for RecordingImplementation {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_string_map(&self) -> Box<dyn BenchMap<String>> {
        let log: InsertLog<String> = Arc::default();
        self.string_maps.lock().unwrap().push(Arc::clone(&log));
        Box::new(RecordingMap {
            inner: HashMap::new(),
            inserted: log,
        })
    }

    fn create_int_map(&self) -> Box<dyn BenchMap<i64>> {
        let log: InsertLog<i64> = Arc::default();
        self.int_maps.lock().unwrap().push(Arc::clone(&log));
        Box::new(RecordingMap {
            inner: HashMap::new(),
            inserted: log,
        })
    }
}

// ============================================================================
// ExplodingImplementation - panics whenever a container is requested
// ============================================================================

/// Capability that cannot construct a container.
pub struct ExplodingImplementation;

impl ContainerImplementation for ExplodingImplementation {
    fn name(&self) -> &str {
        "Exploding"
    }

    fn create_string_map(&self) -> Box<dyn BenchMap<String>> {
        panic!("Exploding cannot build string maps")
    }

    fn create_int_map(&self) -> Box<dyn BenchMap<i64>> {
        panic!("Exploding cannot build integer maps")
    }
}
