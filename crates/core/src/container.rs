//! The container capability contract
//!
//! The harness never names a concrete map type. It sees containers only
//! through two traits:
//!
//! - [`BenchMap`]: the operations a workload performs on a key → counter map
//! - [`ContainerImplementation`]: a named factory producing empty maps for
//!   the string and the int64 key domains
//!
//! The bulk operations on `BenchMap` are provided methods. Each implementing
//! type gets its own monomorphized copy, so a measured operation costs one
//! dynamic call regardless of how many keys it touches.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::hint::black_box;

use dashmap::DashMap;
use indexmap::IndexMap;

/// Value stored under every key
pub type Counter = u64;

/// Value written by populating and inserting workloads
pub const POPULATE_VALUE: Counter = 1;

/// Key → counter map as seen by the workloads.
pub trait BenchMap<K: Clone>: Send {
    /// Insert or overwrite `key`, returning the previous value
    fn insert(&mut self, key: K, value: Counter) -> Option<Counter>;

    /// Look up `key`
    fn get(&self, key: &K) -> Option<Counter>;

    /// Remove `key`, returning its value if it was present
    fn remove(&mut self, key: &K) -> Option<Counter>;

    /// Number of entries
    fn len(&self) -> usize;

    /// Drop every entry
    fn clear(&mut self);

    /// Traverse every entry once without doing work per entry.
    ///
    /// Returns the number of entries visited.
    fn visit_all(&self) -> usize;

    /// True when the map holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert every key in order with `value`. Returns the number of keys offered.
    fn insert_all(&mut self, keys: &[K], value: Counter) -> usize {
        for key in keys {
            black_box(self.insert(key.clone(), value));
        }
        keys.len()
    }

    /// Move every key out of `keys` into the map with `value`, leaving `keys`
    /// empty with its capacity intact. Returns the number of keys moved.
    fn insert_owned(&mut self, keys: &mut Vec<K>, value: Counter) -> usize {
        let offered = keys.len();
        for key in keys.drain(..) {
            black_box(self.insert(key, value));
        }
        offered
    }

    /// Remove every key in order. Returns how many were present.
    fn remove_all(&mut self, keys: &[K]) -> usize {
        let mut removed = 0;
        for key in keys {
            if black_box(self.remove(key)).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Look up every key in order. Returns how many were found.
    fn get_all(&self, keys: &[K]) -> usize {
        let mut found = 0;
        for key in keys {
            if black_box(self.get(key)).is_some() {
                found += 1;
            }
        }
        found
    }
}

/// A named family of containers the shootout can benchmark.
///
/// Implementations must be cheap to share: the matrix hands the same
/// capability to every case of a run.
pub trait ContainerImplementation: Send + Sync {
    /// Human-readable name, unique within a run
    fn name(&self) -> &str;

    /// An empty container keyed by strings
    fn create_string_map(&self) -> Box<dyn BenchMap<String>>;

    /// An empty container keyed by 64-bit integers
    fn create_int_map(&self) -> Box<dyn BenchMap<i64>>;
}

// ============================================================================
// Adapters for well-known maps
// ============================================================================

impl<K, S> BenchMap<K> for HashMap<K, Counter, S>
where
    K: Eq + Hash + Clone + Send,
    S: BuildHasher + Send,
{
    fn insert(&mut self, key: K, value: Counter) -> Option<Counter> {
        HashMap::insert(self, key, value)
    }

    fn get(&self, key: &K) -> Option<Counter> {
        HashMap::get(self, key).copied()
    }

    fn remove(&mut self, key: &K) -> Option<Counter> {
        HashMap::remove(self, key)
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn clear(&mut self) {
        HashMap::clear(self)
    }

    fn visit_all(&self) -> usize {
        let mut visited = 0;
        for entry in self.iter() {
            black_box(entry);
            visited += 1;
        }
        visited
    }
}

impl<K> BenchMap<K> for BTreeMap<K, Counter>
where
    K: Ord + Clone + Send,
{
    fn insert(&mut self, key: K, value: Counter) -> Option<Counter> {
        BTreeMap::insert(self, key, value)
    }

    fn get(&self, key: &K) -> Option<Counter> {
        BTreeMap::get(self, key).copied()
    }

    fn remove(&mut self, key: &K) -> Option<Counter> {
        BTreeMap::remove(self, key)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn clear(&mut self) {
        BTreeMap::clear(self)
    }

    fn visit_all(&self) -> usize {
        let mut visited = 0;
        for entry in self.iter() {
            black_box(entry);
            visited += 1;
        }
        visited
    }
}

// Removal uses `swap_remove`: `shift_remove` is O(n) per key and would turn
// bulk deletion quadratic.
impl<K, S> BenchMap<K> for IndexMap<K, Counter, S>
where
    K: Eq + Hash + Clone + Send,
    S: BuildHasher + Send,
{
    fn insert(&mut self, key: K, value: Counter) -> Option<Counter> {
        IndexMap::insert(self, key, value)
    }

    fn get(&self, key: &K) -> Option<Counter> {
        IndexMap::get(self, key).copied()
    }

    fn remove(&mut self, key: &K) -> Option<Counter> {
        IndexMap::swap_remove(self, key)
    }

    fn len(&self) -> usize {
        IndexMap::len(self)
    }

    fn clear(&mut self) {
        IndexMap::clear(self)
    }

    fn visit_all(&self) -> usize {
        let mut visited = 0;
        for entry in self.iter() {
            black_box(entry);
            visited += 1;
        }
        visited
    }
}

impl<K, S> BenchMap<K> for DashMap<K, Counter, S>
where
    K: Eq + Hash + Clone + Send + Sync,
    S: BuildHasher + Clone + Send + Sync,
{
    fn insert(&mut self, key: K, value: Counter) -> Option<Counter> {
        DashMap::insert(self, key, value)
    }

    fn get(&self, key: &K) -> Option<Counter> {
        DashMap::get(self, key).map(|entry| *entry.value())
    }

    fn remove(&mut self, key: &K) -> Option<Counter> {
        DashMap::remove(self, key).map(|(_, value)| value)
    }

    fn len(&self) -> usize {
        DashMap::len(self)
    }

    fn clear(&mut self) {
        DashMap::clear(self)
    }

    fn visit_all(&self) -> usize {
        let mut visited = 0;
        for entry in self.iter() {
            black_box(entry.pair());
            visited += 1;
        }
        visited
    }
}
