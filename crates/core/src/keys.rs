//! Key domains and immutable key sets
//!
//! A [`KeySet`] is the unit of fairness in the shootout: within one matrix
//! cell every implementation is populated from, and read back with, the
//! very same key sequence. Key sets are reference counted and immutable;
//! smaller dataset sizes are prefix views over the storage of the largest
//! one, so slicing never copies or regenerates keys.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::container::{BenchMap, ContainerImplementation};

/// A key type the harness knows how to benchmark.
///
/// The associated constructor routes a capability to the matching
/// `create_*_map` method, which keeps matrix construction generic over
/// the key domain.
pub trait MapKey: Clone + Eq + Hash + Ord + fmt::Debug + Send + Sync + 'static {
    /// Ask `implementation` for an empty container keyed by `Self`.
    fn create_map(implementation: &dyn ContainerImplementation) -> Box<dyn BenchMap<Self>>;
}

impl MapKey for String {
    fn create_map(implementation: &dyn ContainerImplementation) -> Box<dyn BenchMap<Self>> {
        implementation.create_string_map()
    }
}

impl MapKey for i64 {
    fn create_map(implementation: &dyn ContainerImplementation) -> Box<dyn BenchMap<Self>> {
        implementation.create_int_map()
    }
}

/// An immutable, ordered sequence of keys for one (key type, size) pair.
pub struct KeySet<K> {
    keys: Arc<[K]>,
    len: usize,
}

impl<K> Clone for KeySet<K> {
    fn clone(&self) -> Self {
        Self {
            keys: Arc::clone(&self.keys),
            len: self.len,
        }
    }
}

impl<K> fmt::Debug for KeySet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySet")
            .field("len", &self.len)
            .field("backing_len", &self.keys.len())
            .finish()
    }
}

impl<K> From<Vec<K>> for KeySet<K> {
    fn from(keys: Vec<K>) -> Self {
        Self::new(keys)
    }
}

impl<K> KeySet<K> {
    /// Take ownership of `keys` as a new key set.
    pub fn new(keys: Vec<K>) -> Self {
        let len = keys.len();
        Self {
            keys: keys.into(),
            len,
        }
    }

    /// Number of keys visible through this set
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the set holds no keys
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The keys, in generation order
    pub fn as_slice(&self) -> &[K] {
        &self.keys[..self.len]
    }

    /// Iterate over the keys in generation order
    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.as_slice().iter()
    }

    /// A view over at most the first `len` keys, sharing storage with `self`.
    pub fn head(&self, len: usize) -> Self {
        Self {
            keys: Arc::clone(&self.keys),
            len: len.min(self.len),
        }
    }

    /// True when both sets are views over the same generated keys.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.keys, &other.keys)
    }
}

impl<K: Clone> KeySet<K> {
    /// An owned, mutable copy of the keys (for shuffling)
    pub fn to_vec(&self) -> Vec<K> {
        self.as_slice().to_vec()
    }
}

impl KeySet<String> {
    /// Truncate every key to its first `code_points` code points.
    ///
    /// Position `i` of the result is derived from position `i` of `self`.
    pub fn truncated(&self, code_points: usize) -> KeySet<String> {
        self.iter()
            .map(|key| truncate_code_points(key, code_points).to_owned())
            .collect::<Vec<_>>()
            .into()
    }
}

/// The prefix of `s` holding at most `code_points` code points.
pub fn truncate_code_points(s: &str, code_points: usize) -> &str {
    match s.char_indices().nth(code_points) {
        Some((byte_index, _)) => &s[..byte_index],
        None => s,
    }
}
