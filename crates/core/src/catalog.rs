//! Ready-made container capabilities
//!
//! One unit type per container family. Adding a family means adding a
//! type here (or anywhere else) that implements
//! [`ContainerImplementation`]; matrix construction never changes.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use dashmap::DashMap;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::container::{BenchMap, ContainerImplementation, Counter};
use crate::error::{Error, Result};

macro_rules! container_family {
    ($(#[$meta:meta])* $family:ident, $name:literal, $map:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $family;

        impl ContainerImplementation for $family {
            fn name(&self) -> &str {
                $name
            }

            fn create_string_map(&self) -> Box<dyn BenchMap<String>> {
                Box::new($map::<String, Counter>::default())
            }

            fn create_int_map(&self) -> Box<dyn BenchMap<i64>> {
                Box::new($map::<i64, Counter>::default())
            }
        }
    };
}

container_family!(
    /// `std::collections::HashMap` with the default SipHash hasher
    StdHashMap,
    "HashMap",
    HashMap
);

container_family!(
    /// `std::collections::BTreeMap`, the ordered search tree
    StdBTreeMap,
    "BTreeMap",
    BTreeMap
);

container_family!(
    /// `indexmap::IndexMap`, a hash table that remembers insertion order
    InsertionOrderedMap,
    "IndexMap",
    IndexMap
);

container_family!(
    /// `HashMap` with the Fx hasher from `rustc-hash`
    FxMap,
    "FxHashMap",
    FxHashMap
);

container_family!(
    /// `dashmap::DashMap`, a sharded concurrent hash map
    ShardedMap,
    "DashMap",
    DashMap
);

/// Every family shipped with the harness
pub fn builtin() -> Vec<Arc<dyn ContainerImplementation>> {
    vec![
        Arc::new(StdHashMap),
        Arc::new(InsertionOrderedMap),
        Arc::new(StdBTreeMap),
        Arc::new(FxMap),
        Arc::new(ShardedMap),
    ]
}

/// The families benchmarked when no selection is configured: an unordered
/// hash table, an insertion-ordered hash table and an ordered tree.
pub fn default_set() -> Vec<Arc<dyn ContainerImplementation>> {
    vec![
        Arc::new(StdHashMap),
        Arc::new(InsertionOrderedMap),
        Arc::new(StdBTreeMap),
    ]
}

/// Look up a built-in family by its name
pub fn by_name(name: &str) -> Result<Arc<dyn ContainerImplementation>> {
    builtin()
        .into_iter()
        .find(|implementation| implementation.name() == name)
        .ok_or_else(|| Error::UnknownImplementation(name.to_string()))
}

/// Resolve a list of names, or the default set when `names` is empty.
pub fn select(names: &[String]) -> Result<Vec<Arc<dyn ContainerImplementation>>> {
    if names.is_empty() {
        return Ok(default_set());
    }
    names.iter().map(|name| by_name(name)).collect()
}
