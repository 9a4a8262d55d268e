//! Workload catalog
//!
//! A workload is a tag plus two plain functions: a setup step that prepares
//! a fresh container (and possibly an auxiliary key ordering), and the single
//! operation that gets timed. Selecting the pair is a `match` on the tag, so
//! the case lifecycle is identical for every workload kind.
//!
//! | Workload              | Setup                                        | Measured                      |
//! |-----------------------|----------------------------------------------|-------------------------------|
//! | Insert / FullInsert   | owned copy of the keys                       | move every key into the map   |
//! | Delete                | populate, shuffled copy                      | remove in shuffled order      |
//! | Read / FullRead       | populate, shuffled copy                      | look up in shuffled order     |
//! | ReadMiss              | populate                                     | look up every different key   |
//! | ReadAfterHalfDelete   | populate, shuffle, remove first half, shuffle | look up every surviving key   |
//! | FullIteration         | populate                                     | visit every entry once        |

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use shootout_core::{BenchMap, KeySet, MapKey, POPULATE_VALUE};

/// The closed set of benchmark kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workload {
    /// Insert every key into an empty container
    Insert,
    /// Insert, over the full-range integer domain
    FullInsert,
    /// Remove every key, in shuffled order, from a populated container
    Delete,
    /// Look up every key, in shuffled order, in a populated container
    Read,
    /// Read, over the full-range integer domain
    FullRead,
    /// Look up keys that were never inserted
    ReadMiss,
    /// Look up the survivors after half of the keys were removed
    ReadAfterHalfDelete,
    /// Traverse every entry of a populated container
    FullIteration,
}

impl Workload {
    /// Every workload, in catalog order
    pub const ALL: [Workload; 8] = [
        Workload::Insert,
        Workload::FullInsert,
        Workload::Delete,
        Workload::Read,
        Workload::FullRead,
        Workload::ReadMiss,
        Workload::ReadAfterHalfDelete,
        Workload::FullIteration,
    ];

    /// The setup and measured functions for this workload.
    pub fn procedure<K: MapKey>(self) -> Procedure<K> {
        match self {
            Workload::Insert | Workload::FullInsert => Procedure {
                setup: stage_owned_keys,
                measure: insert_keys,
            },
            Workload::Delete => Procedure {
                setup: populate_and_shuffle,
                measure: remove_in_order,
            },
            Workload::Read | Workload::FullRead => Procedure {
                setup: populate_and_shuffle,
                measure: get_in_order,
            },
            Workload::ReadMiss => Procedure {
                setup: populate,
                measure: get_probes,
            },
            Workload::ReadAfterHalfDelete => Procedure {
                setup: populate_and_delete_half,
                measure: get_in_order,
            },
            Workload::FullIteration => Procedure {
                setup: populate,
                measure: visit_entries,
            },
        }
    }

    /// True if the workload needs an independent key set of equal size.
    pub fn requires_different_keys(self) -> bool {
        matches!(self, Workload::ReadMiss)
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Everything a workload touches during one case.
pub struct Fixture<K: MapKey> {
    /// The container under test
    pub map: Box<dyn BenchMap<K>>,
    /// Population keys
    pub keys: KeySet<K>,
    /// Keys looked up by the miss path; the population keys otherwise
    pub probes: KeySet<K>,
    /// Auxiliary ordering prepared by setup. Insert workloads stage owned
    /// copies of the keys here and drain them during measurement.
    pub order: Vec<K>,
    /// Keys removed during setup
    pub removed_in_setup: usize,
}

impl<K: MapKey> Fixture<K> {
    /// A fixture around a freshly constructed, empty container.
    pub fn new(map: Box<dyn BenchMap<K>>, keys: KeySet<K>, probes: KeySet<K>) -> Self {
        Self {
            map,
            keys,
            probes,
            order: Vec::new(),
            removed_in_setup: 0,
        }
    }

    /// Release the container contents and the auxiliary ordering.
    pub fn teardown(&mut self) {
        self.order.clear();
        self.order.shrink_to_fit();
        self.map.clear();
    }
}

/// What the measured operation did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Measurement {
    /// Keys offered to the container, or entries visited
    pub operations: usize,
    /// Successful lookups or removals
    pub hits: usize,
}

/// Setup function: prepares a fixture, may shuffle with the case's RNG
pub type SetupFn<K> = fn(&mut Fixture<K>, &mut StdRng);

/// Measured function: the only code between the two timestamps
pub type MeasureFn<K> = fn(&mut Fixture<K>) -> Measurement;

/// The (setup, measured operation) pair of a workload
pub struct Procedure<K: MapKey> {
    /// Untimed preparation
    pub setup: SetupFn<K>,
    /// Timed operation
    pub measure: MeasureFn<K>,
}

impl<K: MapKey> Clone for Procedure<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: MapKey> Copy for Procedure<K> {}

// ============================================================================
// Setup steps
// ============================================================================

fn stage_owned_keys<K: MapKey>(fixture: &mut Fixture<K>, _rng: &mut StdRng) {
    fixture.order = fixture.keys.to_vec();
}

fn populate<K: MapKey>(fixture: &mut Fixture<K>, _rng: &mut StdRng) {
    fixture
        .map
        .insert_all(fixture.keys.as_slice(), POPULATE_VALUE);
}

fn populate_and_shuffle<K: MapKey>(fixture: &mut Fixture<K>, rng: &mut StdRng) {
    let mut order = fixture.keys.to_vec();
    order.shuffle(rng);
    fixture.order = order;
    populate(fixture, rng);
}

fn populate_and_delete_half<K: MapKey>(fixture: &mut Fixture<K>, rng: &mut StdRng) {
    populate(fixture, rng);
    let mut order = fixture.keys.to_vec();
    order.shuffle(rng);
    let half = order.len() / 2;
    fixture.map.remove_all(&order[..half]);
    order.drain(..half);
    order.shuffle(rng);
    fixture.order = order;
    fixture.removed_in_setup = half;
}

// ============================================================================
// Measured operations
// ============================================================================

fn insert_keys<K: MapKey>(fixture: &mut Fixture<K>) -> Measurement {
    let operations = fixture
        .map
        .insert_owned(&mut fixture.order, POPULATE_VALUE);
    Measurement {
        operations,
        hits: operations,
    }
}

fn remove_in_order<K: MapKey>(fixture: &mut Fixture<K>) -> Measurement {
    let hits = fixture.map.remove_all(&fixture.order);
    Measurement {
        operations: fixture.order.len(),
        hits,
    }
}

fn get_in_order<K: MapKey>(fixture: &mut Fixture<K>) -> Measurement {
    let hits = fixture.map.get_all(&fixture.order);
    Measurement {
        operations: fixture.order.len(),
        hits,
    }
}

fn get_probes<K: MapKey>(fixture: &mut Fixture<K>) -> Measurement {
    let hits = fixture.map.get_all(fixture.probes.as_slice());
    Measurement {
        operations: fixture.probes.len(),
        hits,
    }
}

fn visit_entries<K: MapKey>(fixture: &mut Fixture<K>) -> Measurement {
    let visited = fixture.map.visit_all();
    Measurement {
        operations: visited,
        hits: visited,
    }
}
