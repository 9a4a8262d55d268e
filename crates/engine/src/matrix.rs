//! Test matrix construction
//!
//! The matrix is a lazily produced tree:
//!
//! ```text
//! Large String Tests
//! └── 3000000 keys
//!     └── HashMap
//!         ├── inserts
//!         ├── deletes
//!         └── ...
//! ```
//!
//! Key sets are generated as the tree is walked, not up front. The large
//! string keys are generated once, at the largest size, and every smaller
//! size is a prefix view over them. Small string keys are the large keys
//! truncated position by position. Each string suite drops the shared handle
//! on its keys after producing its last size group, so they are not resident
//! during later suites. Integer keys are regenerated for each size. Within
//! one (key type, size) cell every implementation sees the same key set and
//! the same different-key set.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use shootout_core::{
    catalog, ContainerImplementation, Error, KeyGenerator, KeySet, MapKey, Result,
};
use tracing::{debug, info};

use crate::config::ShootoutConfig;
use crate::lifecycle::{BenchmarkCase, CaseLabels, RunnableCase};
use crate::workload::Workload;

// ============================================================================
// Labels
// ============================================================================

/// Key label for the large string suite
pub const LARGE_STRING_LABEL: &str = "largeString";
/// Key label for the small string suite
pub const SMALL_STRING_LABEL: &str = "smallString";
/// Key label for the integer suite
pub const INTEGER_LABEL: &str = "int64";

/// Root group of the large string suite
pub const LARGE_STRING_GROUP: &str = "Large String Tests";
/// Root group of the small string suite
pub const SMALL_STRING_GROUP: &str = "Small String Tests";
/// Root group of the integer suite
pub const INTEGER_GROUP: &str = "Integer Tests";

/// Integer key domain a workload draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerDomain {
    /// `[0, i64::MAX)`
    NonNegative,
    /// `[i64::MIN, i64::MAX)`
    Full,
}

impl IntegerDomain {
    /// Inclusive lower bound of the domain
    pub fn min_value(self) -> i64 {
        match self {
            IntegerDomain::NonNegative => 0,
            IntegerDomain::Full => i64::MIN,
        }
    }
}

/// Workloads of both string suites, in run order
pub const STRING_WORKLOADS: [(Workload, &str); 5] = [
    (Workload::Insert, "inserts"),
    (Workload::Delete, "deletes"),
    (Workload::Read, "reads"),
    (Workload::ReadMiss, "readMisses"),
    (Workload::ReadAfterHalfDelete, "readsAfterDeletingHalf"),
];

/// Workloads of the integer suite, in run order
pub const INTEGER_WORKLOADS: [(Workload, IntegerDomain, &str); 8] = [
    (
        Workload::Insert,
        IntegerDomain::NonNegative,
        "randomShuffleInserts",
    ),
    (
        Workload::FullInsert,
        IntegerDomain::Full,
        "randomShuffleFullInserts",
    ),
    (
        Workload::Delete,
        IntegerDomain::Full,
        "randomShuffleFullDeletes",
    ),
    (
        Workload::Read,
        IntegerDomain::NonNegative,
        "randomShuffleReads",
    ),
    (
        Workload::FullRead,
        IntegerDomain::Full,
        "randomShuffleFullReads",
    ),
    (
        Workload::ReadMiss,
        IntegerDomain::Full,
        "randomShuffleFullReadMisses",
    ),
    (
        Workload::ReadAfterHalfDelete,
        IntegerDomain::Full,
        "randomShuffleFullReadsAfterDeletingHalf",
    ),
    (
        Workload::FullIteration,
        IntegerDomain::Full,
        "randomFullIteration",
    ),
];

/// Name of a dataset-size group
pub fn size_group_name(size: usize) -> String {
    format!("{} keys", size)
}

// ============================================================================
// Tree
// ============================================================================

/// Lazily produced children of a group
pub type Children = Box<dyn Iterator<Item = MatrixNode>>;

/// A node of the matrix tree
pub enum MatrixNode {
    /// A named container of nodes
    Group {
        /// Display name
        name: String,
        /// Child nodes, produced on demand
        children: Children,
    },
    /// A runnable case
    Case(Box<dyn RunnableCase>),
    /// A case that could not be constructed
    Rejected {
        /// Display name of the case
        name: String,
        /// Why construction failed
        error: Error,
    },
}

impl MatrixNode {
    /// Display name of the node
    pub fn name(&self) -> &str {
        match self {
            MatrixNode::Group { name, .. } => name,
            MatrixNode::Case(case) => case.name(),
            MatrixNode::Rejected { name, .. } => name,
        }
    }

    fn group(
        name: impl Into<String>,
        children: impl Iterator<Item = MatrixNode> + 'static,
    ) -> Self {
        MatrixNode::Group {
            name: name.into(),
            children: Box::new(children),
        }
    }
}

impl fmt::Debug for MatrixNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixNode::Group { name, .. } => f.debug_struct("Group").field("name", name).finish(),
            MatrixNode::Case(case) => f.debug_tuple("Case").field(&case.name()).finish(),
            MatrixNode::Rejected { name, error } => f
                .debug_struct("Rejected")
                .field("name", name)
                .field("error", error)
                .finish(),
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Shared state behind the lazy tree
struct MatrixState {
    config: ShootoutConfig,
    implementations: Vec<Arc<dyn ContainerImplementation>>,
    generator: RefCell<KeyGenerator>,
    large_keys: RefCell<Option<KeySet<String>>>,
    small_keys: RefCell<Option<KeySet<String>>>,
}

impl MatrixState {
    /// Large string keys at the largest size, generated on first use
    fn large_keys(&self) -> KeySet<String> {
        if let Some(keys) = self.large_keys.borrow().clone() {
            return keys;
        }
        info!(
            count = self.config.max_dataset_size,
            length = self.config.large_string_length,
            "generating large string keys"
        );
        let keys = self.generator.borrow_mut().generate_string_keys(
            self.config.large_string_length,
            self.config.max_dataset_size,
        );
        *self.large_keys.borrow_mut() = Some(keys.clone());
        keys
    }

    /// Large string keys truncated position by position, derived on first use
    fn small_keys(&self) -> KeySet<String> {
        if let Some(keys) = self.small_keys.borrow().clone() {
            return keys;
        }
        info!(
            length = self.config.small_string_length,
            "truncating large string keys"
        );
        let keys = self.large_keys().truncated(self.config.small_string_length);
        *self.small_keys.borrow_mut() = Some(keys.clone());
        if !self.config.suites.large_strings {
            self.large_keys.borrow_mut().take();
        }
        keys
    }

    /// Called once the large suite has produced its last size group.
    /// The small keys are derived first when that suite still needs them.
    fn release_large_keys(&self) {
        if self.config.suites.small_strings {
            self.small_keys();
        }
        if self.large_keys.borrow_mut().take().is_some() {
            debug!(key_label = LARGE_STRING_LABEL, "released string keys");
        }
    }

    /// Called once the small suite has produced its last size group.
    fn release_small_keys(&self) {
        if self.small_keys.borrow_mut().take().is_some() {
            debug!(key_label = SMALL_STRING_LABEL, "released string keys");
        }
    }
}

/// The full benchmark matrix for one run.
pub struct TestMatrix {
    state: Rc<MatrixState>,
}

impl fmt::Debug for TestMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .state
            .implementations
            .iter()
            .map(|implementation| implementation.name())
            .collect();
        f.debug_struct("TestMatrix")
            .field("config", &self.state.config)
            .field("implementations", &names)
            .finish()
    }
}

impl TestMatrix {
    /// Build a matrix over explicit implementations.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` for an invalid config or an empty implementation list
    /// - `DuplicateImplementation` if two implementations share a name
    pub fn new(
        config: ShootoutConfig,
        implementations: Vec<Arc<dyn ContainerImplementation>>,
    ) -> Result<Self> {
        config.validate()?;
        if implementations.is_empty() {
            return Err(Error::invalid_config(
                "at least one container implementation is required",
            ));
        }
        for (index, implementation) in implementations.iter().enumerate() {
            let name = implementation.name();
            if implementations[..index]
                .iter()
                .any(|earlier| earlier.name() == name)
            {
                return Err(Error::DuplicateImplementation(name.to_string()));
            }
        }

        let generator = KeyGenerator::new(config.seed);
        Ok(Self {
            state: Rc::new(MatrixState {
                config,
                implementations,
                generator: RefCell::new(generator),
                large_keys: RefCell::new(None),
                small_keys: RefCell::new(None),
            }),
        })
    }

    /// Build a matrix over the implementations named in `config`.
    pub fn from_config(config: ShootoutConfig) -> Result<Self> {
        let implementations = catalog::select(&config.implementations)?;
        Self::new(config, implementations)
    }

    /// Number of cases the matrix will produce
    pub fn case_count(&self) -> usize {
        let suites = &self.state.config.suites;
        let per_size = [
            (suites.large_strings, STRING_WORKLOADS.len()),
            (suites.small_strings, STRING_WORKLOADS.len()),
            (suites.integers, INTEGER_WORKLOADS.len()),
        ]
        .iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, workloads)| workloads)
        .sum::<usize>();
        per_size * self.state.config.dataset_sizes().len() * self.state.implementations.len()
    }

    /// The suite groups, in run order. Keys are generated as groups are iterated.
    pub fn into_nodes(self) -> Children {
        let state = self.state;
        let suites = state.config.suites;
        let mut roots: Vec<MatrixNode> = Vec::new();

        if suites.large_strings {
            roots.push(string_suite(
                &state,
                LARGE_STRING_GROUP,
                LARGE_STRING_LABEL,
                MatrixState::large_keys,
                MatrixState::release_large_keys,
                state.config.large_string_length,
            ));
        }
        if suites.small_strings {
            roots.push(string_suite(
                &state,
                SMALL_STRING_GROUP,
                SMALL_STRING_LABEL,
                MatrixState::small_keys,
                MatrixState::release_small_keys,
                state.config.small_string_length,
            ));
        }
        if suites.integers {
            roots.push(integer_suite(&state));
        }

        Box::new(roots.into_iter())
    }
}

fn string_suite(
    state: &Rc<MatrixState>,
    group: &'static str,
    key_label: &'static str,
    source: fn(&MatrixState) -> KeySet<String>,
    release: fn(&MatrixState),
    length: usize,
) -> MatrixNode {
    let sizes = state.config.dataset_sizes();
    let finished = Rc::clone(state);
    let state = Rc::clone(state);
    let sizes = sizes.into_iter().map(move |size| {
        let state = Rc::clone(&state);
        let keys = source(&state).head(size);
        let cell = std::iter::once_with(move || {
            let different = state
                .generator
                .borrow_mut()
                .generate_string_keys(length, size);
            debug!(key_label, size, "built string cell");
            let plan: Vec<_> = STRING_WORKLOADS
                .iter()
                .map(|&(workload, label)| (workload, label, keys.clone()))
                .collect();
            implementation_groups(&state, key_label, &plan, &different)
        })
        .flatten();
        MatrixNode::group(size_group_name(size), cell)
    });
    let release_keys = std::iter::once_with(move || {
        release(&finished);
        None::<MatrixNode>
    })
    .flatten();
    MatrixNode::group(group, sizes.chain(release_keys))
}

fn integer_suite(state: &Rc<MatrixState>) -> MatrixNode {
    let sizes = state.config.dataset_sizes();
    let state = Rc::clone(state);
    let children = sizes.into_iter().map(move |size| {
        let state = Rc::clone(&state);
        let cell = std::iter::once_with(move || integer_cell(&state, size)).flatten();
        MatrixNode::group(size_group_name(size), cell)
    });
    MatrixNode::group(INTEGER_GROUP, children)
}

fn integer_cell(state: &MatrixState, size: usize) -> Vec<MatrixNode> {
    let generated = {
        let mut generator = state.generator.borrow_mut();
        generate_integer_cell(&mut generator, size)
    };
    let (non_negative, full, different) = match generated {
        Ok(sets) => sets,
        Err(error) => {
            return vec![MatrixNode::Rejected {
                name: size_group_name(size),
                error,
            }]
        }
    };
    debug!(key_label = INTEGER_LABEL, size, "built integer cell");

    let plan: Vec<_> = INTEGER_WORKLOADS
        .iter()
        .map(|&(workload, domain, label)| {
            let keys = match domain {
                IntegerDomain::NonNegative => non_negative.clone(),
                IntegerDomain::Full => full.clone(),
            };
            (workload, label, keys)
        })
        .collect();
    implementation_groups(state, INTEGER_LABEL, &plan, &different)
}

/// Non-negative, full-range and different key sets for one size
fn generate_integer_cell(
    generator: &mut KeyGenerator,
    size: usize,
) -> Result<(KeySet<i64>, KeySet<i64>, KeySet<i64>)> {
    let non_negative =
        generator.generate_integer_keys(IntegerDomain::NonNegative.min_value(), size)?;
    let full = generator.generate_integer_keys(IntegerDomain::Full.min_value(), size)?;
    let different = generator.generate_integer_keys(IntegerDomain::Full.min_value(), size)?;
    Ok((non_negative, full, different))
}

/// One group per implementation, each holding one case per planned workload.
fn implementation_groups<K: MapKey>(
    state: &MatrixState,
    key_label: &'static str,
    plan: &[(Workload, &'static str, KeySet<K>)],
    different: &KeySet<K>,
) -> Vec<MatrixNode> {
    state
        .implementations
        .iter()
        .map(|implementation| {
            let cases: Vec<MatrixNode> = plan
                .iter()
                .map(|(workload, workload_label, keys)| {
                    let different_keys = workload
                        .requires_different_keys()
                        .then(|| different.clone());
                    let rng = state.generator.borrow_mut().shuffle_rng();
                    match BenchmarkCase::new(
                        Arc::clone(implementation),
                        *workload,
                        CaseLabels::new(key_label, *workload_label),
                        keys.clone(),
                        different_keys,
                        rng,
                    ) {
                        Ok(case) => MatrixNode::Case(Box::new(case)),
                        Err(error) => MatrixNode::Rejected {
                            name: workload_label.to_string(),
                            error,
                        },
                    }
                })
                .collect();
            MatrixNode::group(implementation.name(), cases.into_iter())
        })
        .collect()
}
