//! Per-case benchmark lifecycle
//!
//! A case moves strictly through `Init → Measure → Teardown → Emitted`:
//!
//! 1. **Init**: build an empty container through the capability and run the
//!    workload setup. None of this is timed.
//! 2. **Measure**: reclamation hint, read heap usage and a monotonic
//!    timestamp, run the measured operation, read both again.
//! 3. **Teardown**: clear and drop the container and auxiliary orderings so
//!    the next case starts from a quiet heap.
//! 4. **Emitted**: hand one [`BenchmarkResult`] to the sink.
//!
//! Contract checks (a miss workload without different keys, or with a
//! different-key set of the wrong size) run in [`BenchmarkCase::new`], so an
//! invalid case cannot be built, let alone measured.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use shootout_core::{ContainerImplementation, Error, KeySet, MapKey, Result};
use tracing::{debug, trace};

use crate::memory::{memory_delta, MemoryProbe};
use crate::sink::{BenchmarkResult, ResultSink};
use crate::workload::{Fixture, Measurement, Workload};

/// Lifecycle phases of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePhase {
    /// Container construction and workload setup
    Init,
    /// The timed window
    Measure,
    /// Releasing the fixture
    Teardown,
    /// Result handed to the sink (terminal)
    Emitted,
}

impl fmt::Display for CasePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CasePhase::Init => "init",
            CasePhase::Measure => "measure",
            CasePhase::Teardown => "teardown",
            CasePhase::Emitted => "emitted",
        };
        f.write_str(name)
    }
}

/// Descriptive labels written into the result row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseLabels {
    /// Key type label
    pub key_label: String,
    /// Workload label
    pub workload_label: String,
}

impl CaseLabels {
    /// Labels from anything string-like
    pub fn new(key_label: impl Into<String>, workload_label: impl Into<String>) -> Self {
        Self {
            key_label: key_label.into(),
            workload_label: workload_label.into(),
        }
    }
}

/// What running a case produced, beyond the emitted row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    /// The row handed to the sink
    pub result: BenchmarkResult,
    /// What the measured operation did
    pub measurement: Measurement,
    /// Keys removed by setup before measuring
    pub removed_in_setup: usize,
    /// Container length right after the measured operation
    pub entries_after: usize,
}

/// A runnable unit of the matrix, independent of key type
pub trait RunnableCase {
    /// Case name within its implementation group (the workload label)
    fn name(&self) -> &str;

    /// Run the case to completion and emit its row.
    fn run(
        self: Box<Self>,
        sink: &mut dyn ResultSink,
        probe: &dyn MemoryProbe,
    ) -> Result<CaseReport>;
}

/// One implementation × one workload × one key set
pub struct BenchmarkCase<K: MapKey> {
    implementation: Arc<dyn ContainerImplementation>,
    workload: Workload,
    labels: CaseLabels,
    keys: KeySet<K>,
    probes: KeySet<K>,
    rng: StdRng,
}

impl<K: MapKey> fmt::Debug for BenchmarkCase<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchmarkCase")
            .field("implementation", &self.implementation.name())
            .field("workload", &self.workload)
            .field("labels", &self.labels)
            .field("keys", &self.keys)
            .finish()
    }
}

impl<K: MapKey> BenchmarkCase<K> {
    /// Bind a case.
    ///
    /// # Errors
    ///
    /// - `MissingDependency` if the workload reads misses and `different_keys` is `None`
    /// - `KeyCountMismatch` if `different_keys` differs in size from `keys`
    pub fn new(
        implementation: Arc<dyn ContainerImplementation>,
        workload: Workload,
        labels: CaseLabels,
        keys: KeySet<K>,
        different_keys: Option<KeySet<K>>,
        rng: StdRng,
    ) -> Result<Self> {
        let probes = if workload.requires_different_keys() {
            let different = different_keys.ok_or(Error::MissingDependency("different keys"))?;
            if different.len() != keys.len() {
                return Err(Error::KeyCountMismatch {
                    expected: keys.len(),
                    actual: different.len(),
                });
            }
            different
        } else {
            keys.clone()
        };

        Ok(Self {
            implementation,
            workload,
            labels,
            keys,
            probes,
            rng,
        })
    }

    /// Run the case. Consumes it: a case executes exactly once.
    pub fn execute(
        mut self,
        sink: &mut dyn ResultSink,
        probe: &dyn MemoryProbe,
    ) -> Result<CaseReport> {
        let implementation_name = self.implementation.name().to_string();
        let dataset_size = self.keys.len();
        let procedure = self.workload.procedure::<K>();
        let span = format!(
            "{}/{}/{}",
            self.labels.key_label, implementation_name, self.labels.workload_label
        );

        trace!(case = %span, phase = %CasePhase::Init);
        let map = K::create_map(self.implementation.as_ref());
        let mut fixture = Fixture::new(map, self.keys, self.probes);
        (procedure.setup)(&mut fixture, &mut self.rng);

        trace!(case = %span, phase = %CasePhase::Measure);
        probe.reclaim_hint();
        let start_memory = probe.allocated_bytes();
        let start = Instant::now();
        let measurement = (procedure.measure)(&mut fixture);
        let elapsed = start.elapsed();
        let end_memory = probe.allocated_bytes();
        let entries_after = fixture.map.len();
        let removed_in_setup = fixture.removed_in_setup;

        trace!(case = %span, phase = %CasePhase::Teardown);
        fixture.teardown();
        drop(fixture);

        let result = BenchmarkResult {
            key_label: self.labels.key_label,
            workload_label: self.labels.workload_label,
            implementation: implementation_name,
            dataset_size,
            elapsed_nanos: u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
            memory_delta_bytes: memory_delta(start_memory, end_memory),
        };
        sink.emit(&result)?;
        trace!(case = %span, phase = %CasePhase::Emitted);
        debug!(
            case = %span,
            elapsed_nanos = result.elapsed_nanos,
            memory_delta_bytes = result.memory_delta_bytes,
            operations = measurement.operations,
            "case complete"
        );

        Ok(CaseReport {
            result,
            measurement,
            removed_in_setup,
            entries_after,
        })
    }
}

impl<K: MapKey> RunnableCase for BenchmarkCase<K> {
    fn name(&self) -> &str {
        &self.labels.workload_label
    }

    fn run(
        self: Box<Self>,
        sink: &mut dyn ResultSink,
        probe: &dyn MemoryProbe,
    ) -> Result<CaseReport> {
        (*self).execute(sink, probe)
    }
}
