//! Benchmark engine for the map shootout
//!
//! This crate turns container capabilities and key sets into measured results:
//! - workload: the closed workload catalog (setup + measured operation)
//! - lifecycle: one case, Init → Measure → Teardown → Emitted
//! - matrix: the lazily built suite / size / implementation / case tree
//! - runner: sequential execution with per-case failure isolation
//! - sink: tab-separated result rows
//! - memory: heap usage probe
//! - config: `shootout.toml`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod lifecycle;
pub mod matrix;
pub mod memory;
pub mod runner;
pub mod sink;
pub mod workload;

pub use config::{ShootoutConfig, SuiteSelection, CONFIG_FILE_NAME, CONFIG_PATH_ENV};
pub use lifecycle::{BenchmarkCase, CaseLabels, CasePhase, CaseReport, RunnableCase};
pub use matrix::{IntegerDomain, MatrixNode, TestMatrix};
pub use memory::{default_probe, memory_delta, MemoryProbe, NoopProbe};
pub use runner::{CaseFailure, CaseFilter, RunSummary, Runner};
pub use sink::{BenchmarkResult, ResultSink, TsvSink, VecSink};
pub use workload::{Measurement, Procedure, Workload};
