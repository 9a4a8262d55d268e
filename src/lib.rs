//! Map Shootout - micro-benchmarks for associative containers
//!
//! Compares key→counter map implementations on identical, pseudo-random key
//! sets across insert, delete, read, read-miss, read-after-delete and
//! iteration workloads, writing one tab-separated row per case.
//!
//! # Quick Start
//!
//! ```ignore
//! use mapshootout::{default_probe, Runner, ShootoutConfig, TestMatrix, TsvSink};
//!
//! let config = ShootoutConfig::load_or_default(&ShootoutConfig::resolve_path())?;
//! let mut sink = TsvSink::create(&config.output)?;
//! let probe = default_probe();
//! let matrix = TestMatrix::from_config(config)?;
//! let summary = Runner::new(&mut sink, probe.as_ref()).run_matrix(matrix);
//! ```
//!
//! # Architecture
//!
//! - `shootout-core`: keys, key generation, the container capability trait
//!   and the built-in container catalog
//! - `shootout-engine`: workloads, case lifecycle, matrix, runner and sink
//!
//! The driver lives in `benches/map_shootout.rs` (`cargo bench --bench map_shootout`).

pub use shootout_core::*;
pub use shootout_engine::*;
