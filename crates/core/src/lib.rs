//! Core types and traits for the map shootout
//!
//! This crate defines the foundational pieces the benchmark engine is built on:
//! - Error: Error type hierarchy
//! - KeySet / MapKey: immutable key sequences and the key domains they cover
//! - KeyGenerator: pseudo-random string and integer keys
//! - BenchMap / ContainerImplementation: the container capability contract
//! - catalog: capabilities for the maps shipped with the harness

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod container;
pub mod error;
pub mod generator;
pub mod keys;

pub use container::{BenchMap, ContainerImplementation, Counter, POPULATE_VALUE};
pub use error::{Error, Result};
pub use generator::{is_valid_code_point, KeyGenerator};
pub use keys::{truncate_code_points, KeySet, MapKey};
