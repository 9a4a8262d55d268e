//! Map shootout integration tests
//!
//! End-to-end runs of small matrices: tree shape, key sharing across
//! implementations, result rows, failure isolation and the contents of
//! the measured window.

#[path = "../common/mod.rs"]
mod common;

mod fairness;
mod isolation;
mod measurement;
mod tree;
