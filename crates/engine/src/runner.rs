//! Sequential matrix runner
//!
//! Walks the matrix depth first and runs each case to completion before the
//! next one starts, so no two measurement windows overlap. A case that
//! panics or whose row cannot be written is recorded as a failure and the
//! walk continues.
//!
//! A [`CaseFilter`] restricts the walk. Groups it cannot match are dropped
//! unbuilt, so their key sets are never generated.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, info};

use crate::matrix::{MatrixNode, TestMatrix};
use crate::memory::MemoryProbe;
use crate::sink::ResultSink;

/// Separator between group names in a case path
pub const PATH_SEPARATOR: &str = " / ";

/// A case that did not produce a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFailure {
    /// Group names and case name, joined by [`PATH_SEPARATOR`]
    pub path: String,
    /// Error or panic message
    pub message: String,
}

/// Path pattern selecting the cases to run.
///
/// Segments are separated by `/` and compared position by position with a
/// case path (suite, size, implementation, case). A segment matches when the
/// path segment contains it, and an empty segment matches anything. A
/// pattern shorter than the path selects everything below it, so
/// `Integer Tests / 200000 keys` runs one size of one suite and
/// `/ / HashMap` runs one implementation everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFilter {
    segments: Vec<String>,
}

impl CaseFilter {
    /// Parse a pattern. Surrounding whitespace of each segment is ignored.
    pub fn parse(pattern: &str) -> Self {
        let mut segments: Vec<String> = pattern
            .split('/')
            .map(|segment| segment.trim().to_string())
            .collect();
        while matches!(segments.last(), Some(last) if last.is_empty()) {
            segments.pop();
        }
        Self { segments }
    }

    /// True if a case at or below the group `path` can still match.
    pub fn admits_group(&self, path: &[String]) -> bool {
        self.segments
            .iter()
            .zip(path)
            .all(|(wanted, name)| name.contains(wanted.as_str()))
    }

    /// True if the case at `path` (group names, then the case name) matches.
    pub fn admits_case(&self, path: &[String]) -> bool {
        self.segments.len() <= path.len() && self.admits_group(path)
    }
}

/// Outcome counts of a run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Cases that emitted a row
    pub passed: usize,
    /// Cases reached but excluded by the filter
    pub skipped: usize,
    /// Groups excluded by the filter without being built
    pub pruned: usize,
    /// Cases that failed or could not be built
    pub failures: Vec<CaseFailure>,
}

impl RunSummary {
    /// True when no case failed
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Cases reached, whatever their outcome. Cases under pruned groups are
    /// not counted.
    pub fn total(&self) -> usize {
        self.passed + self.skipped + self.failures.len()
    }
}

/// Runs matrix cases one at a time against a sink and a memory probe.
pub struct Runner<'a> {
    sink: &'a mut dyn ResultSink,
    probe: &'a dyn MemoryProbe,
    filter: Option<CaseFilter>,
}

impl<'a> Runner<'a> {
    /// A runner that executes every case
    pub fn new(sink: &'a mut dyn ResultSink, probe: &'a dyn MemoryProbe) -> Self {
        Self {
            sink,
            probe,
            filter: None,
        }
    }

    /// Only run cases matching `pattern`; see [`CaseFilter`].
    pub fn with_filter(mut self, pattern: &str) -> Self {
        self.filter = Some(CaseFilter::parse(pattern));
        self
    }

    /// Run every case of `matrix`.
    pub fn run_matrix(&mut self, matrix: TestMatrix) -> RunSummary {
        info!(cases = matrix.case_count(), "starting map shootout");
        self.run(matrix.into_nodes())
    }

    /// Run every case under `nodes`.
    pub fn run(&mut self, nodes: impl Iterator<Item = MatrixNode>) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut path = Vec::new();
        for node in nodes {
            self.visit(node, &mut path, &mut summary);
        }
        info!(
            passed = summary.passed,
            skipped = summary.skipped,
            pruned = summary.pruned,
            failed = summary.failures.len(),
            "map shootout finished"
        );
        summary
    }

    fn visit(&mut self, node: MatrixNode, path: &mut Vec<String>, summary: &mut RunSummary) {
        match node {
            MatrixNode::Group { name, children } => {
                let depth = path.len();
                path.push(name);
                if !self.admits_group(path) {
                    debug!(group = %path.join(PATH_SEPARATOR), "group excluded by filter");
                    summary.pruned += 1;
                    path.pop();
                    return;
                }
                if depth < 2 {
                    info!(group = %path[depth], "entering group");
                }
                for child in children {
                    self.visit(child, path, summary);
                }
                path.pop();
            }
            MatrixNode::Rejected { name, error } => {
                if !self.admits_case(path, &name) {
                    summary.skipped += 1;
                    return;
                }
                let case_path = join_path(path, &name);
                error!(case = %case_path, error = %error, "case rejected");
                summary.failures.push(CaseFailure {
                    path: case_path,
                    message: error.to_string(),
                });
            }
            MatrixNode::Case(case) => {
                if !self.admits_case(path, case.name()) {
                    summary.skipped += 1;
                    return;
                }
                let case_path = join_path(path, case.name());

                let sink = &mut *self.sink;
                let probe = self.probe;
                let outcome = panic::catch_unwind(AssertUnwindSafe(move || case.run(sink, probe)));
                match outcome {
                    Ok(Ok(report)) => {
                        debug!(
                            case = %case_path,
                            elapsed_nanos = report.result.elapsed_nanos,
                            entries_after = report.entries_after,
                            "case passed"
                        );
                        summary.passed += 1;
                    }
                    Ok(Err(e)) => {
                        error!(case = %case_path, error = %e, "case failed");
                        summary.failures.push(CaseFailure {
                            path: case_path,
                            message: e.to_string(),
                        });
                    }
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        error!(case = %case_path, panic = %message, "case panicked");
                        summary.failures.push(CaseFailure {
                            path: case_path,
                            message,
                        });
                    }
                }
            }
        }
    }

    fn admits_group(&self, path: &[String]) -> bool {
        match &self.filter {
            Some(filter) => filter.admits_group(path),
            None => true,
        }
    }

    fn admits_case(&self, groups: &[String], name: &str) -> bool {
        match &self.filter {
            Some(filter) => {
                let mut path = groups.to_vec();
                path.push(name.to_string());
                filter.admits_case(&path)
            }
            None => true,
        }
    }
}

fn join_path(groups: &[String], leaf: &str) -> String {
    let mut parts: Vec<&str> = groups.iter().map(String::as_str).collect();
    parts.push(leaf);
    parts.join(PATH_SEPARATOR)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
