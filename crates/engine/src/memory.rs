//! Heap usage probe
//!
//! The memory delta reported for a case is advisory. Rust releases memory
//! deterministically at drop, so there is no collector to coax; the
//! "reclamation hint" issued before measurement only refreshes the
//! allocator's statistics so the starting reading is current. It is noise
//! reduction, not a correctness guarantee.
//!
//! Readings come from jemalloc's `stats.allocated` counter, which only
//! tracks allocations when jemalloc is the global allocator. The driver
//! installs it; library tests run on the system allocator and see zero.

/// Source of heap usage readings for the measurement window
pub trait MemoryProbe {
    /// Best-effort request to settle allocator state before measuring
    fn reclaim_hint(&self);

    /// Bytes currently allocated by the process
    fn allocated_bytes(&self) -> u64;
}

/// Probe that reports no memory usage
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProbe;

impl MemoryProbe for NoopProbe {
    fn reclaim_hint(&self) {}

    fn allocated_bytes(&self) -> u64 {
        0
    }
}

#[cfg(not(target_env = "msvc"))]
pub use self::jemalloc::JemallocProbe;

#[cfg(not(target_env = "msvc"))]
mod jemalloc {
    use super::MemoryProbe;
    use tikv_jemalloc_ctl::{epoch, stats};
    use tracing::warn;

    /// Probe backed by jemalloc's allocation statistics
    #[derive(Debug, Clone, Copy, Default)]
    pub struct JemallocProbe;

    impl MemoryProbe for JemallocProbe {
        fn reclaim_hint(&self) {
            if let Err(e) = epoch::advance() {
                warn!(error = %e, "jemalloc epoch advance failed");
            }
        }

        fn allocated_bytes(&self) -> u64 {
            if let Err(e) = epoch::advance() {
                warn!(error = %e, "jemalloc epoch advance failed");
            }
            match stats::allocated::read() {
                Ok(bytes) => bytes as u64,
                Err(e) => {
                    warn!(error = %e, "jemalloc stats.allocated unavailable");
                    0
                }
            }
        }
    }
}

/// The probe the driver should use on this target
pub fn default_probe() -> Box<dyn MemoryProbe> {
    #[cfg(not(target_env = "msvc"))]
    {
        Box::new(JemallocProbe)
    }
    #[cfg(target_env = "msvc")]
    {
        Box::new(NoopProbe)
    }
}

/// Signed difference between two readings
pub fn memory_delta(start: u64, end: u64) -> i64 {
    (end as i128 - start as i128) as i64
}
