//! Virtual clock for deterministic simulation.
//!
//! Simulated time is independent of wall-clock execution time and only ever
//! moves forward, driven by the scheduler as it dispatches events.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A virtual clock that advances in nanoseconds.
#[derive(Clone, Default)]
pub struct VirtualClock {
    offset: Arc<AtomicU64>,
}

impl VirtualClock {
    /// Creates a clock starting at the given time.
    pub fn new(start_ns: u64) -> Self {
        Self {
            offset: Arc::new(AtomicU64::new(start_ns)),
        }
    }

    /// Current virtual time in nanoseconds.
    #[inline]
    pub fn now_ns(&self) -> u64 {
        self.offset.load(Ordering::Acquire)
    }

    /// Advances the clock to `ns` if that is later than the current time.
    /// Virtual time never moves backwards.
    #[inline]
    pub fn advance_to(&self, ns: u64) {
        self.offset.fetch_max(ns, Ordering::AcqRel);
    }
}
