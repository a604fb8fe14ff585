//! Simulation runtime: drives the scheduler and reports the outcome.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use pixelbana_core::sched::Scheduler;
use pixelbana_core::SimError;
use pixelbana_datapath::{FrameRegister, MemoryStore};
use pixelbana_telemetry::MetricsRecorder;

/// Outcome of one simulation run.
///
/// The state hash digests the final observable state (virtual time, step
/// count, frame register, store banks); identical wiring and seed always
/// reproduce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Task steps the scheduler dispatched.
    pub steps: u64,
    /// Virtual time when the run stopped.
    pub final_time_ns: u64,
    /// Last frame byte latched by the receiver.
    pub frame: u8,
    /// Hex-encoded blake3 digest of the final state.
    pub state_hash: String,
}

impl RunReport {
    /// Validates the run against an expected state hash.
    pub fn validate_hash(&self, expected: &str) -> Result<(), SimError> {
        if self.state_hash != expected {
            return Err(SimError::Validation(format!(
                "state hash mismatch\nexpected: {}\nactual:   {}",
                expected, self.state_hash
            )));
        }
        Ok(())
    }
}

/// Owns the wired scheduler and the handles needed to observe the run.
pub struct SimulationRuntime {
    scheduler: Scheduler,
    stores: Vec<Rc<RefCell<MemoryStore>>>,
    frame: FrameRegister,
    horizon_ns: u64,
    pub metrics: MetricsRecorder,
}

impl SimulationRuntime {
    pub(crate) fn new(
        scheduler: Scheduler,
        stores: Vec<Rc<RefCell<MemoryStore>>>,
        frame: FrameRegister,
        horizon_ns: u64,
        metrics: MetricsRecorder,
    ) -> Self {
        Self {
            scheduler,
            stores,
            frame,
            horizon_ns,
            metrics,
        }
    }

    /// Runs the simulation to its virtual-time horizon.
    pub fn run(&mut self) -> RunReport {
        info!(horizon_ns = self.horizon_ns, "starting simulation run");
        let steps = self.scheduler.run_until(self.horizon_ns);
        let final_time_ns = self.scheduler.now_ns();

        self.metrics.task_steps.inc_by(steps as f64);
        self.metrics.run_virtual_ns.observe(final_time_ns as f64);

        let state_hash = self.state_hash(steps, final_time_ns);
        info!(steps, final_time_ns, %state_hash, "simulation run complete");

        RunReport {
            steps,
            final_time_ns,
            frame: self.frame.load(),
            state_hash,
        }
    }

    /// Cell contents of one store bank, e.g. for diagnostics.
    pub fn bank_snapshot(&self, bank: usize) -> Option<Vec<u8>> {
        self.stores
            .get(bank)
            .map(|store| store.borrow().snapshot().to_vec())
    }

    fn state_hash(&self, steps: u64, final_time_ns: u64) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&steps.to_le_bytes());
        hasher.update(&final_time_ns.to_le_bytes());
        hasher.update(&[self.frame.load()]);
        for store in &self.stores {
            hasher.update(store.borrow().snapshot());
        }
        hex::encode(hasher.finalize().as_bytes())
    }
}
