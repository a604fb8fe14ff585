//! # pixelbana-core
//!
//! Foundation layer for the pixelbana transaction-level datapath simulator.
//! Built with determinism, safety, and maintainability as primary design
//! constraints.
//!
//! ### Expectations:
//! - Fully deterministic: identical wiring and seed produce identical runs
//! - Single logical thread of control, no locking anywhere
//! - Virtual time only advances through the scheduler
//!
//! ### Key Submodules:
//! - `transaction`: the request/response record exchanged between stages
//! - `transport`: the blocking call/return contract plus delay accounting
//! - `signal`: level-triggered wake primitive for inter-stage synchronization
//! - `time`: `VirtualClock` using an atomic counter
//! - `sched`: discrete-event scheduler driving cooperative processes

pub mod error;
pub mod sched;
pub mod signal;
pub mod time;
pub mod transaction;
pub mod transport;

pub mod prelude {
    pub use crate::error::SimError;
    pub use crate::sched::{Poll, Process, Scheduler, SimContext, TaskId};
    pub use crate::signal::EventSignal;
    pub use crate::time::VirtualClock;
    pub use crate::transaction::{Command, ResponseStatus, Transaction};
    pub use crate::transport::{Delay, TargetRef, Transport};
}

pub use error::SimError;
