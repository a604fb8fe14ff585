//! Level-triggered wake primitive for inter-stage synchronization.
//!
//! An `EventSignal` carries no payload. It is owned by exactly one stage and
//! referenced, non-owning, by any stage that needs to raise it. All handles
//! are wired before the scheduler starts and never rewired at runtime.
//!
//! Delivery is not reentrant: a raise that happens inside a transport call
//! is only observed by the waiting process after the current task step
//! returns to the scheduler.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::trace;

use crate::sched::TaskId;
use crate::transport::Delay;

/// A pending resume produced by a raise, drained by the scheduler after each
/// task step.
pub(crate) struct Wake {
    pub(crate) task: TaskId,
    pub(crate) offset: Delay,
}

pub(crate) type WakeQueue = Rc<RefCell<VecDeque<Wake>>>;

struct SignalState {
    latched: bool,
    waiter: Option<TaskId>,
    wakes: WakeQueue,
}

/// Named synchronization primitive one stage uses to wake another.
///
/// Handles are cheap clones of a shared core; create them through
/// [`crate::sched::Scheduler::signal`].
#[derive(Clone)]
pub struct EventSignal {
    name: Rc<str>,
    state: Rc<RefCell<SignalState>>,
}

impl EventSignal {
    pub(crate) fn new(name: &str, wakes: WakeQueue) -> Self {
        Self {
            name: Rc::from(name),
            state: Rc::new(RefCell::new(SignalState {
                latched: false,
                waiter: None,
                wakes,
            })),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raises the signal. A process suspended on it is scheduled to resume
    /// at the current virtual time plus `offset`; with nobody waiting the
    /// raise is latched, so the next wait completes immediately.
    pub fn notify(&self, offset: Delay) {
        let mut state = self.state.borrow_mut();
        match state.waiter.take() {
            Some(task) => {
                trace!(signal = %self.name, "signal raised, waking suspended process");
                state.wakes.borrow_mut().push_back(Wake { task, offset });
            }
            None => {
                trace!(signal = %self.name, "signal raised with no waiter, latching");
                state.latched = true;
            }
        }
    }

    /// Consumes a latched raise, if any. The scheduler calls this when a
    /// process suspends on the signal.
    pub fn take_latched(&self) -> bool {
        let mut state = self.state.borrow_mut();
        std::mem::take(&mut state.latched)
    }

    /// Parks `task` as the single suspended waiter.
    pub(crate) fn park(&self, task: TaskId) {
        let mut state = self.state.borrow_mut();
        debug_assert!(
            state.waiter.is_none(),
            "signal {} already has a waiter",
            self.name
        );
        state.waiter = Some(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wake_queue() -> WakeQueue {
        Rc::new(RefCell::new(VecDeque::new()))
    }

    #[test]
    fn raise_without_waiter_latches() {
        let signal = EventSignal::new("frame-done", wake_queue());
        signal.notify(Delay::ZERO);
        assert!(signal.take_latched());
        // consumed, not level-stuck
        assert!(!signal.take_latched());
    }

    #[test]
    fn raise_with_waiter_enqueues_wake() {
        let wakes = wake_queue();
        let signal = EventSignal::new("frame-done", Rc::clone(&wakes));
        signal.park(TaskId(3));
        signal.notify(Delay::from_ns(7));
        let wake = wakes.borrow_mut().pop_front().expect("wake enqueued");
        assert_eq!(wake.task, TaskId(3));
        assert_eq!(wake.offset, Delay::from_ns(7));
        // the waiter was consumed by the raise
        assert!(!signal.take_latched());
    }
}
