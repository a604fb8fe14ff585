//! Discrete-event scheduler.
//!
//! Cooperative, single-threaded: each scheduled process runs until it
//! completes, yields, or suspends on an [`EventSignal`]; blocking transport
//! calls are plain synchronous calls inside one task step, never suspension
//! points. Events at the same virtual time dispatch in insertion order, so a
//! run is fully determined by its wiring and seed.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::signal::{EventSignal, WakeQueue};
use crate::time::VirtualClock;
use crate::transport::Delay;

/// Identifies a spawned process for the lifetime of the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TaskId(pub(crate) usize);

/// What a process does with control when it returns to the scheduler.
pub enum Poll {
    /// The process finished and is never resumed again.
    Done,
    /// Resume after the given virtual-time delay.
    Yield(Delay),
    /// Suspend until the signal is raised.
    Wait(EventSignal),
}

/// Execution context handed to a process on every resume.
pub struct SimContext<'a> {
    clock: &'a VirtualClock,
}

impl SimContext<'_> {
    pub fn now_ns(&self) -> u64 {
        self.clock.now_ns()
    }
}

/// A schedulable unit of execution.
pub trait Process {
    /// Stable name used in trace output.
    fn name(&self) -> &str;

    /// Runs the process until its next completion or suspension point.
    fn resume(&mut self, ctx: &mut SimContext<'_>) -> Poll;
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    at: u64,
    seq: u64,
    task: TaskId,
}

/// Single event-loop driver advancing virtual time.
pub struct Scheduler {
    clock: VirtualClock,
    queue: BinaryHeap<Reverse<QueueEntry>>,
    tasks: Vec<Option<Box<dyn Process>>>,
    wakes: WakeQueue,
    seq: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            clock: VirtualClock::new(0),
            queue: BinaryHeap::new(),
            tasks: Vec::new(),
            wakes: Rc::new(std::cell::RefCell::new(VecDeque::new())),
            seq: 0,
        }
    }

    /// Shared handle to the virtual clock.
    pub fn clock(&self) -> VirtualClock {
        self.clock.clone()
    }

    pub fn now_ns(&self) -> u64 {
        self.clock.now_ns()
    }

    /// Creates a signal whose raises feed this scheduler's wake queue.
    pub fn signal(&self, name: &str) -> EventSignal {
        EventSignal::new(name, Rc::clone(&self.wakes))
    }

    /// Registers a process and schedules its first resume at `at_ns`.
    pub fn spawn(&mut self, process: Box<dyn Process>, at_ns: u64) -> TaskId {
        let task = TaskId(self.tasks.len());
        debug!(process = process.name(), at_ns, "process spawned");
        self.tasks.push(Some(process));
        self.push(task, at_ns);
        task
    }

    /// True when no event is pending.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Dispatches events in virtual-time order until the queue drains or the
    /// next event lies beyond `horizon_ns`. Returns the number of task steps
    /// executed.
    pub fn run_until(&mut self, horizon_ns: u64) -> u64 {
        let mut steps = 0u64;
        self.drain_wakes();
        while let Some(&Reverse(entry)) = self.queue.peek() {
            if entry.at > horizon_ns {
                break;
            }
            self.queue.pop();
            self.clock.advance_to(entry.at);

            let Some(mut process) = self.tasks[entry.task.0].take() else {
                continue;
            };
            trace!(process = process.name(), now_ns = entry.at, "resuming");
            let mut ctx = SimContext { clock: &self.clock };
            let poll = process.resume(&mut ctx);
            steps += 1;

            match poll {
                Poll::Done => {
                    debug!(process = process.name(), "process complete");
                }
                Poll::Yield(delay) => {
                    let at = self.clock.now_ns() + delay.as_ns();
                    self.tasks[entry.task.0] = Some(process);
                    self.push(entry.task, at);
                }
                Poll::Wait(signal) => {
                    self.tasks[entry.task.0] = Some(process);
                    if signal.take_latched() {
                        // level-triggered: a raise that happened before the
                        // wait completes it at the current instant
                        self.push(entry.task, self.clock.now_ns());
                    } else {
                        signal.park(entry.task);
                    }
                }
            }

            self.drain_wakes();
        }
        steps
    }

    fn push(&mut self, task: TaskId, at: u64) {
        self.seq += 1;
        self.queue.push(Reverse(QueueEntry {
            at,
            seq: self.seq,
            task,
        }));
    }

    fn drain_wakes(&mut self) {
        loop {
            let wake = self.wakes.borrow_mut().pop_front();
            match wake {
                Some(wake) => {
                    let at = self.clock.now_ns() + wake.offset.as_ns();
                    self.push(wake.task, at);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    struct OneShot {
        name: &'static str,
        log: Log,
    }

    impl Process for OneShot {
        fn name(&self) -> &str {
            self.name
        }

        fn resume(&mut self, _ctx: &mut SimContext<'_>) -> Poll {
            self.log.borrow_mut().push(self.name);
            Poll::Done
        }
    }

    struct Ticker {
        remaining: u32,
        period: Delay,
    }

    impl Process for Ticker {
        fn name(&self) -> &str {
            "ticker"
        }

        fn resume(&mut self, _ctx: &mut SimContext<'_>) -> Poll {
            if self.remaining == 0 {
                return Poll::Done;
            }
            self.remaining -= 1;
            Poll::Yield(self.period)
        }
    }

    struct Waiter {
        signal: EventSignal,
        parked: bool,
        log: Log,
    }

    impl Process for Waiter {
        fn name(&self) -> &str {
            "waiter"
        }

        fn resume(&mut self, _ctx: &mut SimContext<'_>) -> Poll {
            if !self.parked {
                self.parked = true;
                return Poll::Wait(self.signal.clone());
            }
            self.log.borrow_mut().push("waiter-woke");
            Poll::Done
        }
    }

    struct Notifier {
        signal: EventSignal,
        log: Log,
    }

    impl Process for Notifier {
        fn name(&self) -> &str {
            "notifier"
        }

        fn resume(&mut self, _ctx: &mut SimContext<'_>) -> Poll {
            self.log.borrow_mut().push("notify");
            self.signal.notify(Delay::ZERO);
            Poll::Done
        }
    }

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn equal_timestamps_dispatch_in_spawn_order() {
        let mut sched = Scheduler::new();
        let log = log();
        sched.spawn(
            Box::new(OneShot {
                name: "first",
                log: Rc::clone(&log),
            }),
            0,
        );
        sched.spawn(
            Box::new(OneShot {
                name: "second",
                log: Rc::clone(&log),
            }),
            0,
        );
        let steps = sched.run_until(u64::MAX);
        assert_eq!(steps, 2);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn yield_advances_virtual_time() {
        let mut sched = Scheduler::new();
        sched.spawn(
            Box::new(Ticker {
                remaining: 3,
                period: Delay::from_ns(10),
            }),
            0,
        );
        let steps = sched.run_until(u64::MAX);
        // three yielding steps plus the final Done step
        assert_eq!(steps, 4);
        assert_eq!(sched.now_ns(), 30);
        assert!(sched.is_idle());
    }

    #[test]
    fn horizon_bounds_the_run() {
        let mut sched = Scheduler::new();
        sched.spawn(
            Box::new(Ticker {
                remaining: 100,
                period: Delay::from_ns(10),
            }),
            0,
        );
        sched.run_until(35);
        assert_eq!(sched.now_ns(), 30);
        assert!(!sched.is_idle());
    }

    #[test]
    fn raise_wakes_suspended_process() {
        let mut sched = Scheduler::new();
        let log = log();
        let signal = sched.signal("wake-up");
        sched.spawn(
            Box::new(Waiter {
                signal: signal.clone(),
                parked: false,
                log: Rc::clone(&log),
            }),
            0,
        );
        sched.spawn(
            Box::new(Notifier {
                signal,
                log: Rc::clone(&log),
            }),
            5,
        );
        sched.run_until(u64::MAX);
        assert_eq!(*log.borrow(), vec!["notify", "waiter-woke"]);
        assert_eq!(sched.now_ns(), 5);
    }

    #[test]
    fn raise_before_wait_is_latched() {
        let mut sched = Scheduler::new();
        let log = log();
        let signal = sched.signal("wake-up");
        // notifier runs first: nobody waits yet, so the raise latches
        sched.spawn(
            Box::new(Notifier {
                signal: signal.clone(),
                log: Rc::clone(&log),
            }),
            0,
        );
        sched.spawn(
            Box::new(Waiter {
                signal,
                parked: false,
                log: Rc::clone(&log),
            }),
            0,
        );
        sched.run_until(u64::MAX);
        assert_eq!(*log.borrow(), vec!["notify", "waiter-woke"]);
    }
}
