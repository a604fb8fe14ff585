//! Processing stage between the receiver and the interconnect.
//!
//! Originates one downstream WRITE carrying the latched frame byte, then
//! raises the receiver's signal to acknowledge receipt. The acknowledgment
//! is a synchronization point, not a new transaction. When wired with a
//! frame-ready signal the stage suspends until the receiver raises it;
//! without one it forwards unconditionally on its first resume.

use tracing::{info, trace, warn};

use pixelbana_core::sched::{Poll, Process, SimContext};
use pixelbana_core::signal::EventSignal;
use pixelbana_core::transaction::{ResponseStatus, Transaction};
use pixelbana_core::transport::{Delay, TargetRef};

use crate::receiver::FrameRegister;
use crate::FRAME_ADDRESS;

const PROCESS_LATENCY: Delay = Delay::from_ns(10);

enum Phase {
    AwaitFrame,
    Forward,
}

/// Forwards accepted frames from the receiver's latch into the datapath.
pub struct Processor {
    downstream: TargetRef,
    frame: FrameRegister,
    frame_ready: Option<EventSignal>,
    ack: Option<EventSignal>,
    phase: Phase,
}

impl Processor {
    /// All references are injected at construction and never rewired.
    /// Either signal reference may be absent: without `frame_ready` the
    /// stage forwards on its first resume, and without `ack` the
    /// acknowledgment is skipped silently.
    pub fn new(
        downstream: TargetRef,
        frame: FrameRegister,
        frame_ready: Option<EventSignal>,
        ack: Option<EventSignal>,
    ) -> Self {
        Self {
            downstream,
            frame,
            frame_ready,
            ack,
            phase: Phase::AwaitFrame,
        }
    }
}

impl Process for Processor {
    fn name(&self) -> &str {
        "processor"
    }

    fn resume(&mut self, _ctx: &mut SimContext<'_>) -> Poll {
        if matches!(self.phase, Phase::AwaitFrame) {
            self.phase = Phase::Forward;
            if let Some(ready) = &self.frame_ready {
                trace!("processor: waiting for frame from receiver");
                return Poll::Wait(ready.clone());
            }
        }

        let pixel = self.frame.load();
        let mut buf = [pixel];
        let mut trans = Transaction::write(FRAME_ADDRESS, &mut buf);
        let mut delay = Delay::ZERO;

        info!(pixel, "processor: forwarding frame byte downstream");
        self.downstream.borrow_mut().transport(&mut trans, &mut delay);
        delay += PROCESS_LATENCY;

        let status = trans.response_status();
        if status != ResponseStatus::Ok {
            // inspected, not enforced: the failure stays local
            warn!(%status, "processor: downstream reported failure");
        }

        if let Some(ack) = &self.ack {
            ack.notify(Delay::ZERO);
            info!("processor: acknowledged frame receipt");
        }

        trace!(total = %delay, "processor: cycle complete");
        Poll::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelbana_core::sched::Scheduler;
    use pixelbana_core::transport::Transport;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingTarget {
        bytes: Rc<RefCell<Vec<u8>>>,
    }

    impl Transport for RecordingTarget {
        fn transport(&mut self, trans: &mut Transaction<'_>, delay: &mut Delay) {
            if let Some(byte) = trans.first_byte() {
                self.bytes.borrow_mut().push(byte);
            }
            *delay += Delay::from_ns(10);
            trans.complete(ResponseStatus::Ok);
        }
    }

    fn recording_target() -> (TargetRef, Rc<RefCell<Vec<u8>>>) {
        let bytes = Rc::new(RefCell::new(Vec::new()));
        let target: TargetRef = Rc::new(RefCell::new(RecordingTarget {
            bytes: Rc::clone(&bytes),
        }));
        (target, bytes)
    }

    #[test]
    fn forwards_latched_byte_once_signalled() {
        let mut sched = Scheduler::new();
        let frame = FrameRegister::default();
        frame.store(99);
        let frame_ready = sched.signal("data-received");
        let (target, bytes) = recording_target();

        sched.spawn(
            Box::new(Processor::new(
                target,
                frame.clone(),
                Some(frame_ready.clone()),
                None,
            )),
            0,
        );
        // raise before the run: the latch completes the wait immediately
        frame_ready.notify(Delay::ZERO);
        sched.run_until(u64::MAX);

        assert_eq!(*bytes.borrow(), vec![99]);
    }

    #[test]
    fn ungated_processor_forwards_on_first_resume() {
        let mut sched = Scheduler::new();
        let (target, bytes) = recording_target();

        sched.spawn(
            Box::new(Processor::new(target, FrameRegister::default(), None, None)),
            0,
        );
        let steps = sched.run_until(u64::MAX);

        assert_eq!(steps, 1);
        assert_eq!(*bytes.borrow(), vec![0]);
    }

    #[test]
    fn gated_processor_stays_parked_without_a_raise() {
        let mut sched = Scheduler::new();
        let frame_ready = sched.signal("data-received");
        let (target, bytes) = recording_target();

        sched.spawn(
            Box::new(Processor::new(
                target,
                FrameRegister::default(),
                Some(frame_ready),
                None,
            )),
            0,
        );
        sched.run_until(u64::MAX);

        assert!(bytes.borrow().is_empty());
    }

    #[test]
    fn ack_signal_is_raised_after_forwarding() {
        let mut sched = Scheduler::new();
        let ack = sched.signal("frame-ack");
        let (target, _bytes) = recording_target();

        sched.spawn(
            Box::new(Processor::new(
                target,
                FrameRegister::default(),
                None,
                Some(ack.clone()),
            )),
            0,
        );
        sched.run_until(u64::MAX);

        assert!(ack.take_latched());
    }
}
