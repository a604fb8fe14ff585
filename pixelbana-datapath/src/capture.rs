//! Capture driver: the front end of the datapath.
//!
//! Originates exactly one WRITE transaction per invocation carrying one byte
//! from the pixel source. A failed cycle is reported and dropped, never
//! retried.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{info, trace, warn};

use pixelbana_core::sched::{Poll, Process, SimContext};
use pixelbana_core::transaction::{ResponseStatus, Transaction};
use pixelbana_core::transport::{Delay, TargetRef};

use crate::FRAME_ADDRESS;

const CAPTURE_LATENCY: Delay = Delay::from_ns(10);

/// External collaborator replacing physical camera capture: an opaque byte
/// generator with no framing.
pub trait PixelSource {
    fn next_pixel(&mut self) -> u8;
}

/// Always yields the same byte.
pub struct FixedPixelSource {
    value: u8,
}

impl FixedPixelSource {
    pub fn new(value: u8) -> Self {
        Self { value }
    }
}

impl PixelSource for FixedPixelSource {
    fn next_pixel(&mut self) -> u8 {
        self.value
    }
}

/// Seeded deterministic source for randomized runs.
pub struct RandomPixelSource {
    rng: SmallRng,
}

impl RandomPixelSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl PixelSource for RandomPixelSource {
    fn next_pixel(&mut self) -> u8 {
        self.rng.random()
    }
}

/// Scheduled stage originating one frame byte per invocation.
pub struct CaptureDriver {
    source: Box<dyn PixelSource>,
    target: TargetRef,
}

impl CaptureDriver {
    pub fn new(source: Box<dyn PixelSource>, target: TargetRef) -> Self {
        Self { source, target }
    }
}

impl Process for CaptureDriver {
    fn name(&self) -> &str {
        "capture-driver"
    }

    fn resume(&mut self, _ctx: &mut SimContext<'_>) -> Poll {
        let pixel = self.source.next_pixel();
        let mut frame = [pixel];
        let mut trans = Transaction::write(FRAME_ADDRESS, &mut frame);
        let mut delay = Delay::ZERO;

        info!(pixel, "capture: sending frame byte");
        self.target.borrow_mut().transport(&mut trans, &mut delay);

        let status = trans.response_status();
        if status == ResponseStatus::Ok {
            info!(delay = %delay, "capture: frame byte delivered");
        } else {
            warn!(%status, "capture: cycle failed, frame dropped");
        }

        delay += CAPTURE_LATENCY;
        trace!(total = %delay, "capture: cycle complete");
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
            assert!(trans.is_write());
            assert_eq!(trans.address(), FRAME_ADDRESS);
            assert_eq!(trans.length(), 1);
            if let Some(byte) = trans.first_byte() {
                self.bytes.borrow_mut().push(byte);
            }
            *delay += Delay::from_ns(10);
            trans.complete(ResponseStatus::Ok);
        }
    }

    #[test]
    fn sends_one_write_per_invocation() {
        let bytes = Rc::new(RefCell::new(Vec::new()));
        let target = Rc::new(RefCell::new(RecordingTarget {
            bytes: Rc::clone(&bytes),
        }));
        let mut sched = Scheduler::new();
        sched.spawn(
            Box::new(CaptureDriver::new(
                Box::new(FixedPixelSource::new(123)),
                target,
            )),
            0,
        );
        let steps = sched.run_until(u64::MAX);
        assert_eq!(steps, 1);
        assert_eq!(*bytes.borrow(), vec![123]);
    }

    #[test]
    fn random_source_is_deterministic_per_seed() {
        let mut a = RandomPixelSource::new(42);
        let mut b = RandomPixelSource::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_pixel(), b.next_pixel());
        }
    }
}
