//! Output consumer: the display-facing tail of the datapath.
//!
//! Loops indefinitely, issuing one READ transaction per iteration against
//! the frame address and handing retrieved bytes to the display sink. Yields
//! to the scheduler between iterations, never busy-spins. The read buffer is
//! a real local byte the transaction borrows for the duration of the call.

use tracing::{info, trace, warn};

use pixelbana_core::sched::{Poll, Process, SimContext};
use pixelbana_core::transaction::{ResponseStatus, Transaction};
use pixelbana_core::transport::{Delay, TargetRef};

use crate::FRAME_ADDRESS;

const REPORT_LATENCY: Delay = Delay::from_ns(10);

/// External collaborator replacing video output: receives reported bytes
/// with no acknowledgment expected.
pub trait DisplaySink {
    fn present(&mut self, pixel: u8);
}

/// Sink that reports frames through the trace output.
pub struct TraceSink;

impl DisplaySink for TraceSink {
    fn present(&mut self, pixel: u8) {
        info!(pixel, "display: frame presented");
    }
}

/// Scheduled stage periodically reading back the stored frame byte.
pub struct OutputConsumer {
    target: TargetRef,
    sink: Box<dyn DisplaySink>,
    poll_interval: Delay,
}

impl OutputConsumer {
    pub fn new(target: TargetRef, sink: Box<dyn DisplaySink>, poll_interval: Delay) -> Self {
        Self {
            target,
            sink,
            poll_interval,
        }
    }
}

impl Process for OutputConsumer {
    fn name(&self) -> &str {
        "output-consumer"
    }

    fn resume(&mut self, ctx: &mut SimContext<'_>) -> Poll {
        let mut buf = [0u8];
        let mut trans = Transaction::read(FRAME_ADDRESS, &mut buf);
        let mut delay = Delay::ZERO;

        trace!(now_ns = ctx.now_ns(), "output: requesting frame byte");
        self.target.borrow_mut().transport(&mut trans, &mut delay);
        delay += REPORT_LATENCY;

        let status = trans.response_status();
        if status == ResponseStatus::Ok {
            let pixel = buf[0];
            info!(pixel, delay = %delay, "output: frame byte retrieved");
            self.sink.present(pixel);
        } else {
            warn!(%status, "output: frame read failed");
        }

        Poll::Yield(self.poll_interval)
    }
}
