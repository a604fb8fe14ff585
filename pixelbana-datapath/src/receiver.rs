//! Inbound frame receiver.
//!
//! Pure transport target: it validates the inbound transaction, latches the
//! frame byte, and raises its completion signal. It never originates
//! transactions of its own.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{error, info};

use pixelbana_core::signal::EventSignal;
use pixelbana_core::transaction::{ResponseStatus, Transaction};
use pixelbana_core::transport::{Delay, Transport};

const RECEIVE_LATENCY: Delay = Delay::from_ns(10);

/// Single-byte latch shared between the receiver and the processor.
///
/// The receiver stores the last accepted frame byte; the processor reads it
/// when forwarding downstream. Single logical thread of control, so a plain
/// `Cell` suffices.
#[derive(Clone, Default)]
pub struct FrameRegister {
    cell: Rc<Cell<u8>>,
}

impl FrameRegister {
    pub fn store(&self, byte: u8) {
        self.cell.set(byte);
    }

    pub fn load(&self) -> u8 {
        self.cell.get()
    }
}

/// Validates inbound frame transactions and signals completion.
pub struct Receiver {
    frame: FrameRegister,
    data_received: EventSignal,
}

impl Receiver {
    /// Every reference the receiver needs is injected here; nothing is
    /// rewired after construction.
    pub fn new(frame: FrameRegister, data_received: EventSignal) -> Self {
        Self {
            frame,
            data_received,
        }
    }

    /// Handle to the completion signal this receiver owns and raises.
    pub fn data_received(&self) -> EventSignal {
        self.data_received.clone()
    }
}

impl Transport for Receiver {
    fn transport(&mut self, trans: &mut Transaction<'_>, delay: &mut Delay) {
        if !trans.has_payload() {
            error!("receiver: no frame data attached to inbound transaction");
            trans.complete(ResponseStatus::GenericError);
            return;
        }
        if trans.length() != 1 {
            error!(
                length = trans.length(),
                "receiver: unexpected transfer length"
            );
            trans.complete(ResponseStatus::BurstError);
            return;
        }
        let Some(pixel) = trans.first_byte() else {
            trans.complete(ResponseStatus::GenericError);
            return;
        };

        self.frame.store(pixel);
        info!(pixel, "receiver: accepted frame byte");
        *delay += RECEIVE_LATENCY;
        self.data_received.notify(Delay::ZERO);
        trans.complete(ResponseStatus::Ok);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelbana_core::sched::Scheduler;
    use pixelbana_core::transaction::Command;
    use tracing_test::traced_test;

    fn receiver() -> Receiver {
        let sched = Scheduler::new();
        Receiver::new(FrameRegister::default(), sched.signal("data-received"))
    }

    #[test]
    fn accepts_a_single_byte_and_signals() {
        let mut rx = receiver();
        let signal = rx.data_received();
        let mut buf = [123u8];
        let mut trans = Transaction::write(0, &mut buf);
        let mut delay = Delay::ZERO;
        rx.transport(&mut trans, &mut delay);

        assert_eq!(trans.response_status(), ResponseStatus::Ok);
        // one full driver→receiver call costs exactly the receiver latency
        assert_eq!(delay.as_ns(), 10);
        assert_eq!(rx.frame.load(), 123);
        assert!(signal.take_latched());
    }

    #[test]
    fn delay_is_independent_of_data_value() {
        for byte in [0u8, 1, 255] {
            let mut rx = receiver();
            let mut buf = [byte];
            let mut trans = Transaction::write(0, &mut buf);
            let mut delay = Delay::ZERO;
            rx.transport(&mut trans, &mut delay);
            assert_eq!(delay.as_ns(), 10);
        }
    }

    #[test]
    fn null_payload_is_a_generic_error() {
        let mut rx = receiver();
        let signal = rx.data_received();
        let mut trans = Transaction::empty(Command::Write, 0);
        let mut delay = Delay::ZERO;
        rx.transport(&mut trans, &mut delay);

        assert_eq!(trans.response_status(), ResponseStatus::GenericError);
        assert_eq!(delay, Delay::ZERO);
        assert!(!signal.take_latched());
    }

    #[test]
    fn wrong_length_is_a_burst_error() {
        let mut rx = receiver();
        let mut buf = [1u8, 2];
        let mut trans = Transaction::write(0, &mut buf);
        let mut delay = Delay::ZERO;
        rx.transport(&mut trans, &mut delay);

        assert_eq!(trans.response_status(), ResponseStatus::BurstError);
        assert_eq!(delay, Delay::ZERO);
    }

    #[traced_test]
    #[test]
    fn traces_the_accepted_byte() {
        let mut rx = receiver();
        let mut buf = [42u8];
        let mut trans = Transaction::write(0, &mut buf);
        let mut delay = Delay::ZERO;
        rx.transport(&mut trans, &mut delay);
        assert!(logs_contain("accepted frame byte"));
    }
}
