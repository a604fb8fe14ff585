//! Blocking transport contract between initiators and targets.
//!
//! `transport` is a synchronous call: it returns only once the target has
//! fully processed the transaction and set its response status. For WRITE
//! commands the target mutates its own state as a side effect of the call.
//! The initiator inspects the status after the call returns and must not
//! assume success.

use std::cell::RefCell;
use std::ops::{Add, AddAssign};
use std::rc::Rc;

use crate::transaction::Transaction;

/// Simulated elapsed time accumulated along one transaction call chain.
///
/// An in/out accumulator: every handler adds its own fixed processing
/// latency before returning, so the value observed by the initiator is the
/// cumulative cost of the whole call path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Delay(u64);

impl Delay {
    pub const ZERO: Delay = Delay(0);

    pub const fn from_ns(ns: u64) -> Self {
        Delay(ns)
    }

    pub fn as_ns(self) -> u64 {
        self.0
    }
}

impl Add for Delay {
    type Output = Delay;

    fn add(self, rhs: Delay) -> Delay {
        Delay(self.0 + rhs.0)
    }
}

impl AddAssign for Delay {
    fn add_assign(&mut self, rhs: Delay) {
        self.0 += rhs.0;
    }
}

impl std::fmt::Display for Delay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

/// Blocking call/response interface every transport target implements.
pub trait Transport {
    /// Processes `trans` to completion, setting its response status and
    /// adding this handler's latency to `delay` before returning.
    fn transport(&mut self, trans: &mut Transaction<'_>, delay: &mut Delay);
}

/// Non-owning reference an initiator holds to its bound target.
///
/// Bound once at configuration time and never rewired afterwards. The
/// simulation runs on a single logical thread, so shared interior
/// mutability needs no locking.
pub type TargetRef = Rc<RefCell<dyn Transport>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::ResponseStatus;

    struct AlwaysOk;

    impl Transport for AlwaysOk {
        fn transport(&mut self, trans: &mut Transaction<'_>, delay: &mut Delay) {
            *delay += Delay::from_ns(10);
            trans.complete(ResponseStatus::Ok);
        }
    }

    #[test]
    fn delay_accumulates_across_calls() {
        let target: TargetRef = Rc::new(RefCell::new(AlwaysOk));
        let mut buf = [0u8];
        let mut trans = Transaction::write(0, &mut buf);
        let mut delay = Delay::from_ns(5);
        target.borrow_mut().transport(&mut trans, &mut delay);
        assert_eq!(delay.as_ns(), 15);
        assert!(trans.is_ok());
    }
}
