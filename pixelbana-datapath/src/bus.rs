//! Address-routed interconnect between one upstream and N downstream
//! targets.
//!
//! The decode rule divides the address space into fixed-size regions:
//! `target_index = address / region_size`. A transaction whose region has no
//! bound target is answered with an address error and not forwarded. The
//! alternate broadcast policy ignores the address and fans the transaction
//! out to every bound target in bind order.

use tracing::{error, info, trace};

use pixelbana_core::transaction::{ResponseStatus, Transaction};
use pixelbana_core::transport::{Delay, TargetRef, Transport};

/// Fixed routing latency added after handling, regardless of outcome.
const ROUTE_LATENCY: Delay = Delay::from_ns(5);

/// How the interconnect picks downstream targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoutingPolicy {
    /// Address-decoded routing to a single target.
    Decode,
    /// Forward to every bound target regardless of address.
    Broadcast,
}

/// Routing component decoding or fanning out transactions.
///
/// Downstream targets are bound once at configuration time. Wiring must be
/// acyclic: the interconnect borrows each target for the duration of the
/// forwarded call.
pub struct Interconnect {
    region_size: u64,
    policy: RoutingPolicy,
    targets: Vec<TargetRef>,
}

impl Interconnect {
    pub fn new(region_size: u64, policy: RoutingPolicy, targets: Vec<TargetRef>) -> Self {
        debug_assert!(region_size > 0, "region size must be non-zero");
        Self {
            region_size,
            policy,
            targets,
        }
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }
}

impl Transport for Interconnect {
    fn transport(&mut self, trans: &mut Transaction<'_>, delay: &mut Delay) {
        match self.policy {
            RoutingPolicy::Decode => {
                let target_index = (trans.address() / self.region_size) as usize;
                match self.targets.get(target_index) {
                    Some(target) => {
                        target.borrow_mut().transport(trans, delay);
                        info!(target_index, "bus: transaction forwarded");
                    }
                    None => {
                        error!(
                            address = trans.address(),
                            target_index,
                            targets = self.targets.len(),
                            "bus: no target decodes address"
                        );
                        trans.complete(ResponseStatus::AddressError);
                    }
                }
            }
            RoutingPolicy::Broadcast => {
                for (target_index, target) in self.targets.iter().enumerate() {
                    if target_index > 0 {
                        // each leg's terminal handler sets the status anew;
                        // the initiator observes the final leg's outcome
                        trans.reset_status();
                    }
                    target.borrow_mut().transport(trans, delay);
                    trace!(target_index, "bus: transaction broadcast");
                }
            }
        }
        *delay += ROUTE_LATENCY;
    }
}
