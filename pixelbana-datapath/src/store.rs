//! Bounded byte store serving READ and WRITE transactions.
//!
//! The cell array is mutated only inside the store's own transport handler;
//! no other component touches it directly. Validation is terminal: once a
//! check fails the handler sets the status and returns without mutating
//! anything.

use tracing::{error, info};

use pixelbana_core::transaction::{ResponseStatus, Transaction};
use pixelbana_core::transport::{Delay, Transport};

/// Default number of addressable byte cells.
pub const DEFAULT_CAPACITY: usize = 256;

/// Fixed processing latency per access.
const ACCESS_LATENCY: Delay = Delay::from_ns(10);

/// Fixed-size addressable byte array.
pub struct MemoryStore {
    cells: Vec<u8>,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: vec![0; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Read-only view of the cell array, e.g. for run digests.
    pub fn snapshot(&self) -> &[u8] {
        &self.cells
    }
}

impl Transport for MemoryStore {
    fn transport(&mut self, trans: &mut Transaction<'_>, delay: &mut Delay) {
        let address = trans.address() as usize;

        if !trans.has_payload() {
            error!("store: transaction carries no payload buffer");
            trans.complete(ResponseStatus::GenericError);
            return;
        }
        if address >= self.cells.len() {
            error!(
                address,
                capacity = self.cells.len(),
                "store: address out of range"
            );
            trans.complete(ResponseStatus::AddressError);
            return;
        }

        if trans.is_write() {
            if let Some(byte) = trans.first_byte() {
                self.cells[address] = byte;
                info!(address, byte, "store: write");
            }
        } else {
            let byte = self.cells[address];
            trans.put_byte(byte);
            info!(address, byte, "store: read");
        }

        *delay += ACCESS_LATENCY;
        trans.complete(ResponseStatus::Ok);
    }
}
