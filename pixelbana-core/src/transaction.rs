//! Transaction record exchanged between datapath stages.
//!
//! A transaction borrows its payload from the originating stage: the
//! initiator owns the buffer and keeps it alive for the duration of the
//! blocking transport call. `None` models an absent data pointer, which
//! terminal handlers must answer with [`ResponseStatus::GenericError`].

/// Access direction of a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Read,
    Write,
}

/// Outcome of a transaction, set exactly once by the terminal handler.
///
/// Carried in-band, never as a Rust error: a non-OK status is a local
/// failure the initiator reports and the simulation continues.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseStatus {
    /// No handler has completed the transaction yet.
    #[default]
    Incomplete,
    Ok,
    /// Absent payload reference.
    GenericError,
    /// Out-of-range address or unroutable interconnect target.
    AddressError,
    /// Wrong transfer length.
    BurstError,
}

impl std::fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ResponseStatus::Incomplete => "incomplete",
            ResponseStatus::Ok => "ok",
            ResponseStatus::GenericError => "generic error",
            ResponseStatus::AddressError => "address error",
            ResponseStatus::BurstError => "burst error",
        };
        f.write_str(text)
    }
}

/// A single request/response exchange between stages.
#[derive(Debug)]
pub struct Transaction<'a> {
    command: Command,
    address: u64,
    payload: Option<&'a mut [u8]>,
    length: usize,
    response_status: ResponseStatus,
}

impl<'a> Transaction<'a> {
    /// Builds a WRITE transaction carrying `payload`.
    pub fn write(address: u64, payload: &'a mut [u8]) -> Self {
        let length = payload.len();
        Self {
            command: Command::Write,
            address,
            payload: Some(payload),
            length,
            response_status: ResponseStatus::Incomplete,
        }
    }

    /// Builds a READ transaction that will deposit data into `payload`.
    pub fn read(address: u64, payload: &'a mut [u8]) -> Self {
        let length = payload.len();
        Self {
            command: Command::Read,
            address,
            payload: Some(payload),
            length,
            response_status: ResponseStatus::Incomplete,
        }
    }

    /// Builds a transaction with no payload attached, as issued by a stage
    /// whose data pointer was never wired. Terminal handlers answer these
    /// with [`ResponseStatus::GenericError`].
    pub fn empty(command: Command, address: u64) -> Self {
        Self {
            command,
            address,
            payload: None,
            length: 0,
            response_status: ResponseStatus::Incomplete,
        }
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn address(&self) -> u64 {
        self.address
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn is_write(&self) -> bool {
        self.command == Command::Write
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// First payload byte, if a payload is attached and non-empty.
    pub fn first_byte(&self) -> Option<u8> {
        self.payload.as_deref().and_then(|p| p.first().copied())
    }

    /// Deposits `value` into the first payload byte. Returns `false` when no
    /// writable payload is attached.
    pub fn put_byte(&mut self, value: u8) -> bool {
        match self.payload.as_deref_mut().and_then(|p| p.first_mut()) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn response_status(&self) -> ResponseStatus {
        self.response_status
    }

    pub fn is_ok(&self) -> bool {
        self.response_status == ResponseStatus::Ok
    }

    /// Terminal handlers call this exactly once before returning control to
    /// the initiator.
    pub fn complete(&mut self, status: ResponseStatus) {
        debug_assert_eq!(
            self.response_status,
            ResponseStatus::Incomplete,
            "response status set twice"
        );
        self.response_status = status;
    }

    /// Clears the response status so the transaction can be re-issued on the
    /// next leg of an interconnect fan-out.
    pub fn reset_status(&mut self) {
        self.response_status = ResponseStatus::Incomplete;
    }
}
