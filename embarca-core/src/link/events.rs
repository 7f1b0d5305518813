//! Link events

/// Inputs to the link state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// Begin resolving the broker host
    Start,
    /// Broker address known
    DnsResolved,
    /// Resolution failed
    DnsFailed,
    /// Handshake reply with its return code (0 = accepted)
    ConnAck(u8),
    /// Deadline of the pending phase passed
    Timeout,
    /// Socket open, write or read failed
    TransportError,
}

/// Reason code a broker reports for an unspecified failure
pub const UNSPECIFIED_ERROR: u8 = 0x80;

impl LinkEvent {
    /// Event for a finished handshake: `Ok` when accepted, else the reason code
    ///
    /// A zero code never counts as accepted on the error path.
    pub fn handshake(result: Result<(), u8>) -> Self {
        match result {
            Ok(()) => LinkEvent::ConnAck(0),
            Err(0) => LinkEvent::ConnAck(UNSPECIFIED_ERROR),
            Err(code) => LinkEvent::ConnAck(code),
        }
    }
}
