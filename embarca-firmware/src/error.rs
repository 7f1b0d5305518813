//! Network error type

use embarca_core::payload::PayloadError;

/// Errors from Wi-Fi bring-up and the transports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetError {
    /// Join did not finish in time
    JoinTimeout,
    /// Join rejected with this CYW43 status
    JoinFailed(u32),
    /// Link never came up after joining
    LinkTimeout,
    /// No DHCP lease
    DhcpTimeout,
    /// UDP socket could not be bound
    Bind,
    /// Broker name did not resolve
    Dns,
    /// TCP connect, write or read failed
    Transport,
    /// Connect phase ran past its deadline
    Timeout,
    /// Broker refused the connection with this return code
    Refused(u8),
    /// Publish not accepted, with the client's reason code
    Publish(u8),
    /// Payload did not fit its buffer
    Payload(PayloadError),
}

impl From<PayloadError> for NetError {
    fn from(e: PayloadError) -> Self {
        NetError::Payload(e)
    }
}
