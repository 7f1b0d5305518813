//! Link state machine definition

use super::events::LinkEvent;

/// Broker link states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Nothing attempted yet
    Idle,
    /// Waiting on the broker's address
    ResolvingDns,
    /// Transport opening and handshake in flight
    Connecting,
    /// Handshake accepted; publishing allowed
    Connected,
    /// Connect sequence gave up
    Failed(FailReason),
}

/// Why the connect sequence failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FailReason {
    Dns,
    Timeout,
    Transport,
    /// Broker refused with this return code
    Refused(u8),
}

impl LinkState {
    /// A phase with a deadline is in progress
    pub fn is_pending(&self) -> bool {
        matches!(self, LinkState::ResolvingDns | LinkState::Connecting)
    }

    /// No further transitions happen from here
    pub fn is_terminal(&self) -> bool {
        matches!(self, LinkState::Connected | LinkState::Failed(_))
    }

    /// Process an event and return the next state
    pub fn transition(self, event: LinkEvent) -> Self {
        use LinkEvent::*;
        use LinkState::*;

        match (self, event) {
            (Idle, Start) => ResolvingDns,

            (ResolvingDns, DnsResolved) => Connecting,
            (ResolvingDns, DnsFailed) => Failed(FailReason::Dns),

            (Connecting, ConnAck(0)) => Connected,
            (Connecting, ConnAck(code)) => Failed(FailReason::Refused(code)),

            (ResolvingDns | Connecting, Timeout) => Failed(FailReason::Timeout),
            (ResolvingDns | Connecting, TransportError) => Failed(FailReason::Transport),

            // Terminal states and out-of-order events stay put
            _ => self,
        }
    }
}
