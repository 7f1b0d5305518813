//! Broker link lifecycle
//!
//! The connect sequence (resolve host, open transport, handshake) is an
//! explicit state machine. `LinkContext` pairs it with the deadline of the
//! phase in progress so a stalled phase fails instead of spinning.

pub mod events;
pub mod machine;

pub use events::LinkEvent;
pub use machine::{FailReason, LinkState};

/// Default bound on DNS resolution
pub const DNS_TIMEOUT_MS: u64 = 10_000;

/// Default bound on transport connect plus handshake
pub const CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Per-phase timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkTimeouts {
    pub dns_ms: u64,
    pub connect_ms: u64,
}

impl Default for LinkTimeouts {
    fn default() -> Self {
        Self {
            dns_ms: DNS_TIMEOUT_MS,
            connect_ms: CONNECT_TIMEOUT_MS,
        }
    }
}

/// Link state plus the deadline of the pending phase
#[derive(Debug, Clone)]
pub struct LinkContext {
    state: LinkState,
    timeouts: LinkTimeouts,
    /// Absolute time (ms) at which the pending phase times out
    deadline_ms: Option<u64>,
}

impl Default for LinkContext {
    fn default() -> Self {
        Self::new(LinkTimeouts::default())
    }
}

impl LinkContext {
    pub fn new(timeouts: LinkTimeouts) -> Self {
        Self {
            state: LinkState::Idle,
            timeouts,
            deadline_ms: None,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Milliseconds left in the pending phase, if any
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.deadline_ms.map(|d| d.saturating_sub(now_ms))
    }

    /// Only a completed handshake allows publishing
    pub fn can_publish(&self) -> bool {
        self.state == LinkState::Connected
    }

    /// Apply an event at `now_ms`, arming the deadline of a newly entered phase
    pub fn handle(&mut self, event: LinkEvent, now_ms: u64) -> LinkState {
        let prev = self.state;
        let next = prev.transition(event);

        if next != prev {
            self.deadline_ms = match next {
                LinkState::ResolvingDns => Some(now_ms + self.timeouts.dns_ms),
                LinkState::Connecting => Some(now_ms + self.timeouts.connect_ms),
                _ => None,
            };
            #[cfg(feature = "defmt")]
            defmt::debug!("link: {} -> {}", prev, next);
        }

        self.state = next;
        next
    }

    /// Raise `Timeout` if the pending phase has overrun its deadline
    ///
    /// Callers that await a phase under its budget call this once the budget elapses.
    pub fn poll(&mut self, now_ms: u64) -> LinkState {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => self.handle(LinkEvent::Timeout, now_ms),
            _ => self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut link = LinkContext::default();
        assert!(!link.can_publish());

        link.handle(LinkEvent::Start, 0);
        assert_eq!(link.deadline_ms(), Some(DNS_TIMEOUT_MS));

        link.handle(LinkEvent::DnsResolved, 300);
        assert_eq!(link.state(), LinkState::Connecting);
        assert_eq!(link.deadline_ms(), Some(300 + CONNECT_TIMEOUT_MS));

        link.handle(LinkEvent::ConnAck(0), 900);
        assert_eq!(link.state(), LinkState::Connected);
        assert_eq!(link.deadline_ms(), None);
        assert!(link.can_publish());
    }

    #[test]
    fn test_poll_before_deadline_is_noop() {
        let mut link = LinkContext::default();
        link.handle(LinkEvent::Start, 1_000);
        assert_eq!(link.poll(1_000 + DNS_TIMEOUT_MS - 1), LinkState::ResolvingDns);
        assert_eq!(link.remaining_ms(1_000 + DNS_TIMEOUT_MS - 1), Some(1));
    }

    #[test]
    fn test_dns_timeout() {
        let mut link = LinkContext::default();
        link.handle(LinkEvent::Start, 0);
        assert_eq!(
            link.poll(DNS_TIMEOUT_MS),
            LinkState::Failed(FailReason::Timeout)
        );
        assert!(!link.can_publish());
        assert_eq!(link.deadline_ms(), None);
    }

    #[test]
    fn test_connect_timeout_uses_own_budget() {
        let mut link = LinkContext::new(LinkTimeouts {
            dns_ms: 100,
            connect_ms: 5_000,
        });
        link.handle(LinkEvent::Start, 0);
        link.handle(LinkEvent::DnsResolved, 50);
        // Past the DNS budget but inside the connect one
        assert_eq!(link.poll(1_000), LinkState::Connecting);
        assert_eq!(link.poll(5_050), LinkState::Failed(FailReason::Timeout));
    }

    #[test]
    fn test_idle_and_connected_never_time_out() {
        let mut link = LinkContext::default();
        assert_eq!(link.poll(u64::MAX), LinkState::Idle);

        link.handle(LinkEvent::Start, 0);
        link.handle(LinkEvent::DnsResolved, 0);
        link.handle(LinkEvent::ConnAck(0), 0);
        assert_eq!(link.poll(u64::MAX), LinkState::Connected);
    }

    #[test]
    fn test_refused_connack() {
        let mut link = LinkContext::default();
        link.handle(LinkEvent::Start, 0);
        link.handle(LinkEvent::DnsResolved, 0);
        assert_eq!(
            link.handle(LinkEvent::ConnAck(5), 0),
            LinkState::Failed(FailReason::Refused(5))
        );
    }
}
