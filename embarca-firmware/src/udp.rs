//! Fire-and-forget UDP datagrams to a fixed server

use defmt::*;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpEndpoint, Stack};

use crate::NetError;

/// Socket buffers; must outlive the sender
pub struct UdpBuffers {
    rx_meta: [PacketMetadata; 1],
    rx: [u8; 64],
    tx_meta: [PacketMetadata; 4],
    tx: [u8; 512],
}

impl UdpBuffers {
    pub const fn new() -> Self {
        Self {
            rx_meta: [PacketMetadata::EMPTY; 1],
            rx: [0; 64],
            tx_meta: [PacketMetadata::EMPTY; 4],
            tx: [0; 512],
        }
    }
}

impl Default for UdpBuffers {
    fn default() -> Self {
        Self::new()
    }
}

/// Bound UDP socket aimed at one server
pub struct UdpSender<'a> {
    socket: UdpSocket<'a>,
    target: IpEndpoint,
}

impl<'a> UdpSender<'a> {
    /// Bind an ephemeral local port
    pub fn new(
        stack: Stack<'a>,
        buffers: &'a mut UdpBuffers,
        target: impl Into<IpEndpoint>,
    ) -> Result<Self, NetError> {
        let mut socket = UdpSocket::new(
            stack,
            &mut buffers.rx_meta,
            &mut buffers.rx,
            &mut buffers.tx_meta,
            &mut buffers.tx,
        );
        socket.bind(0).map_err(|_| NetError::Bind)?;

        let target = target.into();
        info!("UDP target {}", target);
        Ok(Self { socket, target })
    }

    /// Send one datagram
    pub async fn send(&mut self, payload: &[u8]) -> Result<(), NetError> {
        self.socket
            .send_to(payload, self.target)
            .await
            .map_err(|_| NetError::Transport)?;
        debug!("sent {} bytes", payload.len());
        Ok(())
    }
}
