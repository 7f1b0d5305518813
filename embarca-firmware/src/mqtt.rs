//! Publish-only MQTT session over plain TCP
//!
//! Connecting walks the link state machine: resolve the broker, open the
//! socket, then run the `rust-mqtt` handshake. Each phase runs against the
//! deadline the machine armed for it, and any failure is terminal.

use defmt::*;
use embassy_net::dns::DnsQueryType;
use embassy_net::tcp::TcpSocket;
use embassy_net::{IpEndpoint, Stack};
use embassy_time::{with_timeout, Duration};
use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::packet::v5::reason_codes::ReasonCode;
use rust_mqtt::utils::rng_generator::CountingRng;

use embarca_core::link::{LinkContext, LinkEvent, LinkState, LinkTimeouts};

use crate::{config, now_ms, NetError};

const TCP_BUF_SIZE: usize = 512;

/// Largest MQTT packet sent or received
const PACKET_BUF_SIZE: usize = 256;

/// Property slots per packet
const MAX_PROPERTIES: usize = 5;

type Client<'a> = MqttClient<'a, TcpSocket<'a>, MAX_PROPERTIES, CountingRng>;

/// Broker and session parameters
#[derive(Clone, Copy)]
pub struct MqttConfig {
    pub broker_host: &'static str,
    pub broker_port: u16,
    pub client_id: &'static str,
    pub keep_alive_secs: u16,
    pub topic: &'static str,
    pub timeouts: LinkTimeouts,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: config::mqtt::BROKER_HOST,
            broker_port: config::mqtt::BROKER_PORT,
            client_id: config::mqtt::CLIENT_ID,
            keep_alive_secs: config::mqtt::KEEP_ALIVE_SECS,
            topic: config::mqtt::TOPIC,
            timeouts: LinkTimeouts::default(),
        }
    }
}

/// Socket and packet buffers; must outlive the session
pub struct MqttBuffers {
    tcp_rx: [u8; TCP_BUF_SIZE],
    tcp_tx: [u8; TCP_BUF_SIZE],
    packet_rx: [u8; PACKET_BUF_SIZE],
    packet_tx: [u8; PACKET_BUF_SIZE],
}

impl MqttBuffers {
    pub const fn new() -> Self {
        Self {
            tcp_rx: [0; TCP_BUF_SIZE],
            tcp_tx: [0; TCP_BUF_SIZE],
            packet_rx: [0; PACKET_BUF_SIZE],
            packet_tx: [0; PACKET_BUF_SIZE],
        }
    }
}

impl Default for MqttBuffers {
    fn default() -> Self {
        Self::new()
    }
}

enum Transport<'a> {
    /// Socket not yet opened
    Ready {
        socket: TcpSocket<'a>,
        packet_rx: &'a mut [u8],
        packet_tx: &'a mut [u8],
    },
    Open(Client<'a>),
    /// Consumed by a failed connect
    Closed,
}

/// One broker connection and its link state
pub struct MqttSession<'a> {
    stack: Stack<'a>,
    transport: Transport<'a>,
    link: LinkContext,
    config: MqttConfig,
}

impl<'a> MqttSession<'a> {
    pub fn new(stack: Stack<'a>, buffers: &'a mut MqttBuffers, config: MqttConfig) -> Self {
        let MqttBuffers {
            tcp_rx,
            tcp_tx,
            packet_rx,
            packet_tx,
        } = buffers;

        Self {
            stack,
            transport: Transport::Ready {
                socket: TcpSocket::new(stack, tcp_rx, tcp_tx),
                packet_rx,
                packet_tx,
            },
            link: LinkContext::new(config.timeouts),
            config,
        }
    }

    pub fn state(&self) -> LinkState {
        self.link.state()
    }

    /// Time left before the pending phase fails
    fn budget(&self) -> Duration {
        Duration::from_millis(self.link.remaining_ms(now_ms()).unwrap_or(0))
    }

    /// Record a failure event and hand back the matching error
    fn fail(&mut self, event: LinkEvent, error: NetError) -> NetError {
        let state = self.link.handle(event, now_ms());
        error!("MQTT connect failed: {} ({})", error, state);
        error
    }

    /// A phase budget ran out: let the link raise its own timeout
    fn timed_out(&mut self) -> NetError {
        let mut state = self.link.poll(now_ms());
        if state.is_pending() {
            // Budget rounding can wake us a tick early
            state = self.link.handle(LinkEvent::Timeout, now_ms());
        }
        error!("MQTT connect timed out ({})", state);
        NetError::Timeout
    }

    /// Resolve, connect and handshake with the broker
    pub async fn connect(&mut self) -> Result<(), NetError> {
        let (socket, packet_rx, packet_tx) =
            match core::mem::replace(&mut self.transport, Transport::Closed) {
                Transport::Ready {
                    socket,
                    packet_rx,
                    packet_tx,
                } => (socket, packet_rx, packet_tx),
                other => {
                    self.transport = other;
                    warn!("MQTT session already used ({})", self.link.state());
                    return Err(NetError::Transport);
                }
            };

        info!(
            "Connecting to MQTT broker {}:{}",
            self.config.broker_host, self.config.broker_port
        );
        self.link.handle(LinkEvent::Start, now_ms());

        // DNS
        let budget = self.budget();
        let address = match with_timeout(
            budget,
            self.stack.dns_query(self.config.broker_host, DnsQueryType::A),
        )
        .await
        {
            Ok(Ok(addrs)) => match addrs.first().copied() {
                Some(addr) => addr,
                None => return Err(self.fail(LinkEvent::DnsFailed, NetError::Dns)),
            },
            Ok(Err(_)) => return Err(self.fail(LinkEvent::DnsFailed, NetError::Dns)),
            Err(_) => return Err(self.timed_out()),
        };
        info!("Resolved {} to {}", self.config.broker_host, address);
        self.link.handle(LinkEvent::DnsResolved, now_ms());

        // TCP + MQTT handshake
        let endpoint = IpEndpoint::new(address, self.config.broker_port);
        let budget = self.budget();
        let result = with_timeout(
            budget,
            handshake(socket, packet_rx, packet_tx, endpoint, &self.config),
        )
        .await;

        let client = match result {
            Ok(Ok(client)) => client,
            Ok(Err(LinkEvent::ConnAck(code))) => {
                return Err(self.fail(LinkEvent::ConnAck(code), NetError::Refused(code)))
            }
            Ok(Err(event)) => return Err(self.fail(event, NetError::Transport)),
            Err(_) => return Err(self.timed_out()),
        };

        if self.link.handle(LinkEvent::handshake(Ok(())), now_ms()) != LinkState::Connected {
            return Err(NetError::Transport);
        }
        self.transport = Transport::Open(client);

        info!("MQTT connected");
        Ok(())
    }

    /// Publish at QoS 0 to the configured topic
    ///
    /// Does nothing but log unless the link is connected.
    pub async fn publish(&mut self, payload: &[u8]) -> Result<(), NetError> {
        let client = match &mut self.transport {
            Transport::Open(client) if self.link.can_publish() => client,
            _ => {
                warn!("Publish skipped, link is {}", self.link.state());
                return Ok(());
            }
        };

        client
            .send_message(self.config.topic, payload, QualityOfService::QoS0, false)
            .await
            .map_err(|reason| {
                let code: u8 = reason.into();
                warn!("Publish failed, reason 0x{:02x}", code);
                NetError::Publish(code)
            })?;

        info!("Published {} bytes to {}", payload.len(), self.config.topic);
        Ok(())
    }
}

/// Open the socket and run CONNECT/CONNACK
///
/// On failure returns the link event to apply.
async fn handshake<'a>(
    mut socket: TcpSocket<'a>,
    packet_rx: &'a mut [u8],
    packet_tx: &'a mut [u8],
    endpoint: IpEndpoint,
    config: &MqttConfig,
) -> Result<Client<'a>, LinkEvent> {
    socket.connect(endpoint).await.map_err(|e| {
        warn!("TCP connect error: {}", e);
        LinkEvent::TransportError
    })?;
    debug!("TCP connected to {}", endpoint);

    let mut client_config = ClientConfig::new(MqttVersion::MQTTv5, CountingRng(20_000));
    client_config.add_client_id(config.client_id);
    client_config.keep_alive = config.keep_alive_secs;
    client_config.max_packet_size = PACKET_BUF_SIZE as u32;

    let rx_len = packet_rx.len();
    let tx_len = packet_tx.len();
    let mut client = MqttClient::new(socket, packet_tx, tx_len, packet_rx, rx_len, client_config);

    match client.connect_to_broker().await {
        Ok(()) => Ok(client),
        Err(ReasonCode::NetworkError) => Err(LinkEvent::TransportError),
        Err(reason) => Err(LinkEvent::handshake(Err(reason.into()))),
    }
}
