//! ArtNet transport
//!
//! ArtDmx wire encoding, quiet-time collision avoidance and passive
//! forwarding of third-party traffic. The daemon shares its network with
//! genuine lighting consoles: a universe that recently carried real
//! ArtNet frames is left alone until the quiet window elapses.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use tracing::{trace, warn};

use crate::config::TransportConfig;
use crate::error::{ControlError, Result};

/// Standard ArtNet UDP port
pub const ARTNET_PORT: u16 = 6454;

/// Offset where channel data starts in an ArtDmx packet
pub const HEADER_LEN: usize = 18;

/// Build an ArtDmx packet for one universe's channel buffer.
///
/// Layout: `Art-Net\0`, OpDmx (0x5000, little-endian), protocol version
/// 14 (big-endian), zeroed sequence and physical bytes, universe
/// (little-endian), channel count (big-endian), channel data.
pub fn build_dmx_packet(universe: u16, channels: &[u8]) -> Vec<u8> {
    let mut packet = vec![0u8; HEADER_LEN + channels.len()];
    packet[0..8].copy_from_slice(b"Art-Net\0");
    packet[8..10].copy_from_slice(&0x5000u16.to_le_bytes());
    packet[10..12].copy_from_slice(&14u16.to_be_bytes());
    // Bytes 12 (sequence) and 13 (physical) stay zero.
    packet[14..16].copy_from_slice(&universe.to_le_bytes());
    packet[16..18].copy_from_slice(&(channels.len() as u16).to_be_bytes());
    packet[HEADER_LEN..].copy_from_slice(channels);
    packet
}

/// Extract the universe id of an inbound ArtNet datagram.
pub fn peek_universe(datagram: &[u8]) -> Result<u16> {
    if datagram.len() < HEADER_LEN {
        return Err(ControlError::MalformedPacket(datagram.len()));
    }
    Ok(u16::from_le_bytes([datagram[14], datagram[15]]))
}

/// Sends universe buffers to configured destinations and relays
/// third-party frames.
///
/// Owned by the controller and mutated only under its lock.
pub struct ArtNetTransport {
    config: TransportConfig,
    /// When each universe last carried third-party traffic
    last_seen: HashMap<u16, Instant>,
    /// Lazily bound send socket per (universe, destination index)
    sockets: HashMap<(u16, usize), UdpSocket>,
    /// Socket used for relaying third-party datagrams
    forward_socket: UdpSocket,
}

impl ArtNetTransport {
    /// Create a transport; binds the forwarding socket to an ephemeral port
    pub fn new(config: TransportConfig) -> Result<Self> {
        let forward_socket = UdpSocket::bind(("0.0.0.0", 0))?;
        Ok(Self {
            config,
            last_seen: HashMap::new(),
            sockets: HashMap::new(),
            forward_socket,
        })
    }

    /// Address the passive listener should bind to
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// The configured quiet window
    pub fn quiet_window(&self) -> Duration {
        self.config.quiet_window
    }

    /// Record third-party activity on a universe
    pub fn note_activity(&mut self, universe: u16, when: Instant) {
        self.last_seen.insert(universe, when);
    }

    /// When a universe last carried third-party traffic
    pub fn last_activity(&self, universe: u16) -> Option<Instant> {
        self.last_seen.get(&universe).copied()
    }

    /// Send a universe buffer unless the universe recently carried real
    /// traffic or has no destinations. Returns whether a send happened.
    pub fn maybe_send(&mut self, universe: u16, channels: &[u8], now: Instant) -> Result<bool> {
        if let Some(seen) = self.last_seen.get(&universe) {
            if now.duration_since(*seen) < self.config.quiet_window {
                trace!(universe, "holding back, universe recently active");
                return Ok(false);
            }
        }
        let destinations = match self.config.destinations.get(&universe) {
            Some(destinations) if !destinations.is_empty() => destinations.clone(),
            _ => return Ok(false),
        };

        let packet = build_dmx_packet(universe, channels);
        for (index, addr) in destinations.iter().enumerate() {
            let socket = self.socket_for(universe, index)?;
            if let Err(err) = socket.send_to(&packet, addr) {
                warn!(universe, %addr, %err, "failed to send ArtNet frame");
            }
        }
        trace!(universe, channels = channels.len(), "sent ArtNet frame");
        Ok(true)
    }

    /// Relay a third-party datagram unmodified to the universe's
    /// destinations.
    pub fn forward(&self, universe: u16, datagram: &[u8]) {
        let Some(destinations) = self.config.destinations.get(&universe) else {
            return;
        };
        for addr in destinations {
            if let Err(err) = self.forward_socket.send_to(datagram, addr) {
                warn!(universe, %addr, %err, "failed to forward ArtNet frame");
            }
        }
    }

    // A distinct local port per destination keeps the retransmission
    // streams apart on the receiving side.
    fn socket_for(&mut self, universe: u16, index: usize) -> Result<&UdpSocket> {
        match self.sockets.entry((universe, index)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let socket = UdpSocket::bind(("0.0.0.0", 0))?;
                Ok(entry.insert(socket))
            }
        }
    }
}
