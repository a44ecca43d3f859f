//! Static configuration consumed by the controller and transport
//!
//! Built once at startup (the binary crate parses it from TOML) and passed
//! by ownership into [`crate::ArtNetTransport`] and
//! [`crate::LightController`]; there is no global mutable state.

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use crate::artnet::ARTNET_PORT;

/// ArtNet transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Destination addresses per universe id
    pub destinations: HashMap<u16, Vec<SocketAddr>>,
    /// How long to yield to a universe after third-party traffic was seen
    pub quiet_window: Duration,
    /// Local address the passive listener binds to
    pub bind_addr: SocketAddr,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            destinations: HashMap::new(),
            quiet_window: Duration::from_secs(10),
            bind_addr: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, ARTNET_PORT)),
        }
    }
}

/// Controller configuration.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Interval between animation ticks
    pub tick_interval: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(10),
        }
    }
}
