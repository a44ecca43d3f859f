//! Daemon configuration file
//!
//! One TOML file describes the fixture table, the destination addresses
//! per universe, the message-bus connection and the timing knobs. It is
//! parsed once at startup and handed into the controller and transport as
//! explicit structs.

use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use luxd_control::{ControllerConfig, TransportConfig};

/// Top-level daemon configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Milliseconds between animation ticks
    #[serde(default = "default_tick_ms")]
    pub tick_interval_ms: u64,
    /// Seconds to yield to a universe after third-party traffic
    #[serde(default = "default_quiet_secs")]
    pub quiet_window_secs: u64,
    /// Address the passive ArtNet listener binds to
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    /// Palette file with `name #RRGGBB` lines
    pub palette_file: PathBuf,
    /// Directory searched for sequence program files
    #[serde(default)]
    pub programs_dir: Option<PathBuf>,
    /// Message-bus connection
    pub mqtt: MqttConfig,
    /// Destination addresses per universe
    #[serde(default)]
    pub universes: Vec<UniverseConfig>,
    /// Fixture table
    #[serde(default)]
    pub fixtures: Vec<FixtureConfig>,
}

/// MQTT broker connection and topic layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MqttConfig {
    pub host: String,
    #[serde(default = "default_mqtt_port")]
    pub port: u16,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Commands arrive on `<topic_prefix>/<fixture id>` and
    /// `<topic_prefix>/control`
    pub topic_prefix: String,
}

/// Destinations for one universe id.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UniverseConfig {
    pub id: u16,
    pub destinations: Vec<SocketAddr>,
}

/// One fixture table entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FixtureConfig {
    /// Single-color lamp at one DMX address
    Lamp {
        id: u32,
        universe: u16,
        address: usize,
        default: String,
    },
    /// Addressable LED stripe spanning consecutive universes
    Stripe {
        id: u32,
        start_universe: u16,
        pixels: usize,
        default: String,
    },
}

impl Config {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            bail!("tick_interval_ms must be positive");
        }
        for fixture in &self.fixtures {
            if let FixtureConfig::Lamp { id, address, .. } = fixture {
                // address+3 must stay inside the 512-channel universe
                if *address < 1 || *address > 508 {
                    bail!("fixture {id}: lamp address {address} outside 1..=508");
                }
            }
            if let FixtureConfig::Stripe { id, pixels, .. } = fixture {
                if *pixels == 0 {
                    bail!("fixture {id}: stripe needs at least one pixel");
                }
            }
        }
        Ok(())
    }

    /// Controller timing configuration
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
        }
    }

    /// Transport configuration with the destination map
    pub fn transport_config(&self) -> TransportConfig {
        let mut destinations: HashMap<u16, Vec<SocketAddr>> = HashMap::new();
        for universe in &self.universes {
            destinations
                .entry(universe.id)
                .or_default()
                .extend(universe.destinations.iter().copied());
        }
        TransportConfig {
            destinations,
            quiet_window: Duration::from_secs(self.quiet_window_secs),
            bind_addr: self.listen,
        }
    }
}

fn default_tick_ms() -> u64 {
    10
}

fn default_quiet_secs() -> u64 {
    10
}

fn default_listen() -> SocketAddr {
    "0.0.0.0:6454".parse().expect("valid default listen address")
}

fn default_mqtt_port() -> u16 {
    1883
}

fn default_client_id() -> String {
    "luxd".to_string()
}
