//! luxd-control - DMX addressing, orchestration and ArtNet transport
//!
//! This crate maps logical fixtures (lamps, multi-universe LED stripes)
//! onto DMX channel buffers, drives their animation programs from a
//! fixed-rate tick loop and ships the resulting universes over ArtNet.
//! It also runs a passive listener that yields to and relays genuine
//! third-party ArtNet traffic.
//!
//! ## Modules
//!
//! - [`fixture`] - lamps, stripes and their channel math
//! - [`registry`] - fixture id registry
//! - [`universe`] - per-universe channel buffers
//! - [`controller`] - the orchestrator and its tick loop
//! - [`artnet`] - wire encoding, quiet-time gating, passive forwarding
//! - [`config`] - configuration structs
//! - [`error`] - error types

/// ArtNet wire protocol and transport
pub mod artnet;
/// Configuration structs
pub mod config;
/// The control orchestrator
pub mod controller;
/// Error types
pub mod error;
/// Fixtures and channel mapping
pub mod fixture;
/// Fixture registry
pub mod registry;
/// DMX universe buffers
pub mod universe;

pub use artnet::{build_dmx_packet, peek_universe, ArtNetTransport, ARTNET_PORT};
pub use config::{ControllerConfig, TransportConfig};
pub use controller::LightController;
pub use error::{ControlError, Result};
pub use fixture::{Fixture, Lamp, Stripe, StripeSegment, UniverseSpan, PIXELS_PER_UNIVERSE};
pub use registry::FixtureRegistry;
pub use universe::Universe;
