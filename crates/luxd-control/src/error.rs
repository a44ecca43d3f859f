//! Error types for the control system

use thiserror::Error;

/// Control system errors
#[derive(Error, Debug)]
pub enum ControlError {
    /// Operation on a fixture id nobody registered
    #[error("no fixture registered with id {0}")]
    UnknownFixture(u32),

    /// A fixture id was registered twice
    #[error("fixture id {0} is already registered")]
    DuplicateFixture(u32),

    /// A fixture definition that cannot map onto DMX channels
    #[error("invalid fixture definition: {0}")]
    InvalidFixture(String),

    /// Color engine error
    #[error("color engine error: {0}")]
    Engine(#[from] luxd_core::EngineError),

    /// Inbound datagram too short to carry an ArtNet header
    #[error("datagram too short for an ArtNet header ({0} bytes)")]
    MalformedPacket(usize),

    /// Socket failure
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

/// Result type for control operations
pub type Result<T> = std::result::Result<T, ControlError>;
