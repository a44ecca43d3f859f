//! luxd-core - color engine for the luxd lighting daemon
//!
//! This crate resolves textual color/program specs ("255,0,0", "#ff8800",
//! palette names, JSON arrays, sequence files, builtin generator names)
//! into [`Program`] state machines that produce one color per tick, or one
//! color per pixel for addressable LED stripes.
//!
//! It has no network or protocol knowledge; the `luxd-control` crate maps
//! programs onto DMX universes and ships them over ArtNet.

/// RGB color values
pub mod color;
/// Error types
pub mod error;
/// Compiled-in animation generators
pub mod generators;
/// Named color palette
pub mod palette;
/// Animation program state machines
pub mod program;
/// Textual spec resolution
pub mod resolver;

pub use color::Color;
pub use error::{EngineError, Result};
pub use palette::Palette;
pub use program::{Generator, Program, Sequence, StripeScroll};
pub use resolver::ProgramResolver;
