//! Error types for the color engine

use std::path::PathBuf;
use thiserror::Error;

/// Color engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// A spec string matched none of the resolution rules
    #[error("unknown color spec: {0:?}")]
    InvalidColorSpec(String),

    /// A sequence program resolved to zero usable colors
    #[error("program {0:?} contains no usable colors")]
    EmptyProgram(String),

    /// A program name resolved to a file outside the program directory
    #[error("program path {0:?} escapes the program directory")]
    PathTraversal(PathBuf),

    /// I/O error while reading palette or program files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for color engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
