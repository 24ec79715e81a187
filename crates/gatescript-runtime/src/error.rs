//! Runtime error types

use thiserror::Error;

/// Runtime error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Variable or function name that cannot appear in a reference
    #[error("Invalid reference name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
