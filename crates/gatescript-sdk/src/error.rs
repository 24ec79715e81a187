//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Condition parse error
    #[error("Condition error: {0}")]
    ScriptError(#[from] gatescript_core::ScriptError),

    /// Registry error
    #[error("Runtime error: {0}")]
    RuntimeError(#[from] gatescript_runtime::RuntimeError),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SdkError {
    /// The condition error kind, when this error came from parsing a condition
    pub fn script_error_kind(&self) -> Option<gatescript_core::ErrorKind> {
        match self {
            SdkError::ScriptError(e) => Some(e.kind()),
            _ => None,
        }
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
