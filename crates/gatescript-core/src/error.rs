//! Error types for condition parsing

use serde::Serialize;
use thiserror::Error;

/// Condition parse error
///
/// Every variant is fatal to a single parse/evaluate call. Numeric conversion
/// failures during leaf reduction are not errors; they reduce to `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Unterminated quoted operand
    #[error("Invalid string at position {position}: {message}")]
    InvalidString { position: usize, message: String },

    /// Malformed comparison operator token
    #[error("Invalid operator at position {position}: {message}")]
    InvalidOperator { position: usize, message: String },

    /// Structural problem with a condition (stray connective, extra operands, leftover text)
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    /// Group with no content, mixed content or broken links
    #[error("Invalid group: {0}")]
    InvalidGroup(String),

    /// Group nesting exceeded the configured limit
    #[error("Group nesting exceeds the maximum depth of {max}")]
    NestingTooDeep { max: usize },
}

/// Discriminant of [`ScriptError`] for callers that branch on the failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidString,
    InvalidOperator,
    InvalidCondition,
    InvalidGroup,
    NestingTooDeep,
}

impl ScriptError {
    /// The kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScriptError::InvalidString { .. } => ErrorKind::InvalidString,
            ScriptError::InvalidOperator { .. } => ErrorKind::InvalidOperator,
            ScriptError::InvalidCondition(_) => ErrorKind::InvalidCondition,
            ScriptError::InvalidGroup(_) => ErrorKind::InvalidGroup,
            ScriptError::NestingTooDeep { .. } => ErrorKind::NestingTooDeep,
        }
    }

    pub(crate) fn invalid_string(position: usize, message: impl Into<String>) -> Self {
        ScriptError::InvalidString {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_operator(position: usize, message: impl Into<String>) -> Self {
        ScriptError::InvalidOperator {
            position,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::InvalidString => "invalid string",
            ErrorKind::InvalidOperator => "invalid operator",
            ErrorKind::InvalidCondition => "invalid condition",
            ErrorKind::InvalidGroup => "invalid group",
            ErrorKind::NestingTooDeep => "nesting too deep",
        };
        f.write_str(name)
    }
}

/// Result type for condition operations
pub type Result<T> = std::result::Result<T, ScriptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(
            ScriptError::invalid_string(3, "unterminated").kind(),
            ErrorKind::InvalidString
        );
        assert_eq!(
            ScriptError::invalid_operator(0, "bad").kind(),
            ErrorKind::InvalidOperator
        );
        assert_eq!(
            ScriptError::InvalidCondition("x".to_string()).kind(),
            ErrorKind::InvalidCondition
        );
        assert_eq!(
            ScriptError::InvalidGroup("x".to_string()).kind(),
            ErrorKind::InvalidGroup
        );
        assert_eq!(
            ScriptError::NestingTooDeep { max: 4 }.kind(),
            ErrorKind::NestingTooDeep
        );
    }

    #[test]
    fn test_error_display() {
        let error = ScriptError::invalid_string(7, "unterminated string");
        assert_eq!(
            error.to_string(),
            "Invalid string at position 7: unterminated string"
        );

        let error = ScriptError::NestingTooDeep { max: 32 };
        assert!(error.to_string().contains("32"));
        assert_eq!(ErrorKind::InvalidGroup.to_string(), "invalid group");
    }
}
