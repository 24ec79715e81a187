//! gatescript core - condition grammar for deployment action gates
//!
//! This crate provides the pieces that turn an expanded condition string
//! into a true/false verdict:
//! - Tokenizer and recursive-descent group parser
//! - `Group` / `Condition` tree types
//! - Leaf comparison reduction
//! - Error taxonomy

pub mod condition;
pub mod error;

// Re-export commonly used types
pub use condition::{
    evaluate, CompareType, CompoundGroup, Condition, ConditionParser, Connective, Group,
    GroupLink, Operator, DEFAULT_MAX_DEPTH, MAX_ALLOWED_DEPTH,
};
pub use error::{ErrorKind, Result, ScriptError};
