//! gatescript runtime - reference resolution for condition text
//!
//! This crate expands `$Variable$` and `$Function(args)$` references in raw
//! text before it reaches the condition parser. Variables and functions live
//! in an explicit [`ScriptRegistry`]; anything touching the operating system
//! goes through the [`Host`] trait.

pub mod error;
pub mod host;
pub mod preprocess;
pub mod registry;

// Re-export main types
pub use error::{Result, RuntimeError};
pub use host::{Host, HostError, SpecialFolder, SystemHost};
pub use preprocess::Preprocessor;
pub use registry::{
    BuiltinFunction, BuiltinVariable, FunctionFn, ScriptFunction, ScriptRegistry, ScriptVariable,
    VariableFn,
};
