//! Reference registry module
//!
//! Holds the variables and functions that `$...$` references resolve to.

mod functions;
mod registry;
mod variables;

// Re-export public types
pub use functions::{BuiltinFunction, FunctionFn, ScriptFunction};
pub use registry::ScriptRegistry;
pub use variables::{BuiltinVariable, ScriptVariable, VariableFn};

/// Canonical text for a true boolean result
pub const TRUE: &str = "1";
/// Canonical text for a false boolean result
pub const FALSE: &str = "0";

pub(crate) fn flag(value: bool) -> String {
    let text = if value { TRUE } else { FALSE };
    text.to_string()
}
