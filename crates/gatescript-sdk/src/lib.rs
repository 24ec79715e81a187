//! gatescript SDK
//!
//! High-level API for gating deployment actions on condition strings.
//!
//! ```rust,ignore
//! use gatescript_sdk::ScriptEngineBuilder;
//!
//! let engine = ScriptEngineBuilder::new()
//!     .with_variable("Ring", "pilot")
//!     .build()?;
//!
//! if engine.check("('$Ring$' == 'pilot')")? {
//!     // run the action
//! }
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;

// Re-export main types
pub use builder::ScriptEngineBuilder;
pub use config::EngineConfig;
pub use engine::{shared_engine, ScriptEngine};
pub use error::{Result, SdkError};

// Re-export commonly used types from dependencies
pub use gatescript_core::{ErrorKind, Group, ScriptError};
pub use gatescript_runtime::{Host, ScriptRegistry, SystemHost};
