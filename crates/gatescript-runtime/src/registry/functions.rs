//! Function definitions
//!
//! Boolean functions answer `"1"` / `"0"` and fail to `"0"`; value
//! functions answer the raw value and fail to `""`. None of them panic or
//! propagate errors to the preprocessor.

use super::{flag, FALSE};
use crate::host::Host;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Callable for a runtime-defined function
pub type FunctionFn = Arc<dyn Fn(&[String]) -> String + Send + Sync>;

/// Functions every registry built with builtins provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFunction {
    /// `FileExists(path)`
    FileExists,
    /// `DirectoryExists(path)`
    DirectoryExists,
    /// `CreateDirectory(path)` creates the directory and its parents
    CreateDirectory,
    /// `EnvironmentVariable(name)`
    EnvironmentVariable,
    /// `CombinePath(base, part, ...)`
    CombinePath,
    ToUpper,
    ToLower,
    /// `Contains(text, fragment)`
    Contains,
    StartsWith,
    EndsWith,
}

impl BuiltinFunction {
    pub const ALL: [BuiltinFunction; 10] = [
        BuiltinFunction::FileExists,
        BuiltinFunction::DirectoryExists,
        BuiltinFunction::CreateDirectory,
        BuiltinFunction::EnvironmentVariable,
        BuiltinFunction::CombinePath,
        BuiltinFunction::ToUpper,
        BuiltinFunction::ToLower,
        BuiltinFunction::Contains,
        BuiltinFunction::StartsWith,
        BuiltinFunction::EndsWith,
    ];

    /// Name used in `$Name(args)$` references
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinFunction::FileExists => "FileExists",
            BuiltinFunction::DirectoryExists => "DirectoryExists",
            BuiltinFunction::CreateDirectory => "CreateDirectory",
            BuiltinFunction::EnvironmentVariable => "EnvironmentVariable",
            BuiltinFunction::CombinePath => "CombinePath",
            BuiltinFunction::ToUpper => "ToUpper",
            BuiltinFunction::ToLower => "ToLower",
            BuiltinFunction::Contains => "Contains",
            BuiltinFunction::StartsWith => "StartsWith",
            BuiltinFunction::EndsWith => "EndsWith",
        }
    }

    /// Returns true for functions answering `"1"` / `"0"`
    pub fn is_boolean(&self) -> bool {
        matches!(
            self,
            BuiltinFunction::FileExists
                | BuiltinFunction::DirectoryExists
                | BuiltinFunction::CreateDirectory
                | BuiltinFunction::Contains
                | BuiltinFunction::StartsWith
                | BuiltinFunction::EndsWith
        )
    }

    fn required_arguments(&self) -> usize {
        match self {
            BuiltinFunction::Contains
            | BuiltinFunction::StartsWith
            | BuiltinFunction::EndsWith => 2,
            _ => 1,
        }
    }

    fn failure(&self) -> String {
        if self.is_boolean() {
            FALSE.to_string()
        } else {
            String::new()
        }
    }

    /// Invoke the function
    pub fn call(&self, host: &dyn Host, args: &[String]) -> String {
        let required = self.required_arguments();
        if args.len() < required || args[..required].iter().any(|arg| arg.is_empty()) {
            debug!(
                "{} needs {} non-empty argument(s), got {:?}",
                self.name(),
                required,
                args
            );
            return self.failure();
        }

        match self {
            BuiltinFunction::FileExists => flag(host.is_file(Path::new(&args[0]))),
            BuiltinFunction::DirectoryExists => flag(host.is_dir(Path::new(&args[0]))),
            BuiltinFunction::CreateDirectory => {
                let path = Path::new(&args[0]);
                match host.create_dir_all(path) {
                    Ok(()) => flag(host.is_dir(path)),
                    Err(e) => {
                        warn!("Failed to create directory {}: {}", path.display(), e);
                        self.failure()
                    }
                }
            }
            BuiltinFunction::EnvironmentVariable => host.env_var(&args[0]).unwrap_or_default(),
            BuiltinFunction::CombinePath => args
                .iter()
                .fold(PathBuf::new(), |path, part| path.join(part))
                .display()
                .to_string(),
            BuiltinFunction::ToUpper => args[0].to_uppercase(),
            BuiltinFunction::ToLower => args[0].to_lowercase(),
            BuiltinFunction::Contains => flag(args[0].contains(args[1].as_str())),
            BuiltinFunction::StartsWith => flag(args[0].starts_with(args[1].as_str())),
            BuiltinFunction::EndsWith => flag(args[0].ends_with(args[1].as_str())),
        }
    }
}

/// A registered function
#[derive(Clone)]
pub enum ScriptFunction {
    Builtin(BuiltinFunction),
    /// Callable supplied at runtime; must not panic
    Custom(FunctionFn),
}

impl ScriptFunction {
    pub fn custom<F>(function: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        ScriptFunction::Custom(Arc::new(function))
    }

    pub(crate) fn call(&self, host: &dyn Host, args: &[String]) -> String {
        match self {
            ScriptFunction::Builtin(builtin) => builtin.call(host, args),
            ScriptFunction::Custom(function) => function(args),
        }
    }
}

impl fmt::Debug for ScriptFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptFunction::Builtin(builtin) => f.debug_tuple("Builtin").field(builtin).finish(),
            ScriptFunction::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
