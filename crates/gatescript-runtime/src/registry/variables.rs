//! Variable definitions

use super::flag;
use crate::host::{Host, SpecialFolder};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Zero-argument resolver for a runtime-defined variable
pub type VariableFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Variables every registry built with builtins provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinVariable {
    Is64BitOperatingSystem,
    Is64BitProcess,
    IsTaskSequence,
    ProgramFiles,
    ProgramFilesX86,
    CommonAppData,
    InstallDirectory,
    TempDirectory,
    CurrentDirectory,
    ComputerName,
    UserName,
    OperatingSystem,
}

impl BuiltinVariable {
    pub const ALL: [BuiltinVariable; 12] = [
        BuiltinVariable::Is64BitOperatingSystem,
        BuiltinVariable::Is64BitProcess,
        BuiltinVariable::IsTaskSequence,
        BuiltinVariable::ProgramFiles,
        BuiltinVariable::ProgramFilesX86,
        BuiltinVariable::CommonAppData,
        BuiltinVariable::InstallDirectory,
        BuiltinVariable::TempDirectory,
        BuiltinVariable::CurrentDirectory,
        BuiltinVariable::ComputerName,
        BuiltinVariable::UserName,
        BuiltinVariable::OperatingSystem,
    ];

    /// Name used in `$Name$` references
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinVariable::Is64BitOperatingSystem => "Is64BitOperatingSystem",
            BuiltinVariable::Is64BitProcess => "Is64BitProcess",
            BuiltinVariable::IsTaskSequence => "IsTaskSequence",
            BuiltinVariable::ProgramFiles => "ProgramFiles",
            BuiltinVariable::ProgramFilesX86 => "ProgramFilesX86",
            BuiltinVariable::CommonAppData => "CommonAppData",
            BuiltinVariable::InstallDirectory => "InstallDirectory",
            BuiltinVariable::TempDirectory => "TempDirectory",
            BuiltinVariable::CurrentDirectory => "CurrentDirectory",
            BuiltinVariable::ComputerName => "ComputerName",
            BuiltinVariable::UserName => "UserName",
            BuiltinVariable::OperatingSystem => "OperatingSystem",
        }
    }

    /// Resolve the variable; host failures resolve to an empty string
    pub fn resolve(&self, host: &dyn Host) -> String {
        match self {
            BuiltinVariable::Is64BitOperatingSystem => flag(host.is_64bit_os()),
            BuiltinVariable::Is64BitProcess => flag(cfg!(target_pointer_width = "64")),
            BuiltinVariable::IsTaskSequence => flag(host.is_task_sequence()),
            BuiltinVariable::ProgramFiles => folder(host, SpecialFolder::ProgramFiles),
            BuiltinVariable::ProgramFilesX86 => folder(host, SpecialFolder::ProgramFilesX86),
            BuiltinVariable::CommonAppData => folder(host, SpecialFolder::CommonAppData),
            BuiltinVariable::InstallDirectory => folder(host, SpecialFolder::InstallDirectory),
            BuiltinVariable::TempDirectory => folder(host, SpecialFolder::Temp),
            BuiltinVariable::CurrentDirectory => match host.current_dir() {
                Ok(path) => path.display().to_string(),
                Err(e) => {
                    debug!("Current directory lookup failed: {}", e);
                    String::new()
                }
            },
            BuiltinVariable::ComputerName => first_env(host, &["COMPUTERNAME", "HOSTNAME"]),
            BuiltinVariable::UserName => first_env(host, &["USERNAME", "USER"]),
            BuiltinVariable::OperatingSystem => host.os_name(),
        }
    }
}

fn folder(host: &dyn Host, folder: SpecialFolder) -> String {
    match host.special_folder(folder) {
        Ok(path) => path.display().to_string(),
        Err(e) => {
            debug!("{:?} lookup failed: {}", folder, e);
            String::new()
        }
    }
}

fn first_env(host: &dyn Host, names: &[&str]) -> String {
    names
        .iter()
        .find_map(|name| host.env_var(name))
        .unwrap_or_default()
}

/// A registered variable
#[derive(Clone)]
pub enum ScriptVariable {
    Builtin(BuiltinVariable),
    /// Fixed value supplied by configuration
    Static(String),
    /// Resolver supplied at runtime, e.g. backed by an external script host
    Dynamic(VariableFn),
}

impl ScriptVariable {
    pub fn dynamic<F>(resolver: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        ScriptVariable::Dynamic(Arc::new(resolver))
    }

    pub(crate) fn resolve(&self, host: &dyn Host) -> String {
        match self {
            ScriptVariable::Builtin(builtin) => builtin.resolve(host),
            ScriptVariable::Static(value) => value.clone(),
            ScriptVariable::Dynamic(resolver) => resolver(),
        }
    }
}

impl fmt::Debug for ScriptVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptVariable::Builtin(builtin) => f.debug_tuple("Builtin").field(builtin).finish(),
            ScriptVariable::Static(value) => f.debug_tuple("Static").field(value).finish(),
            ScriptVariable::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}
