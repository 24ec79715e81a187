//! Script registry implementation

use super::functions::{BuiltinFunction, ScriptFunction};
use super::variables::{BuiltinVariable, ScriptVariable};
use crate::error::{Result, RuntimeError};
use crate::host::Host;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Characters that would break reference scanning if used in a name
const RESERVED_CHARS: [char; 4] = ['$', '(', ')', ','];

/// Name-to-resolver mappings for `$Variable$` and `$Function(args)$` references
///
/// Built once and passed by reference to the preprocessor. Names are
/// case-sensitive.
#[derive(Clone)]
pub struct ScriptRegistry {
    host: Arc<dyn Host>,
    variables: HashMap<String, ScriptVariable>,
    functions: HashMap<String, ScriptFunction>,
}

impl ScriptRegistry {
    /// Create an empty registry
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            host,
            variables: HashMap::new(),
            functions: HashMap::new(),
        }
    }

    /// Create a registry holding every builtin variable and function
    pub fn with_builtins(host: Arc<dyn Host>) -> Self {
        let mut registry = Self::new(host);
        for builtin in BuiltinVariable::ALL {
            registry
                .variables
                .insert(builtin.name().to_string(), ScriptVariable::Builtin(builtin));
        }
        for builtin in BuiltinFunction::ALL {
            registry
                .functions
                .insert(builtin.name().to_string(), ScriptFunction::Builtin(builtin));
        }
        debug!(
            "Registered {} builtin variables and {} builtin functions",
            registry.variables.len(),
            registry.functions.len()
        );
        registry
    }

    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    /// Register or replace a variable
    pub fn register_variable(
        &mut self,
        name: impl Into<String>,
        variable: ScriptVariable,
    ) -> Result<()> {
        let name = validate_name(name.into())?;
        if self.variables.insert(name.clone(), variable).is_some() {
            warn!("Variable '{}' was already registered and has been replaced", name);
        } else {
            debug!("Registered variable '{}'", name);
        }
        Ok(())
    }

    /// Register a variable with a fixed value
    pub fn register_static_variable(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.register_variable(name, ScriptVariable::Static(value.into()))
    }

    /// Register a variable resolved on every reference
    pub fn register_dynamic_variable<F>(
        &mut self,
        name: impl Into<String>,
        resolver: F,
    ) -> Result<()>
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.register_variable(name, ScriptVariable::dynamic(resolver))
    }

    /// Register or replace a function
    pub fn register_function<F>(&mut self, name: impl Into<String>, function: F) -> Result<()>
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        let name = validate_name(name.into())?;
        if self
            .functions
            .insert(name.clone(), ScriptFunction::custom(function))
            .is_some()
        {
            warn!("Function '{}' was already registered and has been replaced", name);
        } else {
            debug!("Registered function '{}'", name);
        }
        Ok(())
    }

    /// Resolve a variable by name
    pub fn resolve_variable(&self, name: &str) -> Option<String> {
        let variable = self.variables.get(name)?;
        Some(variable.resolve(self.host.as_ref()))
    }

    /// Invoke a function by name
    pub fn call_function(&self, name: &str, args: &[String]) -> Option<String> {
        let function = self.functions.get(name)?;
        Some(function.call(self.host.as_ref(), args))
    }

    pub fn contains_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn contains_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered variable names, sorted
    pub fn variable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered function names, sorted
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptRegistry")
            .field("variables", &self.variable_names())
            .field("functions", &self.function_names())
            .finish()
    }
}

fn validate_name(name: String) -> Result<String> {
    if name.is_empty() {
        return Err(RuntimeError::InvalidName {
            name,
            reason: "name is empty".to_string(),
        });
    }
    let reserved = name.chars().find(|c| RESERVED_CHARS.contains(c));
    if let Some(c) = reserved {
        return Err(RuntimeError::InvalidName {
            reason: format!("'{}' is reserved for reference syntax", c),
            name,
        });
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SystemHost;

    fn registry() -> ScriptRegistry {
        ScriptRegistry::with_builtins(Arc::new(SystemHost::new()))
    }

    #[test]
    fn test_builtins_registered() {
        let registry = registry();
        for builtin in BuiltinVariable::ALL {
            assert!(registry.contains_variable(builtin.name()));
        }
        for builtin in BuiltinFunction::ALL {
            assert!(registry.contains_function(builtin.name()));
        }
        assert!(!registry.contains_variable("is64bitprocess"));
    }

    #[test]
    fn test_static_and_dynamic_variables() {
        let mut registry = ScriptRegistry::new(Arc::new(SystemHost::new()));
        registry.register_static_variable("Channel", "stable").unwrap();
        registry
            .register_dynamic_variable("Answer", || (40 + 2).to_string())
            .unwrap();

        assert_eq!(registry.resolve_variable("Channel").as_deref(), Some("stable"));
        assert_eq!(registry.resolve_variable("Answer").as_deref(), Some("42"));
        assert_eq!(registry.resolve_variable("Missing"), None);
        assert_eq!(registry.variable_names(), vec!["Answer", "Channel"]);
    }

    #[test]
    fn test_replace_variable() {
        let mut registry = registry();
        registry.register_static_variable("OperatingSystem", "custom").unwrap();
        assert_eq!(
            registry.resolve_variable("OperatingSystem").as_deref(),
            Some("custom")
        );
    }

    #[test]
    fn test_custom_function() {
        let mut registry = registry();
        registry
            .register_function("Join", |args: &[String]| args.join("+"))
            .unwrap();
        let args = vec!["a".to_string(), "b".to_string()];
        assert_eq!(registry.call_function("Join", &args).as_deref(), Some("a+b"));
        assert_eq!(registry.call_function("Nope", &args), None);
    }

    #[test]
    fn test_invalid_names() {
        let mut registry = registry();
        assert!(registry.register_static_variable("", "x").is_err());
        assert!(registry.register_static_variable("A$B", "x").is_err());
        let err = registry
            .register_function("Bad(", |_: &[String]| String::new())
            .unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidName { .. }));
    }
}
