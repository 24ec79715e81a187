//! Builder pattern for ScriptEngine

use crate::config::EngineConfig;
use crate::engine::ScriptEngine;
use crate::error::Result;
use gatescript_core::ConditionParser;
use gatescript_runtime::{Host, ScriptRegistry, ScriptVariable, SystemHost};
use std::sync::Arc;
use tracing::info;

/// Builder for ScriptEngine
///
/// # Example
///
/// ```rust,ignore
/// use gatescript_sdk::{EngineConfig, ScriptEngineBuilder};
///
/// let engine = ScriptEngineBuilder::new()
///     .with_config(EngineConfig::from_file("gatescript.yaml")?)
///     .with_function("IsServer", |_| "0".to_string())
///     .build()?;
/// ```
pub struct ScriptEngineBuilder {
    config: EngineConfig,
    host: Option<Arc<dyn Host>>,
    variables: Vec<(String, ScriptVariable)>,
    functions: Vec<(String, gatescript_runtime::FunctionFn)>,
}

impl ScriptEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            host: None,
            variables: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom host instead of the system host built from the configuration
    pub fn with_host(mut self, host: Arc<dyn Host>) -> Self {
        self.host = Some(host);
        self
    }

    /// Add a fixed-value variable
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables
            .push((name.into(), ScriptVariable::Static(value.into())));
        self
    }

    /// Add a variable resolved on every reference
    pub fn with_dynamic_variable<F>(mut self, name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.variables
            .push((name.into(), ScriptVariable::dynamic(resolver)));
        self
    }

    /// Add a function
    pub fn with_function<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        self.functions.push((name.into(), Arc::new(function)));
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<ScriptEngine> {
        self.config.validate()?;

        let host = match self.host {
            Some(host) => host,
            None => {
                let mut host = SystemHost::new()
                    .with_task_sequence_variable(self.config.task_sequence_variable.clone());
                if let Some(dir) = &self.config.install_directory {
                    host = host.with_install_directory(dir.clone());
                }
                Arc::new(host)
            }
        };

        let mut registry = ScriptRegistry::with_builtins(host);
        for (name, value) in &self.config.variables {
            registry.register_static_variable(name.clone(), value.clone())?;
        }
        for (name, variable) in self.variables {
            registry.register_variable(name, variable)?;
        }
        for (name, function) in self.functions {
            registry.register_function(name, move |args: &[String]| function(args))?;
        }

        let parser = ConditionParser::with_max_depth(self.config.max_nesting_depth);

        info!(
            "Script engine ready with {} variables and {} functions",
            registry.variable_names().len(),
            registry.function_names().len()
        );

        Ok(ScriptEngine::new(registry, parser))
    }
}

impl Default for ScriptEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
