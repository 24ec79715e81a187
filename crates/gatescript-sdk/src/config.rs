//! Configuration types for ScriptEngine

use crate::error::{Result, SdkError};
use gatescript_core::{DEFAULT_MAX_DEPTH, MAX_ALLOWED_DEPTH};
use gatescript_runtime::host::DEFAULT_TASK_SEQUENCE_VARIABLE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of environment variables that override configuration
pub const ENV_PREFIX: &str = "GATESCRIPT_";

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum group nesting accepted by the condition parser
    pub max_nesting_depth: usize,

    /// Environment variable whose presence marks a task sequence
    pub task_sequence_variable: String,

    /// Install directory reported by `$InstallDirectory$`
    pub install_directory: Option<PathBuf>,

    /// Fixed-value variables, name to value
    pub variables: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_DEPTH,
            task_sequence_variable: DEFAULT_TASK_SEQUENCE_VARIABLE.to_string(),
            install_directory: None,
            variables: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from YAML
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading engine configuration from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Apply `GATESCRIPT_*` environment overrides
    pub fn apply_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|name| std::env::var(format!("{}{}", ENV_PREFIX, name)).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("MAX_NESTING_DEPTH") {
            self.max_nesting_depth = value.trim().parse().map_err(|_| {
                SdkError::ConfigError(format!(
                    "{}MAX_NESTING_DEPTH must be a positive integer, got '{}'",
                    ENV_PREFIX, value
                ))
            })?;
        }
        if let Some(value) = lookup("INSTALL_DIRECTORY") {
            self.install_directory = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("TASK_SEQUENCE_VARIABLE") {
            self.task_sequence_variable = value;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.max_nesting_depth == 0 {
            return Err(SdkError::ConfigError(
                "max_nesting_depth must be at least 1".to_string(),
            ));
        }
        if self.max_nesting_depth > MAX_ALLOWED_DEPTH {
            return Err(SdkError::ConfigError(format!(
                "max_nesting_depth must be at most {}, got {}",
                MAX_ALLOWED_DEPTH, self.max_nesting_depth
            )));
        }
        if self.task_sequence_variable.is_empty() {
            return Err(SdkError::ConfigError(
                "task_sequence_variable must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the maximum nesting depth
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Set the install directory
    pub fn with_install_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.install_directory = Some(path.into());
        self
    }

    /// Set the task sequence marker variable
    pub fn with_task_sequence_variable(mut self, name: impl Into<String>) -> Self {
        self.task_sequence_variable = name.into();
        self
    }

    /// Add a fixed-value variable
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }
}
