//! Script engine

use crate::builder::ScriptEngineBuilder;
use crate::config::EngineConfig;
use crate::error::Result;
use gatescript_core::{ConditionParser, Group};
use gatescript_runtime::{Preprocessor, ScriptRegistry, SystemHost};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

static SHARED_ENGINE: OnceLock<ScriptEngine> = OnceLock::new();

/// Process-wide engine built from the default configuration plus
/// `GATESCRIPT_*` environment overrides
///
/// Initialization runs exactly once, even when first called from several
/// threads at the same time.
pub fn shared_engine() -> &'static ScriptEngine {
    SHARED_ENGINE.get_or_init(|| {
        let config = EngineConfig::new().apply_env_overrides().unwrap_or_else(|e| {
            warn!("Ignoring environment overrides: {}", e);
            EngineConfig::new()
        });
        ScriptEngineBuilder::new()
            .with_config(config)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to an engine without configured variables: {}", e);
                let registry = ScriptRegistry::with_builtins(Arc::new(SystemHost::new()));
                ScriptEngine::new(registry, ConditionParser::new())
            })
    })
}

/// Preprocesses and evaluates condition text
#[derive(Debug, Clone)]
pub struct ScriptEngine {
    registry: ScriptRegistry,
    parser: ConditionParser,
}

impl ScriptEngine {
    pub fn new(registry: ScriptRegistry, parser: ConditionParser) -> Self {
        Self { registry, parser }
    }

    pub fn registry(&self) -> &ScriptRegistry {
        &self.registry
    }

    pub fn parser(&self) -> &ConditionParser {
        &self.parser
    }

    /// Expand `$...$` references; never fails
    pub fn process(&self, text: &str) -> String {
        Preprocessor::new(&self.registry).process(text)
    }

    /// Parse an already expanded condition
    pub fn parse(&self, condition: &str) -> Result<Group> {
        Ok(self.parser.parse(condition)?)
    }

    /// Evaluate an already expanded condition
    pub fn evaluate(&self, condition: &str) -> Result<bool> {
        Ok(self.parser.evaluate(condition)?)
    }

    /// Expand references in `text`, then evaluate it
    pub fn check(&self, text: &str) -> Result<bool> {
        let expanded = self.process(text);
        debug!("Expanded {:?} to {:?}", text, expanded);
        self.evaluate(&expanded)
    }

    /// Gate an action: like [`check`](Self::check), but any error counts as
    /// the condition not holding
    pub fn is_satisfied(&self, text: &str) -> bool {
        match self.check(text) {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!("Condition {:?} failed ({}), treating as false", text, e);
                false
            }
        }
    }
}
