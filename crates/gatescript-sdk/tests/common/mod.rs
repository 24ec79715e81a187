//! Common test utilities for SDK integration tests

use gatescript_sdk::{EngineConfig, ScriptEngine, ScriptEngineBuilder};

/// Test helper wrapping a fully built engine
pub struct TestEngine {
    engine: ScriptEngine,
}

impl TestEngine {
    /// Engine with a few fixed variables used across tests
    pub fn new() -> Self {
        Self::with_config(
            EngineConfig::new()
                .with_variable("Ring", "pilot")
                .with_variable("Build", "1042")
                .with_install_directory("/opt/product"),
        )
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let engine = ScriptEngineBuilder::new()
            .with_config(config)
            .build()
            .expect("engine should build");
        Self { engine }
    }

    pub fn engine(&self) -> &ScriptEngine {
        &self.engine
    }

    /// Assert the verdict of raw condition text
    pub fn assert_check(&self, text: &str, expected: bool) {
        let verdict = self
            .engine
            .check(text)
            .unwrap_or_else(|e| panic!("{:?} failed: {}", text, e));
        assert_eq!(verdict, expected, "condition {:?}", text);
    }
}
