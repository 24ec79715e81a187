//! Integration tests for the script engine
//!
//! Tests that raw condition text works end to end, from reference
//! expansion through parsing and evaluation.

mod common;

use common::TestEngine;
use gatescript_sdk::{shared_engine, EngineConfig, ErrorKind, ScriptEngineBuilder, SdkError};
use std::io::Write;

// ============================================================================
// Expansion + evaluation
// ============================================================================

#[test]
fn test_static_variables_in_conditions() {
    let engine = TestEngine::new();
    engine.assert_check("('$Ring$' == 'pilot')", true);
    engine.assert_check("('$Build$' >= '1000')", true);
    engine.assert_check("(('$Ring$' == 'broad') Or ('$Build$' < '1000'))", false);
}

#[test]
fn test_builtin_variables_in_conditions() {
    let engine = TestEngine::new();
    engine.assert_check("('$InstallDirectory$' == '/opt/product')", true);
    engine.assert_check("('$IsTaskSequence$' == '1')", false);

    let expected = if cfg!(target_pointer_width = "64") { "1" } else { "0" };
    engine.assert_check(&format!("('$Is64BitProcess$' == '{}')", expected), true);
}

#[test]
fn test_function_calls_in_conditions() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("installed.flag");
    std::fs::write(&marker, "").unwrap();

    let engine = TestEngine::new();
    let condition = format!(
        "(('$FileExists({})$' == '1') And ('$DirectoryExists({})$' == '1'))",
        marker.display(),
        dir.path().display()
    );
    engine.assert_check(&condition, true);

    let missing = dir.path().join("missing.flag");
    engine.assert_check(&format!("('$FileExists({})$' == '0')", missing.display()), true);
}

#[test]
fn test_custom_functions_and_dynamic_variables() {
    let engine = ScriptEngineBuilder::new()
        .with_function("Length", |args: &[String]| args[0].len().to_string())
        .with_dynamic_variable("Answer", || "42".to_string())
        .build()
        .unwrap();

    assert!(engine.check("('$Length(deploy)$' == '6')").unwrap());
    assert!(engine.check("('$Answer$' > '41')").unwrap());
}

#[test]
fn test_left_to_right_chaining_end_to_end() {
    let engine = TestEngine::new();
    engine.assert_check("(('1' > '2') Or ('1' < '2') And ('1' < '2'))", true);
    engine.assert_check("(('1' > '2') Or ('1' < '2') And ('1' > '2'))", false);
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn test_unknown_variable_compares_as_text() {
    let engine = TestEngine::new();
    engine.assert_check("('$Nope$' == 'pilot')", false);
    assert_eq!(engine.engine().process("$Nope$"), "VARIABLE NOT FOUND");
}

#[test]
fn test_sentinel_outside_quotes_is_a_parse_error() {
    let engine = TestEngine::new();
    let err = engine.engine().check("($Nope$ == 'x')").unwrap_err();
    assert_eq!(err.script_error_kind(), Some(ErrorKind::InvalidCondition));
    assert!(!engine.engine().is_satisfied("($Nope$ == 'x')"));
}

#[test]
fn test_declared_error_kinds_surface() {
    let engine = TestEngine::new();
    let cases = [
        ("('first == 'second')", ErrorKind::InvalidString),
        ("('first' !! 'second')", ErrorKind::InvalidOperator),
        ("()", ErrorKind::InvalidGroup),
        ("('first' != 'second' != 'third')", ErrorKind::InvalidCondition),
    ];
    for (condition, kind) in cases {
        let err = engine.engine().evaluate(condition).unwrap_err();
        assert!(matches!(err, SdkError::ScriptError(_)));
        assert_eq!(err.script_error_kind(), Some(kind), "condition {:?}", condition);
    }
}

#[test]
fn test_is_satisfied_gate() {
    let engine = TestEngine::new();
    assert!(engine.engine().is_satisfied("('$Ring$' == 'pilot')"));
    assert!(!engine.engine().is_satisfied("('$Ring$' == 'broad')"));
    assert!(!engine.engine().is_satisfied("('unterminated == 'x')"));
}

#[test]
fn test_nesting_limit_from_config() {
    let engine = TestEngine::with_config(EngineConfig::new().with_max_nesting_depth(2));
    assert!(engine.engine().check("(('a' == 'a'))").unwrap());
    let err = engine.engine().check("((('a' == 'a')))").unwrap_err();
    assert_eq!(err.script_error_kind(), Some(ErrorKind::NestingTooDeep));
}

#[test]
fn test_parse_and_render() {
    let engine = TestEngine::new();
    let group = engine
        .engine()
        .parse("(('$Ring$'=='pilot')And('1'<'2'))")
        .unwrap();
    assert_eq!(group.to_string(), "(('$Ring$' == 'pilot') And ('1' < '2'))");
    assert!(!group.evaluate());
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_invalid_variable_name_fails_build() {
    let err = ScriptEngineBuilder::new()
        .with_variable("Bad$Name", "x")
        .build()
        .unwrap_err();
    assert!(matches!(err, SdkError::RuntimeError(_)));
}

#[test]
fn test_invalid_config_fails_build() {
    let err = ScriptEngineBuilder::new()
        .with_config(EngineConfig::new().with_max_nesting_depth(0))
        .build()
        .unwrap_err();
    assert!(matches!(err, SdkError::ConfigError(_)));
}

#[test]
fn test_unbounded_depth_fails_build() {
    let err = ScriptEngineBuilder::new()
        .with_config(EngineConfig::new().with_max_nesting_depth(10_000_000))
        .build()
        .unwrap_err();
    assert!(matches!(err, SdkError::ConfigError(_)));
}

#[test]
fn test_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_nesting_depth: 4").unwrap();
    writeln!(file, "variables:").unwrap();
    writeln!(file, "  Channel: beta").unwrap();

    let config = EngineConfig::from_file(file.path()).unwrap();
    let engine = TestEngine::with_config(config);
    engine.assert_check("('$Channel$' == 'beta')", true);
    assert_eq!(engine.engine().parser().max_depth(), 4);
}

#[test]
fn test_missing_config_file() {
    let err = EngineConfig::from_file("/nonexistent/gatescript.yaml").unwrap_err();
    assert!(matches!(err, SdkError::IoError(_)));
}

#[test]
fn test_shared_engine_initializes_once() {
    let handles: Vec<_> = (0..8)
        .map(|_| std::thread::spawn(|| shared_engine() as *const _ as usize))
        .collect();
    let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));

    assert!(shared_engine().check("('$OperatingSystem$' == '$OperatingSystem$')").unwrap());
}
