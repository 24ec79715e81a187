//! Reference preprocessor
//!
//! Expands `$Variable$` and `$Function(arg, ...)$` references in raw text.
//! Malformed or unknown references never fail; they are replaced by one of
//! the sentinel strings below, which the condition parser will then reject
//! as unquoted text or compare as an ordinary operand.

use crate::registry::ScriptRegistry;
use std::collections::HashMap;
use tracing::{debug, warn};

pub const VARIABLE_NOT_FOUND: &str = "VARIABLE NOT FOUND";
pub const INVALID_FUNCTION: &str = "INVALID FUNCTION";
pub const INCOMPLETE_FUNCTION: &str = "INCOMPLETE FUNCTION";
pub const INCOMPLETE_PARAMETERS: &str = "INCOMPLETE PARAMETERS";
pub const MISSING_PARAMETERS: &str = "MISSING PARAMETERS";

const SENTINEL: char = '$';

/// A `$...$` occurrence found in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reference<'t> {
    Variable(&'t str),
    Function { name: &'t str, arguments: &'t str },
    /// Function call whose parentheses or closing sentinel are missing
    Incomplete,
}

/// A reference and the byte offset just past its span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scanned<'t> {
    reference: Reference<'t>,
    end: usize,
}

/// Scan the reference whose opening sentinel sits at `start`
///
/// Returns `None` when no closing sentinel follows.
fn scan(text: &str, start: usize) -> Option<Scanned<'_>> {
    let body = start + SENTINEL.len_utf8();
    let close = body + text[body..].find(SENTINEL)?;
    let segment = &text[body..close];

    let Some(paren) = segment.find('(') else {
        return Some(Scanned {
            reference: Reference::Variable(segment),
            end: close + 1,
        });
    };

    // Arguments may hold `$name$`, so the call runs to the first `)` rather
    // than to the next sentinel
    let open = body + paren;
    let Some(relative) = text[open + 1..].find(')') else {
        return Some(Scanned {
            reference: Reference::Incomplete,
            end: close + 1,
        });
    };
    let close_paren = open + 1 + relative;

    if !text[close_paren + 1..].starts_with(SENTINEL) {
        return Some(Scanned {
            reference: Reference::Incomplete,
            end: close_paren + 1,
        });
    }

    Some(Scanned {
        reference: Reference::Function {
            name: &segment[..paren],
            arguments: &text[open + 1..close_paren],
        },
        end: close_paren + 2,
    })
}

/// Expands references against a registry
#[derive(Debug, Clone, Copy)]
pub struct Preprocessor<'r> {
    registry: &'r ScriptRegistry,
}

impl<'r> Preprocessor<'r> {
    pub fn new(registry: &'r ScriptRegistry) -> Self {
        Self { registry }
    }

    /// Expand every reference in `text`
    ///
    /// References are resolved left to right, so functions with side effects
    /// run in scan order. Substituted values are not rescanned, and repeated
    /// identical reference text within one call reuses the first result.
    pub fn process(&self, text: &str) -> String {
        if !text.contains(SENTINEL) {
            return text.to_string();
        }

        let mut output = String::with_capacity(text.len());
        let mut resolved: HashMap<&str, String> = HashMap::new();
        let mut cursor = 0;

        while let Some(relative) = text[cursor..].find(SENTINEL) {
            let start = cursor + relative;
            let Some(scanned) = scan(text, start) else {
                break;
            };

            output.push_str(&text[cursor..start]);
            let span = &text[start..scanned.end];
            match resolved.get(span) {
                Some(value) => output.push_str(value),
                None => {
                    let value = self.resolve(scanned.reference);
                    debug!("Resolved {} to {:?}", span, value);
                    output.push_str(&value);
                    resolved.insert(span, value);
                }
            }
            cursor = scanned.end;
        }

        output.push_str(&text[cursor..]);
        output
    }

    fn resolve(&self, reference: Reference<'_>) -> String {
        match reference {
            Reference::Variable(name) => self.variable(name),
            Reference::Function { name, arguments } => self.call(name, arguments),
            Reference::Incomplete => {
                warn!("Incomplete function reference");
                INCOMPLETE_FUNCTION.to_string()
            }
        }
    }

    fn variable(&self, name: &str) -> String {
        self.registry.resolve_variable(name).unwrap_or_else(|| {
            warn!("Variable '{}' not found", name);
            VARIABLE_NOT_FOUND.to_string()
        })
    }

    fn call(&self, name: &str, arguments: &str) -> String {
        if arguments.trim().is_empty() {
            warn!("Function '{}' called without parameters", name);
            return MISSING_PARAMETERS.to_string();
        }

        let pieces: Vec<&str> = arguments.split(',').map(str::trim).collect();
        if pieces.iter().any(|piece| piece.is_empty()) {
            warn!("Function '{}' called with an empty parameter: {:?}", name, arguments);
            return INCOMPLETE_PARAMETERS.to_string();
        }

        if !self.registry.contains_function(name) {
            warn!("Function '{}' not found", name);
            return INVALID_FUNCTION.to_string();
        }

        let args: Vec<String> = pieces.into_iter().map(|piece| self.argument(piece)).collect();
        self.registry
            .call_function(name, &args)
            .unwrap_or_else(|| INVALID_FUNCTION.to_string())
    }

    /// Resolve one level of `$name$` inside a function argument
    fn argument(&self, piece: &str) -> String {
        let inner = piece
            .strip_prefix(SENTINEL)
            .and_then(|rest| rest.strip_suffix(SENTINEL));
        match inner {
            Some(name) => self.variable(name),
            None => piece.to_string(),
        }
    }
}
