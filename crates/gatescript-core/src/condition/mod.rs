//! Condition Module
//!
//! Parses and reduces the condition strings that gate deployment actions.
//!
//! # Syntax
//!
//! A condition is a parenthesized group. A group holds either one leaf
//! comparison or several sub-groups joined by `And` / `Or`:
//!
//! ```text
//! ('hello' == 'hello')
//! (('1' > '2') Or ('1' < '2') And ('1' < '2'))
//! ```
//!
//! ## Operators
//! - `==`, `!=` compare operand text exactly
//! - `>`, `>=`, `<`, `<=` parse both operands as integers; a failed parse yields `false`
//!
//! ## Connectives
//! `And` and `Or` are case-sensitive and have no relative precedence:
//! linked sub-groups are reduced strictly left to right, so
//! `G1 Or G2 And G3` means `(G1 Or G2) And G3`.
//!
//! Operands are single-quoted and cannot contain a `'`.

mod lexer;
mod parser;
mod types;

pub use parser::{evaluate, ConditionParser, DEFAULT_MAX_DEPTH, MAX_ALLOWED_DEPTH};
pub use types::{CompareType, CompoundGroup, Condition, Connective, Group, GroupLink, Operator};
