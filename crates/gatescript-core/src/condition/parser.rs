//! Condition parser
//!
//! Recursive descent over the token stream produced by the lexer:
//!
//! ```text
//! condition := "(" body ")"
//! body      := leaf | group (connective group)*
//! group     := "(" body ")"
//! leaf      := operand operator operand
//! ```

use super::lexer::{tokenize, Token, TokenKind};
use super::types::{CompoundGroup, Condition, Connective, Group, GroupLink};
use crate::error::{Result, ScriptError};

/// Default limit on group nesting
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Hard ceiling on group nesting; configured limits are clamped to it so
/// deep input cannot exhaust the stack
pub const MAX_ALLOWED_DEPTH: usize = 256;

const GROUP_CONTENT_MESSAGE: &str =
    "a group needs to have exactly one condition or multiple sub-conditions";

/// Parser for condition strings
#[derive(Debug, Clone)]
pub struct ConditionParser {
    max_depth: usize,
}

impl Default for ConditionParser {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ConditionParser {
    /// Create a parser with the default nesting limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with a custom nesting limit, clamped to `MAX_ALLOWED_DEPTH`
    pub fn with_max_depth(max_depth: usize) -> Self {
        if max_depth > MAX_ALLOWED_DEPTH {
            log::warn!(
                "Nesting limit {} exceeds the ceiling, using {}",
                max_depth,
                MAX_ALLOWED_DEPTH
            );
        }
        Self {
            max_depth: max_depth.min(MAX_ALLOWED_DEPTH),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse a condition string into a group tree
    pub fn parse(&self, condition: &str) -> Result<Group> {
        let tokens = tokenize(condition)?;
        let mut cursor = TokenCursor {
            tokens: &tokens,
            position: 0,
            max_depth: self.max_depth,
        };

        let open = match cursor.next() {
            Some(token) if token.kind == TokenKind::OpenParen => token.offset,
            Some(token) => {
                return Err(ScriptError::InvalidCondition(format!(
                    "condition must start with '(' but found text at position {}",
                    token.offset
                )))
            }
            None => {
                return Err(ScriptError::InvalidCondition(
                    "condition is empty".to_string(),
                ))
            }
        };

        let group = cursor.parse_group(1, open)?;

        if let Some(token) = cursor.next() {
            return Err(ScriptError::InvalidCondition(format!(
                "leftover text after group ended at position {}",
                token.offset
            )));
        }

        log::debug!("parsed condition {:?} into {} level(s)", condition, group.depth());
        Ok(group)
    }

    /// Parse and reduce a condition string
    pub fn evaluate(&self, condition: &str) -> Result<bool> {
        let verdict = self.parse(condition)?.evaluate();
        log::debug!("condition {:?} evaluated to {}", condition, verdict);
        Ok(verdict)
    }
}

/// Parse and reduce a condition string with the default nesting limit
pub fn evaluate(condition: &str) -> Result<bool> {
    ConditionParser::new().evaluate(condition)
}

struct TokenCursor<'a> {
    tokens: &'a [Token],
    position: usize,
    max_depth: usize,
}

impl<'a> TokenCursor<'a> {
    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// Parse the body of a group whose `(` sits at `open`, consuming the closing `)`
    fn parse_group(&mut self, depth: usize, open: usize) -> Result<Group> {
        if depth > self.max_depth {
            return Err(ScriptError::NestingTooDeep {
                max: self.max_depth,
            });
        }

        let mut sub_groups: Vec<Group> = Vec::new();
        let mut links: Vec<GroupLink> = Vec::new();
        let mut pending: Option<(Connective, usize)> = None;
        let mut leaf_tokens: Vec<&'a Token> = Vec::new();

        loop {
            let Some(token) = self.next() else {
                return Err(ScriptError::InvalidCondition(format!(
                    "group opened at position {} is never closed",
                    open
                )));
            };

            match &token.kind {
                TokenKind::OpenParen => {
                    let group = self.parse_group(depth + 1, token.offset)?;
                    if !sub_groups.is_empty() {
                        let Some((connective, _)) = pending.take() else {
                            return Err(ScriptError::InvalidGroup(format!(
                                "group at position {} lacks 'And' or 'Or' before it",
                                token.offset
                            )));
                        };
                        links.push(GroupLink {
                            left: sub_groups.len() - 1,
                            connective,
                            right: sub_groups.len(),
                        });
                    }
                    sub_groups.push(group);
                }
                TokenKind::CloseParen => {
                    if let Some((connective, offset)) = pending {
                        return Err(ScriptError::InvalidCondition(format!(
                            "'{}' at position {} is not followed by a group",
                            connective, offset
                        )));
                    }
                    break;
                }
                TokenKind::Connective(connective) => {
                    if sub_groups.is_empty() {
                        return Err(ScriptError::InvalidCondition(format!(
                            "'{}' at position {} does not follow a group",
                            connective, token.offset
                        )));
                    }
                    if let Some((previous, _)) = pending {
                        return Err(ScriptError::InvalidCondition(format!(
                            "'{}' at position {} directly follows '{}'",
                            connective, token.offset, previous
                        )));
                    }
                    pending = Some((*connective, token.offset));
                }
                TokenKind::Operand(_) | TokenKind::Operator(_) | TokenKind::Word(_) => {
                    leaf_tokens.push(token);
                }
            }
        }

        match (sub_groups.is_empty(), leaf_tokens.is_empty()) {
            (false, true) => Ok(Group::Compound(CompoundGroup::new(sub_groups, links)?)),
            (true, false) => parse_leaf(&leaf_tokens).map(Group::Leaf),
            _ => Err(ScriptError::InvalidGroup(format!(
                "{} (group at position {})",
                GROUP_CONTENT_MESSAGE, open
            ))),
        }
    }
}

fn parse_leaf(tokens: &[&Token]) -> Result<Condition> {
    let mut first: Option<&str> = None;
    let mut operator = None;
    let mut second: Option<&str> = None;

    for token in tokens {
        match &token.kind {
            TokenKind::Operand(text) => match (first, operator, second) {
                (None, _, _) => first = Some(text.as_str()),
                (Some(_), None, _) => {
                    return Err(ScriptError::InvalidCondition(format!(
                        "missing operator before operand at position {}",
                        token.offset
                    )))
                }
                (Some(_), Some(_), None) => second = Some(text.as_str()),
                (Some(_), Some(_), Some(_)) => {
                    return Err(ScriptError::InvalidCondition(format!(
                        "got multiple variables, extra operand at position {}",
                        token.offset
                    )))
                }
            },
            TokenKind::Operator(found) => {
                if first.is_none() {
                    return Err(ScriptError::InvalidCondition(format!(
                        "operator '{}' at position {} has no left operand",
                        found, token.offset
                    )));
                }
                if operator.is_some() {
                    return Err(ScriptError::InvalidCondition(format!(
                        "got multiple operators, extra '{}' at position {}",
                        found, token.offset
                    )));
                }
                operator = Some(*found);
            }
            TokenKind::Word(word) => {
                return Err(ScriptError::InvalidCondition(format!(
                    "unexpected text '{}' at position {}",
                    word, token.offset
                )))
            }
            _ => {
                return Err(ScriptError::InvalidCondition(format!(
                    "unexpected token at position {}",
                    token.offset
                )))
            }
        }
    }

    match (first, operator, second) {
        (Some(first), Some(operator), Some(second)) => Ok(Condition::new(first, operator, second)),
        _ => Err(ScriptError::InvalidCondition(
            "a condition needs two quoted operands and one operator".to_string(),
        )),
    }
}
