//! Condition tokenizer
//!
//! Splits condition text into tokens with byte offsets. Lexical errors
//! (unterminated quotes, half-written operators) surface here, before the
//! parser looks at structure.

use super::types::{Connective, Operator};
use crate::error::{Result, ScriptError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    OpenParen,
    CloseParen,
    Connective(Connective),
    Operand(String),
    Operator(Operator),
    /// Unquoted text that is not a keyword
    Word(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '\'' | '=' | '!' | '<' | '>')
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let kind = match c {
            c if c.is_whitespace() => continue,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '\'' => {
                let start = offset + 1;
                let end = input[start..]
                    .find('\'')
                    .map(|relative| start + relative)
                    .ok_or_else(|| {
                        ScriptError::invalid_string(offset, "string is never closed")
                    })?;
                while chars.next_if(|&(index, _)| index <= end).is_some() {}
                TokenKind::Operand(input[start..end].to_string())
            }
            '=' | '!' => match chars.next_if(|&(_, next)| next == '=') {
                Some(_) if c == '=' => TokenKind::Operator(Operator::Eq),
                Some(_) => TokenKind::Operator(Operator::Ne),
                None => {
                    let found = chars
                        .peek()
                        .map(|&(_, next)| format!("'{}'", next))
                        .unwrap_or_else(|| "end of input".to_string());
                    return Err(ScriptError::invalid_operator(
                        offset,
                        format!("expected '=' after '{}', found {}", c, found),
                    ));
                }
            },
            '<' | '>' => {
                let or_equal = chars.next_if(|&(_, next)| next == '=').is_some();
                TokenKind::Operator(match (c, or_equal) {
                    ('<', false) => Operator::Lt,
                    ('<', true) => Operator::Le,
                    (_, false) => Operator::Gt,
                    (_, true) => Operator::Ge,
                })
            }
            _ => {
                let mut end = offset + c.len_utf8();
                while let Some((index, next)) = chars.next_if(|&(_, next)| is_word_char(next)) {
                    end = index + next.len_utf8();
                }
                match &input[offset..end] {
                    "And" => TokenKind::Connective(Connective::And),
                    "Or" => TokenKind::Connective(Connective::Or),
                    word => TokenKind::Word(word.to_string()),
                }
            }
        };
        tokens.push(Token { kind, offset });
    }

    log::trace!("tokenized {} tokens from {:?}", tokens.len(), input);
    Ok(tokens)
}
