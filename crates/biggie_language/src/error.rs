//! Parser errors with source rendering.
//!
//! Every parse failure carries a kind and the span of the offending token.
//! Parsing is fail-fast: the first error aborts and propagates unchanged to
//! the driver, which renders it with [`ParseError::display_with_source`]
//! as the offending line, a caret underline, and the 1-based line/column
//! derived from the span.

use std::fmt;

use biggie_base::{diagnostic, Span};

use crate::token::TokenType;

#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ParseErrorKind {
    UnexpectedTokenType {
        expected: TokenType,
        found: TokenType,
    },
    UnknownTopLevelStatement {
        found: TokenType,
    },
    UnknownBlockLevelStatement {
        found: TokenType,
    },
    UnknownExpression {
        found: TokenType,
    },
    InvalidAssignmentTarget,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError { kind, span }
    }

    /// Human-readable description of the failure, without location.
    pub fn message(&self) -> String {
        match &self.kind {
            ParseErrorKind::UnexpectedTokenType { expected, found } => {
                format!(
                    "expected {} but found {}",
                    token_label(expected),
                    token_label(found)
                )
            }
            ParseErrorKind::UnknownTopLevelStatement { found } => {
                format!("{} cannot start a top level statement", token_label(found))
            }
            ParseErrorKind::UnknownBlockLevelStatement { found } => {
                format!("{} cannot start a statement", token_label(found))
            }
            ParseErrorKind::UnknownExpression { found } => {
                format!("{} cannot start an expression", token_label(found))
            }
            ParseErrorKind::InvalidAssignmentTarget => {
                "assignment target must be an identifier".to_string()
            }
        }
    }

    /// Renders the error against its source text: colored label, the
    /// offending line, and a caret underline.
    pub fn display_with_source(&self, source: &str) -> String {
        diagnostic::render(&self.message(), source, self.span, None)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message(), self.span.start, self.span.end)
    }
}

impl std::error::Error for ParseError {}

/// Token name for messages, without interned payloads.
fn token_label(kind: &TokenType) -> String {
    match kind {
        TokenType::Identifier(_) => "Identifier".to_string(),
        TokenType::Number(_) => "Number".to_string(),
        TokenType::String(_) => "String".to_string(),
        TokenType::Char(_) => "Char".to_string(),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message_and_span() {
        let err = ParseError::new(ParseErrorKind::InvalidAssignmentTarget, Span::new(5, 8));
        let text = format!("{}", err);
        assert!(text.contains("assignment target"));
        assert!(text.contains("5..8"));
    }

    #[test]
    fn display_with_source_underlines_the_span() {
        let source = "var x: int32 = ;\n";
        let err = ParseError::new(
            ParseErrorKind::UnknownExpression {
                found: TokenType::Semicolon,
            },
            Span::new(15, 16),
        );
        let rendered = err.display_with_source(source);
        assert!(rendered.contains("var x: int32 = ;"));
        assert!(rendered.contains('^'));
    }
}
