//! Error types for the markup parser

use crate::ast::Span;
use thiserror::Error;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse error with location and context
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Unexpected token at {span:?}: expected {expected}, found {found}")]
    UnexpectedToken {
        span: Span,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of input at {pos}: expected {expected}")]
    UnexpectedEof { pos: usize, expected: String },

    #[error("Invalid syntax at {span:?}: {message}")]
    InvalidSyntax { span: Span, message: String },

    #[error("Lexer error at {span:?}: {message}")]
    LexError { span: Span, message: String },

    #[error("Nesting deeper than {limit} levels at {pos}")]
    RecursionLimitExceeded { pos: usize, limit: usize },
}

impl ParseError {
    pub fn unexpected_token(span: Span, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            span,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(pos: usize, expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            pos,
            expected: expected.into(),
        }
    }

    pub fn invalid_syntax(span: Span, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            span,
            message: message.into(),
        }
    }

    pub fn lex_error(span: Span, message: impl Into<String>) -> Self {
        Self::LexError {
            span,
            message: message.into(),
        }
    }

    pub fn recursion_limit(pos: usize, limit: usize) -> Self {
        Self::RecursionLimitExceeded { pos, limit }
    }

    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::InvalidSyntax { span, .. }
            | ParseError::LexError { span, .. } => *span,
            ParseError::UnexpectedEof { pos, .. }
            | ParseError::RecursionLimitExceeded { pos, .. } => Span::new(*pos, *pos),
        }
    }

    /// Short label shown under the offending source range
    pub fn label(&self) -> String {
        match self {
            ParseError::UnexpectedToken { expected, .. } => format!("expected {}", expected),
            ParseError::UnexpectedEof { expected, .. } => format!("expected {}", expected),
            ParseError::InvalidSyntax { message, .. } => message.clone(),
            ParseError::LexError { message, .. } => message.clone(),
            ParseError::RecursionLimitExceeded { limit, .. } => {
                format!("nesting limit of {} reached here", limit)
            }
        }
    }
}

/// Pretty-print a parse error with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_error(source: &str, filename: &str, error: &ParseError) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let mut output = Vec::new();

    let span = error.span();
    let end = span.end.min(source.len());
    let start = span.start.min(end);
    // ariadne needs a non-empty range to draw a label
    let range = if start == end {
        start.saturating_sub(1)..end
    } else {
        start..end
    };

    let report = Report::build(ReportKind::Error, filename, range.start)
        .with_message(error.to_string())
        .with_label(
            Label::new((filename, range))
                .with_color(Color::Red)
                .with_message(error.label()),
        )
        .finish();

    if report
        .write((filename, Source::from(source)), &mut output)
        .is_err()
    {
        return error.to_string();
    }

    String::from_utf8(output).unwrap_or_else(|_| error.to_string())
}
