use crate::theme::{theme, Theme};
use serde::{Deserialize, Serialize};

/// A resolved `{name, value}` pair produced from one utility-class token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleDirective {
    pub name: String,
    pub value: String,
}

impl StyleDirective {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// What the parser made of a single token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenOutcome {
    Directive(StyleDirective),
    /// Breakpoint-prefixed tokens (`md:flex`) are currently discarded
    Responsive { breakpoint: String, utility: String },
    Unmatched,
}

impl TokenOutcome {
    pub fn into_directive(self) -> Option<StyleDirective> {
        match self {
            TokenOutcome::Directive(directive) => Some(directive),
            _ => None,
        }
    }
}

/// Parse one class token against the process-wide theme
pub fn parse_token(token: &str) -> Option<StyleDirective> {
    classify_token_with(theme(), token).into_directive()
}

pub fn classify_token(token: &str) -> TokenOutcome {
    classify_token_with(theme(), token)
}

pub fn classify_token_with(theme: &Theme, token: &str) -> TokenOutcome {
    if token.is_empty() {
        return TokenOutcome::Unmatched;
    }

    let mut parts = token.split(theme.separator.as_str());
    let head = parts.next().unwrap_or_default();

    if theme.is_breakpoint(head) {
        return TokenOutcome::Responsive {
            breakpoint: head.to_string(),
            utility: parts.collect::<Vec<_>>().join(&theme.separator),
        };
    }

    let mut segments = head.split('-');
    let prefix = segments.next().unwrap_or_default();
    let rest: Vec<&str> = segments.collect();

    // Negative utilities like `-m-4` have no prefix to name a prop after.
    if prefix.is_empty() {
        return TokenOutcome::Unmatched;
    }

    if prefix.chars().count() < 3 {
        return TokenOutcome::Directive(StyleDirective::new(prefix, rest.join(".")));
    }

    if prefix == "text" {
        if rest.first() == Some(&"lg") {
            return TokenOutcome::Directive(StyleDirective::new("fontSize", "lg"));
        }
        return TokenOutcome::Directive(StyleDirective::new("color", rest.join(".")));
    }

    TokenOutcome::Unmatched
}

/// Convert a whole `class` attribute value, keeping token order
pub fn parse_class_list(value: &str) -> Vec<StyleDirective> {
    value.split_whitespace().filter_map(parse_token).collect()
}
