//! Recoverable errors reported while interpreting.
//!
//! None of these stop an interpretation. The failing sub-expression or
//! element degrades to `undefined` (or a fallback) and the diagnostic is
//! recorded, logged and handed to the optional `on_error` observer.

use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use tailbox_parser::ast::Span;
use thiserror::Error;
use tracing::{debug, warn};

/// Observer for every reported error, recoverable or fatal
pub type ErrorCallback = Arc<dyn Fn(&(dyn std::error::Error + 'static)) + Send + Sync>;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Diagnostic {
    #[error("Unable to parse {path} at {span:?}")]
    UnresolvedMember { path: String, span: Span },

    #[error("The expression '{callee}' could not be resolved, resulting in an undefined return value")]
    NotCallable { callee: String, span: Span },

    #[error("Async and generator arrow functions are not supported at {span:?}")]
    UnsupportedArrow { span: Span },

    #[error("The tag <{name}> is blacklisted, and will not be rendered.")]
    BlacklistedTag { name: String, span: Span },

    #[error("The component <{name}> is unrecognized, and will not be rendered.")]
    UnrecognizedComponent { name: String, span: Span },

    #[error("The tag <{name}> is unrecognized, and will not be rendered.")]
    UnrecognizedTag { name: String, span: Span },
}

impl Diagnostic {
    pub fn span(&self) -> Span {
        match self {
            Diagnostic::UnresolvedMember { span, .. }
            | Diagnostic::NotCallable { span, .. }
            | Diagnostic::UnsupportedArrow { span }
            | Diagnostic::BlacklistedTag { span, .. }
            | Diagnostic::UnrecognizedComponent { span, .. }
            | Diagnostic::UnrecognizedTag { span, .. } => *span,
        }
    }
}

/// Per-interpretation diagnostics buffer
#[derive(Clone, Default)]
pub struct DiagnosticSink {
    entries: Arc<Mutex<Vec<Diagnostic>>>,
    observer: Option<ErrorCallback>,
    show_warnings: bool,
}

impl DiagnosticSink {
    pub fn new(observer: Option<ErrorCallback>, show_warnings: bool) -> Self {
        Self {
            entries: Arc::default(),
            observer,
            show_warnings,
        }
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        if self.show_warnings {
            warn!(span = ?diagnostic.span(), "{}", diagnostic);
        } else {
            debug!(span = ?diagnostic.span(), "{}", diagnostic);
        }

        if let Some(observer) = &self.observer {
            let error: &(dyn std::error::Error + 'static) = &diagnostic;
            observer(error);
        }

        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of everything reported so far, in order
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain the buffer
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl std::fmt::Debug for DiagnosticSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticSink")
            .field("entries", &self.len())
            .field("observer", &self.observer.is_some())
            .field("show_warnings", &self.show_warnings)
            .finish()
    }
}
