//! Markup text in, rendered tree out.
//!
//! ```rust,ignore
//! use tailbox_evaluator::{InterpretOptions, Interpreter};
//!
//! let interpreter = Interpreter::new(InterpretOptions::default().with_binding("name", "Ada"))?;
//! let result = interpreter.interpret("<p>Hello {name}</p>")?;
//! ```

use crate::context::{ConfigError, Context};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::evaluator::{EvalError, EvalResult, Evaluator};
use crate::options::InterpretOptions;
use crate::render::{ElementType, Renderer, TreeRenderer};
use crate::scope::Scope;
use crate::value::{Object, Value};
use serde::Serialize;
use std::sync::Arc;
use tailbox_parser::ast::Span;
use tailbox_parser::{parse_markup, ParseError, ParserOptions};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Errors that abort an interpretation
#[derive(Error, Debug)]
pub enum InterpretError {
    #[error(transparent)]
    Parse(ParseError),

    #[error("Recursion limit of {limit} exceeded at {span:?}")]
    RecursionLimitExceeded { limit: usize, span: Span },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<ParseError> for InterpretError {
    fn from(error: ParseError) -> Self {
        match error {
            ParseError::RecursionLimitExceeded { pos, limit } => {
                InterpretError::RecursionLimitExceeded {
                    limit,
                    span: Span::new(pos, pos),
                }
            }
            other => InterpretError::Parse(other),
        }
    }
}

impl From<EvalError> for InterpretError {
    fn from(error: EvalError) -> Self {
        match error {
            EvalError::RecursionLimitExceeded { limit, span } => {
                InterpretError::RecursionLimitExceeded { limit, span }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Interpretation {
    /// Wrapper element (or fragment) holding the rendered top-level nodes
    pub tree: Value,
    /// Rendered top-level nodes, before wrapping
    pub roots: Vec<Value>,
    /// Recoverable errors in the order they were reported
    pub diagnostics: Vec<Diagnostic>,
}

/// Reusable, thread-safe interpreter. Each call gets its own diagnostics
/// buffer, so concurrent calls never see each other's errors.
#[derive(Clone)]
pub struct Interpreter {
    context: Arc<Context>,
}

impl Interpreter {
    pub fn new(options: InterpretOptions) -> Result<Self, ConfigError> {
        Self::with_renderer(options, Arc::new(TreeRenderer))
    }

    pub fn with_renderer(
        options: InterpretOptions,
        renderer: Arc<dyn Renderer>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            context: Arc::new(Context::new(options, renderer)?),
        })
    }

    pub fn options(&self) -> &InterpretOptions {
        self.context.options()
    }

    /// Evaluator with a fresh diagnostics buffer
    pub fn evaluator(&self) -> Evaluator {
        let options = self.context.options();
        Evaluator::new(
            self.context.clone(),
            DiagnosticSink::new(options.on_error.clone(), options.show_warnings),
        )
    }

    #[instrument(skip(self, markup), fields(len = markup.len()))]
    pub fn interpret(&self, markup: &str) -> Result<Interpretation, InterpretError> {
        let options = self.context.options();
        let parser_options = ParserOptions {
            auto_close_void_elements: options.auto_close_void_elements,
            max_depth: options.max_depth,
        };
        let nodes = parse_markup(markup, &parser_options)?;
        debug!(nodes = nodes.len(), "Parsed markup");

        let evaluator = self.evaluator();
        let scope = Scope::new();
        let roots = nodes
            .iter()
            .map(|node| evaluator.evaluate_node(node, &scope, 0))
            .collect::<EvalResult<Vec<_>>>()?;

        let tree = self.wrap(&evaluator, roots.clone());
        let diagnostics = evaluator.take_diagnostics();
        info!(
            roots = roots.len(),
            diagnostics = diagnostics.len(),
            "Interpretation complete"
        );

        Ok(Interpretation {
            tree,
            roots,
            diagnostics,
        })
    }

    /// Like [`interpret`](Self::interpret) but never fails. A fatal error
    /// goes to `on_error` and is replaced by `render_error` output or `null`.
    pub fn render(&self, markup: &str) -> Value {
        match self.interpret(markup) {
            Ok(interpretation) => interpretation.tree,
            Err(error) => {
                warn!(%error, "Interpretation failed");
                let options = self.context.options();
                if let Some(on_error) = &options.on_error {
                    let reported: &(dyn std::error::Error + 'static) = &error;
                    on_error(reported);
                }
                match &options.render_error {
                    Some(render_error) => render_error(&error.to_string()),
                    None => Value::Null,
                }
            }
        }
    }

    fn wrap(&self, evaluator: &Evaluator, roots: Vec<Value>) -> Value {
        let options = self.context.options();
        let children = evaluator.normalize_children(roots);
        if options.render_in_wrapper {
            let mut props = Object::new();
            props.insert("className".to_string(), Value::String(options.wrapper_class()));
            self.context.renderer.create_element(
                ElementType::Host("div".to_string()),
                props,
                children,
            )
        } else {
            self.context
                .renderer
                .create_element(ElementType::Fragment, Object::new(), children)
        }
    }
}

/// One-shot interpretation
pub fn interpret(markup: &str, options: InterpretOptions) -> Result<Interpretation, InterpretError> {
    Interpreter::new(options)?.interpret(markup)
}
