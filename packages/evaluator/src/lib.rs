pub mod builtins;
pub mod context;
pub mod diagnostics;
pub mod evaluator;
pub mod html;
pub mod interpreter;
pub mod options;
pub mod registry;
pub mod render;
mod resolver;
pub mod scope;
pub mod style;
pub mod value;

#[cfg(test)]
mod tests_expressions;

#[cfg(test)]
mod tests_resolver;

pub use context::{ConfigError, Context};
pub use diagnostics::{Diagnostic, DiagnosticSink, ErrorCallback};
pub use evaluator::{EvalError, EvalResult, Evaluator};
pub use interpreter::{interpret, InterpretError, Interpretation, Interpreter};
pub use options::{InterpretOptions, RenderCallback, WRAPPER_CLASS};
pub use registry::{ComponentRef, ComponentRegistry, RegistryEntry};
pub use render::{Element, ElementType, Renderer, TreeRenderer};
pub use scope::{Bindings, Scope};
pub use style::{camel_case, parse_style};
pub use value::{Function, Object, Value};
