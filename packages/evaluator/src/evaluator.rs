//! # Tailbox Evaluator
//!
//! Evaluates markup expressions to runtime [`Value`]s.
//!
//! ## Contract
//!
//! Evaluation is a pure function of the expression, the [`Scope`] passed
//! down, and the interpreter's bindings. Scopes are never mutated: arrow
//! closures build a fresh scope holding only their parameters on every
//! call and do not see the scope they were created in.
//!
//! ## Error Recovery
//!
//! Unresolvable members, calls on non-functions and unsupported arrows are
//! reported as [`Diagnostic`]s and the failing sub-expression evaluates to
//! `undefined`. The only error that aborts evaluation is
//! [`EvalError::RecursionLimitExceeded`].

use crate::builtins;
use crate::context::Context;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::scope::Scope;
use crate::value::{Function, Object, Value};
use std::cmp::Ordering;
use std::sync::atomic::{self, AtomicUsize};
use std::sync::Arc;
use tailbox_parser::ast::*;
use tailbox_parser::serialize_expression;
use thiserror::Error;
use tracing::{instrument, trace};

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Recursion limit of {limit} exceeded at {span:?}")]
    RecursionLimitExceeded { limit: usize, span: Span },
}

/// Evaluator bound to one interpreter configuration and one diagnostics
/// buffer. Cheap to clone; closures keep a clone.
#[derive(Clone)]
pub struct Evaluator {
    pub(crate) context: Arc<Context>,
    sink: DiagnosticSink,
    /// Depth of the innermost call in progress, shared by every clone
    call_site: Arc<AtomicUsize>,
}

impl Evaluator {
    pub fn new(context: Arc<Context>, sink: DiagnosticSink) -> Self {
        Self {
            context,
            sink,
            call_site: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Diagnostics reported so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.sink.snapshot()
    }

    pub(crate) fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.sink.take()
    }

    pub(crate) fn report(&self, diagnostic: Diagnostic) {
        self.sink.report(diagnostic);
    }

    /// Depth of the next nesting level, or an error past the limit
    pub(crate) fn enter(&self, depth: usize, span: Span) -> EvalResult<usize> {
        let limit = self.context.options.max_depth;
        if depth >= limit {
            return Err(EvalError::RecursionLimitExceeded { limit, span });
        }
        Ok(depth + 1)
    }

    /// Evaluate an expression. `depth` is the current nesting level; pass
    /// `0` at the top.
    pub fn evaluate(&self, expr: &Expression, scope: &Scope, depth: usize) -> EvalResult<Value> {
        let depth = self.enter(depth, expr.span())?;
        match expr {
            Expression::Identifier { name, .. } => Ok(self.lookup(name, scope)),

            Expression::Literal { value, .. } => Ok(literal_value(value)),

            Expression::Binary {
                operator,
                left,
                right,
                ..
            } => {
                if !is_supported_binary(*operator) {
                    trace!(operator = operator.as_str(), "Unsupported binary operator");
                    return Ok(Value::Undefined);
                }
                let left = self.evaluate(left, scope, depth)?;
                let right = self.evaluate(right, scope, depth)?;
                Ok(binary(*operator, &left, &right))
            }

            Expression::Logical {
                operator,
                left,
                right,
                ..
            } => {
                let left = self.evaluate(left, scope, depth)?;
                match operator {
                    LogicalOperator::Or if left.is_truthy() => Ok(left),
                    LogicalOperator::Or => self.evaluate(right, scope, depth),
                    LogicalOperator::And if left.is_truthy() => self.evaluate(right, scope, depth),
                    LogicalOperator::And => Ok(Value::Bool(false)),
                }
            }

            Expression::Conditional {
                test,
                consequent,
                alternate,
                ..
            } => {
                if self.evaluate(test, scope, depth)?.is_truthy() {
                    self.evaluate(consequent, scope, depth)
                } else {
                    self.evaluate(alternate, scope, depth)
                }
            }

            Expression::Template {
                quasis,
                expressions,
                ..
            } => self.evaluate_template(quasis, expressions, scope, depth),

            Expression::Member { .. } => self.evaluate_member(expr, scope, depth),

            Expression::Call {
                callee,
                arguments,
                span,
            } => self.evaluate_call(callee, arguments, *span, scope, depth),

            Expression::Arrow {
                params,
                body,
                is_async,
                span,
            } => {
                if *is_async {
                    self.report(Diagnostic::UnsupportedArrow { span: *span });
                    return Ok(Value::Undefined);
                }
                Ok(self.closure(params, body, depth))
            }

            Expression::Unary {
                operator, argument, ..
            } => Ok(unary(*operator, argument)),

            Expression::Array { elements, .. } => {
                let values = elements
                    .iter()
                    .map(|element| self.evaluate(element, scope, depth))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::array(values))
            }

            Expression::Object { properties, .. } => {
                let mut object = Object::with_capacity(properties.len());
                for property in properties {
                    let value = self.evaluate(&property.value, scope, depth)?;
                    object.insert(property.key.name().to_string(), value);
                }
                Ok(Value::object(object))
            }

            Expression::Element(element) => self.resolve_element(element, scope, depth),

            Expression::Fragment(fragment) => self.resolve_fragment(fragment, scope, depth),
        }
    }

    /// Scope first, then bindings, then `undefined`
    fn lookup(&self, name: &str, scope: &Scope) -> Value {
        scope
            .get(name)
            .or_else(|| self.context.options.bindings.get(name))
            .cloned()
            .unwrap_or_default()
    }

    /// Segments and expressions are concatenated in source order
    fn evaluate_template(
        &self,
        quasis: &[TemplateSegment],
        expressions: &[Expression],
        scope: &Scope,
        depth: usize,
    ) -> EvalResult<Value> {
        enum Part<'a> {
            Segment(&'a TemplateSegment),
            Expression(&'a Expression),
        }

        let mut parts: Vec<(usize, Part)> = quasis
            .iter()
            .map(|segment| (segment.span.start, Part::Segment(segment)))
            .chain(
                expressions
                    .iter()
                    .map(|expression| (expression.span().start, Part::Expression(expression))),
            )
            .collect();
        parts.sort_by_key(|(start, _)| *start);

        let mut output = String::new();
        for (_, part) in parts {
            match part {
                Part::Segment(segment) => output.push_str(&segment.cooked),
                Part::Expression(expression) => {
                    output.push_str(&self.evaluate(expression, scope, depth)?.to_js_string())
                }
            }
        }
        Ok(Value::String(output))
    }

    /// Flatten `a.b[c].d` into a root and a key path, then walk it
    fn evaluate_member(&self, expr: &Expression, scope: &Scope, depth: usize) -> EvalResult<Value> {
        let mut properties = Vec::new();
        let mut root = expr;
        while let Expression::Member {
            object, property, ..
        } = root
        {
            properties.push(property);
            root = object.as_ref();
        }
        properties.reverse();

        let mut path = Vec::with_capacity(properties.len());
        for property in properties {
            path.push(match property {
                MemberProperty::Named(name) => name.clone(),
                MemberProperty::Computed(key) => self.evaluate(key, scope, depth)?.to_property_key(),
            });
        }

        let mut parent = Value::Undefined;
        let mut current = self.evaluate(root, scope, depth)?;
        for key in &path {
            match builtins::get_member(&current, key) {
                Some(next) => parent = std::mem::replace(&mut current, next),
                None => {
                    self.report(Diagnostic::UnresolvedMember {
                        path: describe_path(root, &path),
                        span: expr.span(),
                    });
                    return Ok(Value::Undefined);
                }
            }
        }

        Ok(match current {
            Value::Function(function) => Value::Function(function.bind(parent)),
            other => other,
        })
    }

    fn evaluate_call(
        &self,
        callee: &Expression,
        arguments: &[Expression],
        span: Span,
        scope: &Scope,
        depth: usize,
    ) -> EvalResult<Value> {
        let Value::Function(function) = self.evaluate(callee, scope, depth)? else {
            self.report(Diagnostic::NotCallable {
                callee: serialize_expression(callee),
                span,
            });
            return Ok(Value::Undefined);
        };

        let args = arguments
            .iter()
            .map(|argument| self.evaluate(argument, scope, depth))
            .collect::<EvalResult<Vec<_>>>()?;
        trace!(function = function.name(), args = args.len(), "Calling function");
        let outer = self.call_site.swap(depth, atomic::Ordering::SeqCst);
        let result = function.call(&args);
        self.call_site.store(outer, atomic::Ordering::SeqCst);
        result
    }

    /// Arrow closure. The body sees only its parameters and the bindings.
    /// It continues from the deeper of its definition and its call site, so
    /// recursion through calls runs into the same limit as nesting.
    #[instrument(level = "trace", skip(self, body))]
    fn closure(&self, params: &[String], body: &Expression, depth: usize) -> Value {
        let evaluator = self.clone();
        let params = params.to_vec();
        let body = Arc::new(body.clone());
        Value::Function(Function::new("anonymous", move |_this, args| {
            let caller = evaluator.call_site.load(atomic::Ordering::SeqCst);
            let scope = Scope::with_params(&params, args);
            evaluator.evaluate(&body, &scope, depth.max(caller))
        }))
    }
}

fn literal_value(literal: &LiteralValue) -> Value {
    match literal {
        LiteralValue::String(s) => Value::String(s.clone()),
        LiteralValue::Number(n) => Value::Number(*n),
        LiteralValue::Boolean(b) => Value::Bool(*b),
        LiteralValue::Null => Value::Null,
    }
}

fn is_supported_binary(operator: BinaryOperator) -> bool {
    matches!(
        operator,
        BinaryOperator::Add
            | BinaryOperator::Subtract
            | BinaryOperator::Multiply
            | BinaryOperator::Divide
            | BinaryOperator::Remainder
            | BinaryOperator::Exponent
            | BinaryOperator::LessThan
            | BinaryOperator::LessThanOrEqual
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterThanOrEqual
            | BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::StrictEqual
            | BinaryOperator::StrictNotEqual
    )
}

fn binary(operator: BinaryOperator, left: &Value, right: &Value) -> Value {
    match operator {
        BinaryOperator::Add => {
            let left = left.to_primitive();
            let right = right.to_primitive();
            if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
                Value::String(left.to_js_string() + &right.to_js_string())
            } else {
                Value::Number(left.to_number() + right.to_number())
            }
        }
        BinaryOperator::Subtract => Value::Number(left.to_number() - right.to_number()),
        BinaryOperator::Multiply => Value::Number(left.to_number() * right.to_number()),
        BinaryOperator::Divide => Value::Number(left.to_number() / right.to_number()),
        BinaryOperator::Remainder => Value::Number(left.to_number() % right.to_number()),
        BinaryOperator::Exponent => Value::Number(power(left.to_number(), right.to_number())),
        BinaryOperator::LessThan => Value::Bool(left.compare(right) == Some(Ordering::Less)),
        BinaryOperator::LessThanOrEqual => Value::Bool(matches!(
            left.compare(right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOperator::GreaterThan => Value::Bool(left.compare(right) == Some(Ordering::Greater)),
        BinaryOperator::GreaterThanOrEqual => Value::Bool(matches!(
            left.compare(right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BinaryOperator::Equal => Value::Bool(left.loose_equals(right)),
        BinaryOperator::NotEqual => Value::Bool(!left.loose_equals(right)),
        BinaryOperator::StrictEqual => Value::Bool(left.strict_equals(right)),
        BinaryOperator::StrictNotEqual => Value::Bool(!left.strict_equals(right)),
        _ => Value::Undefined,
    }
}

/// `**`, which differs from `powf` for NaN exponents and `±1 ** ±Infinity`
fn power(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

/// Unary operators only apply to literal operands
fn unary(operator: UnaryOperator, argument: &Expression) -> Value {
    let Expression::Literal { value, .. } = argument else {
        return Value::Undefined;
    };
    let operand = literal_value(value);
    match operator {
        UnaryOperator::Plus => Value::Number(operand.to_number()),
        UnaryOperator::Minus => Value::Number(-operand.to_number()),
        UnaryOperator::Not => Value::Bool(!operand.is_truthy()),
        UnaryOperator::BitNot | UnaryOperator::Typeof | UnaryOperator::Void => Value::Undefined,
    }
}

/// `user["profile"]["name"]` style description of a member path
fn describe_path(root: &Expression, path: &[String]) -> String {
    let name = match root {
        Expression::Identifier { name, .. } => name.as_str(),
        _ => "unknown",
    };
    let mut description = name.to_string();
    for key in path {
        description.push_str(&format!("[\"{}\"]", key));
    }
    description
}
