//! Element resolution.
//!
//! Turns parsed elements and fragments into rendered values: tag
//! unwrapping and blacklisting, registry lookup, child normalization with
//! key assignment, attribute mapping and style parsing. Output always goes
//! through the configured [`Renderer`](crate::render::Renderer).

use crate::diagnostics::Diagnostic;
use crate::evaluator::{EvalResult, Evaluator};
use crate::html::{drops_whitespace, is_document_wrapper, is_known_element, rename_attribute};
use crate::render::ElementType;
use crate::scope::Scope;
use crate::style::parse_style;
use crate::value::{Object, Value};
use std::sync::Arc;
use tailbox_parser::ast::{self, AttributeItem, AttributeValue, Expression, Node};
use tailbox_parser::is_void_element;
use tracing::{debug, instrument};

impl Evaluator {
    /// Evaluate one markup child
    pub fn evaluate_node(&self, node: &Node, scope: &Scope, depth: usize) -> EvalResult<Value> {
        match node {
            Node::Element(element) => self.resolve_element(element, scope, depth),
            Node::Fragment(fragment) => self.resolve_fragment(fragment, scope, depth),
            Node::Text(text) => Ok(self.text(&text.value)),
            Node::Expression(container) => self.evaluate(&container.expression, scope, depth),
        }
    }

    #[instrument(level = "trace", skip(self, element, scope), fields(name = %element.name))]
    pub fn resolve_element(&self, element: &ast::Element, scope: &Scope, depth: usize) -> EvalResult<Value> {
        let depth = self.enter(depth, element.span)?;
        let options = &self.context.options;
        let name = element.name.as_str();

        if is_document_wrapper(name) {
            debug!(name, "Unwrapping document element");
            let children = element
                .children
                .iter()
                .map(|child| self.evaluate_node(child, scope, depth))
                .collect::<EvalResult<Vec<_>>>()?;
            return Ok(Value::array(children));
        }

        if self.context.is_blacklisted_tag(name) {
            let diagnostic = Diagnostic::BlacklistedTag {
                name: name.to_string(),
                span: element.span,
            };
            let message = diagnostic.to_string();
            self.report(diagnostic);
            return Ok(match &options.render_error {
                Some(render_error) => render_error(&message),
                None => Value::Null,
            });
        }

        let component = options.components.resolve(name).cloned();
        if component.is_none() {
            if options.components_only {
                self.report(Diagnostic::UnrecognizedComponent {
                    name: name.to_string(),
                    span: element.span,
                });
                return Ok(self.unrecognized(name));
            }
            if !options.allow_unknown_elements && !is_known_element(name) {
                self.report(Diagnostic::UnrecognizedTag {
                    name: name.to_string(),
                    span: element.span,
                });
                return Ok(self.unrecognized(name));
            }
        }

        let children = if component.is_some() || !is_void_element(name) {
            let drop_whitespace = component.is_none() && drops_whitespace(name);
            self.resolve_children(&element.children, drop_whitespace, scope, depth)?
        } else {
            Value::Undefined
        };

        let props = self.resolve_attributes(&element.attributes, scope, depth)?;

        let children = if name.eq_ignore_ascii_case("option") {
            promote_option_children(children)
        } else {
            children
        };

        let element_type = match component {
            Some(component) => {
                debug!(name, component = component.name(), "Resolved component");
                ElementType::Component(component)
            }
            None => ElementType::Host(name.to_lowercase()),
        };
        Ok(self.context.renderer.create_element(element_type, props, children))
    }

    pub fn resolve_fragment(&self, fragment: &ast::Fragment, scope: &Scope, depth: usize) -> EvalResult<Value> {
        let depth = self.enter(depth, fragment.span)?;
        let children = self.resolve_children(&fragment.children, false, scope, depth)?;
        Ok(self
            .context
            .renderer
            .create_element(ElementType::Fragment, Object::new(), children))
    }

    /// Zero children are `undefined`, one is returned as is, several become
    /// an array in which keyless elements get their index as key
    pub fn normalize_children(&self, mut children: Vec<Value>) -> Value {
        match children.len() {
            0 => Value::Undefined,
            1 => children.pop().unwrap_or_default(),
            _ => {
                if !self.context.options.disable_key_generation {
                    for (index, child) in children.iter_mut().enumerate() {
                        if let Value::Element(element) = child {
                            if element.key.is_none() {
                                Arc::make_mut(element).key = Some(index.to_string());
                            }
                        }
                    }
                }
                Value::array(children)
            }
        }
    }

    fn resolve_children(
        &self,
        nodes: &[Node],
        drop_whitespace: bool,
        scope: &Scope,
        depth: usize,
    ) -> EvalResult<Value> {
        let mut children = Vec::with_capacity(nodes.len());
        for node in nodes {
            if drop_whitespace {
                if let Node::Text(text) = node {
                    if is_blank(&text.value) {
                        continue;
                    }
                }
            }
            let child = self.evaluate_node(node, scope, depth)?;
            if drop_whitespace && child.as_str().is_some_and(is_blank) {
                continue;
            }
            children.push(child);
        }
        Ok(self.normalize_children(children))
    }

    fn resolve_attributes(
        &self,
        attributes: &[AttributeItem],
        scope: &Scope,
        depth: usize,
    ) -> EvalResult<Object> {
        let mut props = Object::new();
        for item in attributes {
            match item {
                AttributeItem::Attribute(attribute) => {
                    let value = match &attribute.value {
                        None => Value::Bool(true),
                        Some(AttributeValue::String(literal)) => Value::String(literal.value.clone()),
                        Some(AttributeValue::Expression(container)) => {
                            self.evaluate(&container.expression, scope, depth)?
                        }
                        Some(AttributeValue::Element(element)) => {
                            self.resolve_element(element, scope, depth)?
                        }
                        Some(AttributeValue::Fragment(fragment)) => {
                            self.resolve_fragment(fragment, scope, depth)?
                        }
                    };
                    self.set_prop(&mut props, &attribute.name, value);
                }
                AttributeItem::Spread(spread) => {
                    if !matches!(
                        spread.argument,
                        Expression::Identifier { .. } | Expression::Member { .. }
                    ) {
                        debug!(span = ?spread.span, "Ignoring spread of a non-reference expression");
                        continue;
                    }
                    if let Value::Object(source) = self.evaluate(&spread.argument, scope, depth)? {
                        for (name, value) in source.iter() {
                            self.set_prop(&mut props, name, value.clone());
                        }
                    }
                }
            }
        }

        let declaration = match props.get("style") {
            Some(Value::String(style)) => Some(parse_style(style)),
            _ => None,
        };
        if let Some(declaration) = declaration {
            props.insert("style".to_string(), Value::object(declaration));
        }
        Ok(props)
    }

    /// Rename, then drop blacklisted names
    fn set_prop(&self, props: &mut Object, raw_name: &str, value: Value) {
        let name = rename_attribute(raw_name);
        if self.context.is_blacklisted_attr(name) {
            debug!(attribute = name, "Dropping blacklisted attribute");
            return;
        }
        props.insert(name.to_string(), value);
    }

    fn text(&self, text: &str) -> Value {
        if self.context.options.disable_fragments {
            return Value::string(text);
        }
        self.context.renderer.create_element(
            ElementType::Fragment,
            Object::new(),
            Value::string(text),
        )
    }

    fn unrecognized(&self, name: &str) -> Value {
        match &self.context.options.render_unrecognized {
            Some(render_unrecognized) => render_unrecognized(name),
            None => Value::Null,
        }
    }
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// An `option` whose only child is an element takes that element's children
fn promote_option_children(children: Value) -> Value {
    match children {
        Value::Element(element) => element.children.clone(),
        other => other,
    }
}
