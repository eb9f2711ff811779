use crate::context::{RewriteOptions, RewriteStats};
use crate::error::RewriteResult;
use serde::Serialize;
use tailbox_common::{walk_attributes_mut, walk_element, walk_element_mut, Visitor, VisitorMut};
use tailbox_parser::ast::*;
use tailbox_parser::{parse_program, serialize_program};
use tailbox_utility::{classify_token, TokenOutcome};
use tracing::{debug, info, instrument, warn};

/// Rewrite with the default `Box` / `div` / `as` options
pub fn rewrite(source: &str) -> RewriteResult<String> {
    rewrite_with_options(source, &RewriteOptions::default())
}

/// Parse `source` as a program, rewrite every element and print it back in
/// compact form without the final `;`
#[instrument(skip(source, options), fields(len = source.len()))]
pub fn rewrite_with_options(source: &str, options: &RewriteOptions) -> RewriteResult<String> {
    let mut program = parse_program(source)?;
    let stats = rewrite_program(&mut program, options);
    info!(
        elements = stats.elements_renamed,
        directives = stats.directives_emitted,
        dropped = stats.tokens_dropped,
        "Rewrite complete"
    );

    let printed = serialize_program(&program);
    Ok(printed.strip_suffix(';').unwrap_or(&printed).to_string())
}

/// Rewrite an already parsed program in place
pub fn rewrite_program(program: &mut Program, options: &RewriteOptions) -> RewriteStats {
    let mut rewriter = Rewriter {
        options,
        stats: RewriteStats::default(),
    };
    rewriter.visit_program_mut(program);
    rewriter.stats
}

struct Rewriter<'a> {
    options: &'a RewriteOptions,
    stats: RewriteStats,
}

impl Rewriter<'_> {
    fn expand_class(&mut self, value: &str) -> Vec<AttributeItem> {
        let mut attributes = Vec::new();
        for token in value.split_whitespace() {
            match classify_token(token) {
                TokenOutcome::Directive(directive) => {
                    attributes.push(AttributeItem::Attribute(Attribute::string(
                        directive.name,
                        directive.value,
                    )));
                }
                TokenOutcome::Responsive { breakpoint, .. } => {
                    debug!(token, %breakpoint, "Dropping responsive class token");
                    self.stats.tokens_dropped += 1;
                }
                TokenOutcome::Unmatched => {
                    debug!(token, "Dropping class token without a directive");
                    self.stats.tokens_dropped += 1;
                }
            }
        }
        self.stats.directives_emitted += attributes.len();
        attributes
    }
}

impl VisitorMut for Rewriter<'_> {
    fn visit_element_mut(&mut self, element: &mut Element) {
        if element.name != self.options.canonical_tag {
            let original = std::mem::replace(&mut element.name, self.options.canonical_tag.clone());
            if original != self.options.generic_tag {
                element.attributes.insert(
                    0,
                    AttributeItem::Attribute(Attribute::string(
                        self.options.identity_attribute.as_str(),
                        original,
                    )),
                );
            }
            self.stats.elements_renamed += 1;
        }
        walk_element_mut(self, element);
    }

    fn visit_attributes_mut(&mut self, attributes: &mut Vec<AttributeItem>) {
        let mut rewritten = Vec::with_capacity(attributes.len());
        for item in attributes.drain(..) {
            let attribute = match item {
                AttributeItem::Attribute(attribute) if attribute.name == "class" => attribute,
                other => {
                    rewritten.push(other);
                    continue;
                }
            };

            let literal = match &attribute.value {
                Some(AttributeValue::String(literal)) => Some(literal.value.clone()),
                _ => None,
            };
            match literal {
                Some(value) => {
                    self.stats.class_attributes_expanded += 1;
                    rewritten.extend(self.expand_class(&value));
                }
                None => {
                    warn!(span = ?attribute.span, "Leaving non-literal class attribute untouched");
                    self.stats.dynamic_class_attributes += 1;
                    rewritten.push(AttributeItem::Attribute(attribute));
                }
            }
        }
        *attributes = rewritten;
        walk_attributes_mut(self, attributes);
    }
}

/// A literal `class` attribute found in source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassList {
    pub tag: String,
    pub value: String,
    pub span: Span,
}

/// Every literal `class` value in a program, in source order
pub fn collect_class_lists(program: &Program) -> Vec<ClassList> {
    let mut collector = ClassCollector::default();
    collector.visit_program(program);
    collector.found
}

#[derive(Default)]
struct ClassCollector {
    found: Vec<ClassList>,
}

impl Visitor for ClassCollector {
    fn visit_element(&mut self, element: &Element) {
        for item in &element.attributes {
            if let AttributeItem::Attribute(Attribute {
                name,
                value: Some(AttributeValue::String(literal)),
                span,
            }) = item
            {
                if name == "class" {
                    self.found.push(ClassList {
                        tag: element.name.clone(),
                        value: literal.value.clone(),
                        span: *span,
                    });
                }
            }
        }
        walk_element(self, element);
    }
}
