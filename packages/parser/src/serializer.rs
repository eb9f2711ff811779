use crate::ast::*;

const ASSIGNMENT: u8 = 1;
const CONDITIONAL: u8 = 2;
const UNARY: u8 = 14;
const POSTFIX: u8 = 16;
const PRIMARY: u8 = 17;

/// Binding strength of an expression when printed; operands weaker than
/// their slot requires get parenthesized
fn expression_precedence(expression: &Expression) -> u8 {
    match expression {
        Expression::Arrow { .. } => ASSIGNMENT,
        Expression::Conditional { .. } => CONDITIONAL,
        Expression::Logical { operator, .. } => operator.precedence() + 2,
        Expression::Binary { operator, .. } => operator.precedence() + 2,
        Expression::Unary { .. } => UNARY,
        Expression::Call { .. } | Expression::Member { .. } => POSTFIX,
        _ => PRIMARY,
    }
}

/// Prints AST back to source in compact single-line form.
///
/// Literals, strings and text keep their raw spelling; whitespace between
/// tokens is normalized.
#[derive(Debug, Default)]
pub struct Serializer {
    output: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.output
    }

    pub fn write_program(&mut self, program: &Program) {
        for (i, statement) in program.body.iter().enumerate() {
            if i > 0 {
                self.output.push(' ');
            }
            self.write_statement(statement);
        }
    }

    pub fn write_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Expression { expression, .. } => {
                let mut inner = Serializer::new();
                inner.write_expression(expression, 0);
                let printed = inner.finish();
                // a leading `{` would read as a block
                if printed.starts_with('{') {
                    self.output.push('(');
                    self.output.push_str(&printed);
                    self.output.push(')');
                } else {
                    self.output.push_str(&printed);
                }
            }
            Statement::Declaration {
                kind, name, init, ..
            } => {
                self.output.push_str(kind.as_str());
                self.output.push(' ');
                self.output.push_str(name);
                if let Some(init) = init {
                    self.output.push_str(" = ");
                    self.write_expression(init, ASSIGNMENT);
                }
            }
        }
        self.output.push(';');
    }

    pub fn write_node(&mut self, node: &Node) {
        match node {
            Node::Element(element) => self.write_element(element),
            Node::Fragment(fragment) => self.write_fragment(fragment),
            Node::Text(text) => self.output.push_str(&text.raw),
            Node::Expression(container) => {
                self.output.push('{');
                self.write_expression(&container.expression, 0);
                self.output.push('}');
            }
        }
    }

    pub fn write_element(&mut self, element: &Element) {
        self.output.push('<');
        self.output.push_str(&element.name);

        for item in &element.attributes {
            self.output.push(' ');
            self.write_attribute_item(item);
        }

        if element.self_closing {
            self.output.push_str(" />");
            return;
        }

        self.output.push('>');
        for child in &element.children {
            self.write_node(child);
        }
        self.output.push_str("</");
        self.output.push_str(&element.name);
        self.output.push('>');
    }

    pub fn write_fragment(&mut self, fragment: &Fragment) {
        self.output.push_str("<>");
        for child in &fragment.children {
            self.write_node(child);
        }
        self.output.push_str("</>");
    }

    fn write_attribute_item(&mut self, item: &AttributeItem) {
        match item {
            AttributeItem::Attribute(attribute) => {
                self.output.push_str(&attribute.name);
                let Some(value) = &attribute.value else {
                    return;
                };
                self.output.push('=');
                match value {
                    AttributeValue::String(literal) => self.output.push_str(&literal.raw),
                    AttributeValue::Expression(container) => {
                        self.output.push('{');
                        self.write_expression(&container.expression, 0);
                        self.output.push('}');
                    }
                    AttributeValue::Element(element) => self.write_element(element),
                    AttributeValue::Fragment(fragment) => self.write_fragment(fragment),
                }
            }
            AttributeItem::Spread(spread) => {
                self.output.push_str("{...");
                self.write_expression(&spread.argument, ASSIGNMENT);
                self.output.push('}');
            }
        }
    }

    pub fn write_expression(&mut self, expression: &Expression, min_precedence: u8) {
        let parenthesize = expression_precedence(expression) < min_precedence;
        if parenthesize {
            self.output.push('(');
        }

        match expression {
            Expression::Identifier { name, .. } => self.output.push_str(name),
            Expression::Literal { raw, .. } => self.output.push_str(raw),
            Expression::Member {
                object, property, ..
            } => {
                // `1.toString` would lex as a malformed number
                let bare_integer = matches!(
                    object.as_ref(),
                    Expression::Literal { value: LiteralValue::Number(_), raw, .. }
                        if !raw.contains(['.', 'e', 'E', 'x', 'X'])
                );
                if bare_integer && matches!(property, MemberProperty::Named(_)) {
                    self.output.push('(');
                    self.write_expression(object, 0);
                    self.output.push(')');
                } else {
                    self.write_expression(object, POSTFIX);
                }
                match property {
                    MemberProperty::Named(name) => {
                        self.output.push('.');
                        self.output.push_str(name);
                    }
                    MemberProperty::Computed(key) => {
                        self.output.push('[');
                        self.write_expression(key, 0);
                        self.output.push(']');
                    }
                }
            }
            Expression::Call {
                callee, arguments, ..
            } => {
                self.write_expression(callee, POSTFIX);
                self.output.push('(');
                self.write_list(arguments);
                self.output.push(')');
            }
            Expression::Binary {
                operator,
                left,
                right,
                ..
            } => {
                let precedence = operator.precedence() + 2;
                let (left_min, right_min) = if *operator == BinaryOperator::Exponent {
                    (UNARY + 1, precedence)
                } else {
                    (precedence, precedence + 1)
                };
                self.write_expression(left, left_min);
                self.output.push(' ');
                self.output.push_str(operator.as_str());
                self.output.push(' ');
                self.write_expression(right, right_min);
            }
            Expression::Logical {
                operator,
                left,
                right,
                ..
            } => {
                let precedence = operator.precedence() + 2;
                self.write_expression(left, precedence);
                self.output.push(' ');
                self.output.push_str(operator.as_str());
                self.output.push(' ');
                self.write_expression(right, precedence + 1);
            }
            Expression::Conditional {
                test,
                consequent,
                alternate,
                ..
            } => {
                self.write_expression(test, CONDITIONAL + 1);
                self.output.push_str(" ? ");
                self.write_expression(consequent, ASSIGNMENT);
                self.output.push_str(" : ");
                self.write_expression(alternate, ASSIGNMENT);
            }
            Expression::Template {
                quasis,
                expressions,
                ..
            } => {
                self.output.push('`');
                for (i, quasi) in quasis.iter().enumerate() {
                    self.output.push_str(&quasi.raw);
                    if let Some(expression) = expressions.get(i) {
                        self.output.push_str("${");
                        self.write_expression(expression, 0);
                        self.output.push('}');
                    }
                }
                self.output.push('`');
            }
            Expression::Array { elements, .. } => {
                self.output.push('[');
                self.write_list(elements);
                self.output.push(']');
            }
            Expression::Object { properties, .. } => {
                if properties.is_empty() {
                    self.output.push_str("{}");
                } else {
                    self.output.push_str("{ ");
                    for (i, property) in properties.iter().enumerate() {
                        if i > 0 {
                            self.output.push_str(", ");
                        }
                        self.write_property(property);
                    }
                    self.output.push_str(" }");
                }
            }
            Expression::Arrow {
                params,
                body,
                is_async,
                ..
            } => {
                if *is_async {
                    self.output.push_str("async ");
                }
                if params.len() == 1 {
                    self.output.push_str(&params[0]);
                } else {
                    self.output.push('(');
                    self.output.push_str(&params.join(", "));
                    self.output.push(')');
                }
                self.output.push_str(" => ");
                if matches!(body.as_ref(), Expression::Object { .. }) {
                    self.output.push('(');
                    self.write_expression(body, 0);
                    self.output.push(')');
                } else {
                    self.write_expression(body, ASSIGNMENT);
                }
            }
            Expression::Unary {
                operator, argument, ..
            } => {
                self.output.push_str(operator.as_str());
                let needs_space = match operator {
                    UnaryOperator::Typeof | UnaryOperator::Void => true,
                    UnaryOperator::Plus | UnaryOperator::Minus => matches!(
                        argument.as_ref(),
                        Expression::Unary {
                            operator: UnaryOperator::Plus | UnaryOperator::Minus,
                            ..
                        }
                    ),
                    _ => false,
                };
                if needs_space {
                    self.output.push(' ');
                }
                self.write_expression(argument, UNARY);
            }
            Expression::Element(element) => self.write_element(element),
            Expression::Fragment(fragment) => self.write_fragment(fragment),
        }

        if parenthesize {
            self.output.push(')');
        }
    }

    fn write_property(&mut self, property: &Property) {
        if property.shorthand {
            self.output.push_str(property.key.name());
            return;
        }
        match &property.key {
            PropertyKey::Identifier(name) => self.output.push_str(name),
            PropertyKey::Literal { raw, .. } => self.output.push_str(raw),
        }
        self.output.push_str(": ");
        self.write_expression(&property.value, ASSIGNMENT);
    }

    fn write_list(&mut self, items: &[Expression]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.write_expression(item, ASSIGNMENT);
        }
    }
}

/// Serialize a program; statements are `;`-terminated and space-separated
pub fn serialize_program(program: &Program) -> String {
    let mut serializer = Serializer::new();
    serializer.write_program(program);
    serializer.finish()
}

pub fn serialize_expression(expression: &Expression) -> String {
    let mut serializer = Serializer::new();
    serializer.write_expression(expression, 0);
    serializer.finish()
}

pub fn serialize_nodes(nodes: &[Node]) -> String {
    let mut serializer = Serializer::new();
    for node in nodes {
        serializer.write_node(node);
    }
    serializer.finish()
}
