use tailbox_parser::ast::*;

/// Visitor pattern for traversing AST nodes immutably
///
/// This trait provides default implementations that walk the entire tree.
/// Override specific visit_* methods to perform custom actions on nodes.
pub trait Visitor: Sized {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_statement(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }

    fn visit_element(&mut self, element: &Element) {
        walk_element(self, element);
    }

    fn visit_fragment(&mut self, fragment: &Fragment) {
        walk_fragment(self, fragment);
    }

    fn visit_attribute(&mut self, attribute: &Attribute) {
        walk_attribute(self, attribute);
    }

    fn visit_text(&mut self, _text: &Text) {
        // Leaf node, no children to walk
    }

    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr);
    }
}

/// Mutable visitor pattern for transforming AST nodes
///
/// Similar to Visitor, but provides mutable access to nodes.
/// Use this when you need to modify the AST during traversal.
pub trait VisitorMut: Sized {
    fn visit_program_mut(&mut self, program: &mut Program) {
        walk_program_mut(self, program);
    }

    fn visit_statement_mut(&mut self, statement: &mut Statement) {
        walk_statement_mut(self, statement);
    }

    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }

    fn visit_element_mut(&mut self, element: &mut Element) {
        walk_element_mut(self, element);
    }

    fn visit_fragment_mut(&mut self, fragment: &mut Fragment) {
        walk_fragment_mut(self, fragment);
    }

    /// Attributes are visited as a list so implementors can replace one
    /// attribute with several in place
    fn visit_attributes_mut(&mut self, attributes: &mut Vec<AttributeItem>) {
        walk_attributes_mut(self, attributes);
    }

    fn visit_text_mut(&mut self, _text: &mut Text) {
        // Leaf node, no children to walk
    }

    fn visit_expression_mut(&mut self, expr: &mut Expression) {
        walk_expression_mut(self, expr);
    }
}

// Default walk implementations for immutable visitor

pub fn walk_program<V: Visitor>(visitor: &mut V, program: &Program) {
    for statement in &program.body {
        visitor.visit_statement(statement);
    }
}

pub fn walk_statement<V: Visitor>(visitor: &mut V, statement: &Statement) {
    match statement {
        Statement::Expression { expression, .. } => visitor.visit_expression(expression),
        Statement::Declaration { init, .. } => {
            if let Some(init) = init {
                visitor.visit_expression(init);
            }
        }
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) {
    match node {
        Node::Element(element) => visitor.visit_element(element),
        Node::Fragment(fragment) => visitor.visit_fragment(fragment),
        Node::Text(text) => visitor.visit_text(text),
        Node::Expression(container) => visitor.visit_expression(&container.expression),
    }
}

pub fn walk_element<V: Visitor>(visitor: &mut V, element: &Element) {
    for item in &element.attributes {
        match item {
            AttributeItem::Attribute(attribute) => visitor.visit_attribute(attribute),
            AttributeItem::Spread(spread) => visitor.visit_expression(&spread.argument),
        }
    }
    for child in &element.children {
        visitor.visit_node(child);
    }
}

pub fn walk_fragment<V: Visitor>(visitor: &mut V, fragment: &Fragment) {
    for child in &fragment.children {
        visitor.visit_node(child);
    }
}

pub fn walk_attribute<V: Visitor>(visitor: &mut V, attribute: &Attribute) {
    match &attribute.value {
        None | Some(AttributeValue::String(_)) => {
            // Leaf values
        }
        Some(AttributeValue::Expression(container)) => {
            visitor.visit_expression(&container.expression)
        }
        Some(AttributeValue::Element(element)) => visitor.visit_element(element),
        Some(AttributeValue::Fragment(fragment)) => visitor.visit_fragment(fragment),
    }
}

pub fn walk_expression<V: Visitor>(visitor: &mut V, expr: &Expression) {
    match expr {
        Expression::Identifier { .. } | Expression::Literal { .. } => {
            // Leaf nodes
        }
        Expression::Member {
            object, property, ..
        } => {
            visitor.visit_expression(object);
            if let MemberProperty::Computed(key) = property {
                visitor.visit_expression(key);
            }
        }
        Expression::Call {
            callee, arguments, ..
        } => {
            visitor.visit_expression(callee);
            for arg in arguments {
                visitor.visit_expression(arg);
            }
        }
        Expression::Binary { left, right, .. } | Expression::Logical { left, right, .. } => {
            visitor.visit_expression(left);
            visitor.visit_expression(right);
        }
        Expression::Conditional {
            test,
            consequent,
            alternate,
            ..
        } => {
            visitor.visit_expression(test);
            visitor.visit_expression(consequent);
            visitor.visit_expression(alternate);
        }
        Expression::Template { expressions, .. } => {
            for expr in expressions {
                visitor.visit_expression(expr);
            }
        }
        Expression::Array { elements, .. } => {
            for element in elements {
                visitor.visit_expression(element);
            }
        }
        Expression::Object { properties, .. } => {
            for property in properties {
                visitor.visit_expression(&property.value);
            }
        }
        Expression::Arrow { body, .. } => visitor.visit_expression(body),
        Expression::Unary { argument, .. } => visitor.visit_expression(argument),
        Expression::Element(element) => visitor.visit_element(element),
        Expression::Fragment(fragment) => visitor.visit_fragment(fragment),
    }
}

// Default walk implementations for mutable visitor

pub fn walk_program_mut<V: VisitorMut>(visitor: &mut V, program: &mut Program) {
    for statement in &mut program.body {
        visitor.visit_statement_mut(statement);
    }
}

pub fn walk_statement_mut<V: VisitorMut>(visitor: &mut V, statement: &mut Statement) {
    match statement {
        Statement::Expression { expression, .. } => visitor.visit_expression_mut(expression),
        Statement::Declaration { init, .. } => {
            if let Some(init) = init {
                visitor.visit_expression_mut(init);
            }
        }
    }
}

pub fn walk_node_mut<V: VisitorMut>(visitor: &mut V, node: &mut Node) {
    match node {
        Node::Element(element) => visitor.visit_element_mut(element),
        Node::Fragment(fragment) => visitor.visit_fragment_mut(fragment),
        Node::Text(text) => visitor.visit_text_mut(text),
        Node::Expression(container) => visitor.visit_expression_mut(&mut container.expression),
    }
}

pub fn walk_element_mut<V: VisitorMut>(visitor: &mut V, element: &mut Element) {
    visitor.visit_attributes_mut(&mut element.attributes);
    for child in &mut element.children {
        visitor.visit_node_mut(child);
    }
}

pub fn walk_fragment_mut<V: VisitorMut>(visitor: &mut V, fragment: &mut Fragment) {
    for child in &mut fragment.children {
        visitor.visit_node_mut(child);
    }
}

pub fn walk_attributes_mut<V: VisitorMut>(visitor: &mut V, attributes: &mut Vec<AttributeItem>) {
    for item in attributes.iter_mut() {
        match item {
            AttributeItem::Attribute(attribute) => match &mut attribute.value {
                None | Some(AttributeValue::String(_)) => {}
                Some(AttributeValue::Expression(container)) => {
                    visitor.visit_expression_mut(&mut container.expression)
                }
                Some(AttributeValue::Element(element)) => visitor.visit_element_mut(element),
                Some(AttributeValue::Fragment(fragment)) => visitor.visit_fragment_mut(fragment),
            },
            AttributeItem::Spread(spread) => visitor.visit_expression_mut(&mut spread.argument),
        }
    }
}

pub fn walk_expression_mut<V: VisitorMut>(visitor: &mut V, expr: &mut Expression) {
    match expr {
        Expression::Identifier { .. } | Expression::Literal { .. } => {
            // Leaf nodes
        }
        Expression::Member {
            object, property, ..
        } => {
            visitor.visit_expression_mut(object);
            if let MemberProperty::Computed(key) = property {
                visitor.visit_expression_mut(key);
            }
        }
        Expression::Call {
            callee, arguments, ..
        } => {
            visitor.visit_expression_mut(callee);
            for arg in arguments {
                visitor.visit_expression_mut(arg);
            }
        }
        Expression::Binary { left, right, .. } | Expression::Logical { left, right, .. } => {
            visitor.visit_expression_mut(left);
            visitor.visit_expression_mut(right);
        }
        Expression::Conditional {
            test,
            consequent,
            alternate,
            ..
        } => {
            visitor.visit_expression_mut(test);
            visitor.visit_expression_mut(consequent);
            visitor.visit_expression_mut(alternate);
        }
        Expression::Template { expressions, .. } => {
            for expr in expressions {
                visitor.visit_expression_mut(expr);
            }
        }
        Expression::Array { elements, .. } => {
            for element in elements {
                visitor.visit_expression_mut(element);
            }
        }
        Expression::Object { properties, .. } => {
            for property in properties {
                visitor.visit_expression_mut(&mut property.value);
            }
        }
        Expression::Arrow { body, .. } => visitor.visit_expression_mut(body),
        Expression::Unary { argument, .. } => visitor.visit_expression_mut(argument),
        Expression::Element(element) => visitor.visit_element_mut(element),
        Expression::Fragment(fragment) => visitor.visit_fragment_mut(fragment),
    }
}
