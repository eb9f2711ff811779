use serde::{Deserialize, Serialize};

/// Byte range into the parsed source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// Markup node (child of an element, fragment or the synthetic root)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    Element(Element),
    Fragment(Fragment),
    Text(Text),
    Expression(ExpressionContainer),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Element(element) => element.span,
            Node::Fragment(fragment) => fragment.span,
            Node::Text(text) => text.span,
            Node::Expression(container) => container.span,
        }
    }
}

/// `<name attrs...>children</name>` or `<name attrs... />`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Tag name; member-style names are kept dotted (`Foo.Bar`)
    pub name: String,
    pub attributes: Vec<AttributeItem>,
    pub children: Vec<Node>,
    pub self_closing: bool,
    pub span: Span,
}

/// `<>children</>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub children: Vec<Node>,
    pub span: Span,
}

/// Text run between tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// Text with character references decoded
    pub value: String,
    /// Text exactly as written
    pub raw: String,
    pub span: Span,
}

/// `{expression}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionContainer {
    pub expression: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AttributeItem {
    Attribute(Attribute),
    Spread(SpreadAttribute),
}

/// `name`, `name="value"`, `name={expr}` or `name=<el />`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    /// `None` for boolean (valueless) attributes
    pub value: Option<AttributeValue>,
    pub span: Span,
}

impl Attribute {
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            value: Some(AttributeValue::String(StringLiteral {
                raw: quote_attribute(&value),
                value,
                span: Span::default(),
            })),
            span: Span::default(),
        }
    }
}

fn quote_attribute(value: &str) -> String {
    if value.contains('"') {
        format!("'{}'", value)
    } else {
        format!("\"{}\"", value)
    }
}

/// `{...argument}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadAttribute {
    pub argument: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AttributeValue {
    String(StringLiteral),
    Expression(ExpressionContainer),
    Element(Element),
    Fragment(Fragment),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringLiteral {
    pub value: String,
    /// Including quotes
    pub raw: String,
    pub span: Span,
}

/// Expression (attribute values, child containers and nested operands)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    Identifier {
        name: String,
        span: Span,
    },

    Literal {
        value: LiteralValue,
        raw: String,
        span: Span,
    },

    /// `object.property` or `object[expr]`
    Member {
        object: Box<Expression>,
        property: MemberProperty,
        span: Span,
    },

    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
        span: Span,
    },

    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
        span: Span,
    },

    Logical {
        operator: LogicalOperator,
        left: Box<Expression>,
        right: Box<Expression>,
        span: Span,
    },

    Conditional {
        test: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
        span: Span,
    },

    /// Template literal; `quasis` and `expressions` interleave by position
    Template {
        quasis: Vec<TemplateSegment>,
        expressions: Vec<Expression>,
        span: Span,
    },

    Array {
        elements: Vec<Expression>,
        span: Span,
    },

    Object {
        properties: Vec<Property>,
        span: Span,
    },

    Arrow {
        params: Vec<String>,
        body: Box<Expression>,
        is_async: bool,
        span: Span,
    },

    Unary {
        operator: UnaryOperator,
        argument: Box<Expression>,
        span: Span,
    },

    Element(Box<Element>),

    Fragment(Box<Fragment>),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Identifier { span, .. }
            | Expression::Literal { span, .. }
            | Expression::Member { span, .. }
            | Expression::Call { span, .. }
            | Expression::Binary { span, .. }
            | Expression::Logical { span, .. }
            | Expression::Conditional { span, .. }
            | Expression::Template { span, .. }
            | Expression::Array { span, .. }
            | Expression::Object { span, .. }
            | Expression::Arrow { span, .. }
            | Expression::Unary { span, .. } => *span,
            Expression::Element(element) => element.span,
            Expression::Fragment(fragment) => fragment.span,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Expression::Literal { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MemberProperty {
    /// `.name`
    Named(String),
    /// `[expr]`
    Computed(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSegment {
    /// Escapes processed
    pub cooked: String,
    pub raw: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: PropertyKey,
    pub value: Expression,
    pub shorthand: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyKey {
    Identifier(String),
    /// String or numeric literal key, already converted to its string form
    Literal { value: String, raw: String },
}

impl PropertyKey {
    pub fn name(&self) -> &str {
        match self {
            PropertyKey::Identifier(name) => name,
            PropertyKey::Literal { value, .. } => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Exponent,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    In,
    Instanceof,
}

impl BinaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Remainder => "%",
            BinaryOperator::Exponent => "**",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::StrictEqual => "===",
            BinaryOperator::StrictNotEqual => "!==",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::UnsignedShiftRight => ">>>",
            BinaryOperator::In => "in",
            BinaryOperator::Instanceof => "instanceof",
        }
    }

    /// Binding power, higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::BitOr => 3,
            BinaryOperator::BitXor => 4,
            BinaryOperator::BitAnd => 5,
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::StrictEqual
            | BinaryOperator::StrictNotEqual => 6,
            BinaryOperator::LessThan
            | BinaryOperator::LessThanOrEqual
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterThanOrEqual
            | BinaryOperator::In
            | BinaryOperator::Instanceof => 7,
            BinaryOperator::ShiftLeft
            | BinaryOperator::ShiftRight
            | BinaryOperator::UnsignedShiftRight => 8,
            BinaryOperator::Add | BinaryOperator::Subtract => 9,
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Remainder => 10,
            BinaryOperator::Exponent => 11,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            LogicalOperator::Or => 1,
            LogicalOperator::And => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
    BitNot,
    Typeof,
    Void,
}

impl UnaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "!",
            UnaryOperator::BitNot => "~",
            UnaryOperator::Typeof => "typeof",
            UnaryOperator::Void => "void",
        }
    }
}

/// Parsed program (static rewrite input)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    Expression {
        expression: Expression,
        span: Span,
    },
    Declaration {
        kind: DeclarationKind,
        name: String,
        init: Option<Expression>,
        span: Span,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclarationKind {
    Const,
    Let,
    Var,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Const => "const",
            DeclarationKind::Let => "let",
            DeclarationKind::Var => "var",
        }
    }
}
