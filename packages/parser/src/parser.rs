use crate::ast::*;
use crate::entities::decode_entities;
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::Token;
use logos::Logos;
use std::ops::Range;

/// Tags that never have children
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "menuitem",
    "meta", "param", "source", "track", "wbr",
];

pub const DEFAULT_MAX_DEPTH: usize = 256;

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|tag| tag.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Accept `<br>`/`<img ...>` without a closing tag or `/>`
    pub auto_close_void_elements: bool,
    /// Maximum nesting of elements and expressions
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            auto_close_void_elements: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

pub(crate) type Spanned<'src> = (Token<'src>, Range<usize>);

/// Element or fragment produced by a `<` in markup or expression position
pub(crate) enum Markup {
    Element(Element),
    Fragment(Fragment),
}

impl Markup {
    pub(crate) fn into_node(self) -> Node {
        match self {
            Markup::Element(element) => Node::Element(element),
            Markup::Fragment(fragment) => Node::Fragment(fragment),
        }
    }

    pub(crate) fn into_expression(self) -> Expression {
        match self {
            Markup::Element(element) => Expression::Element(Box::new(element)),
            Markup::Fragment(fragment) => Expression::Fragment(Box::new(fragment)),
        }
    }

    fn into_attribute_value(self) -> AttributeValue {
        match self {
            Markup::Element(element) => AttributeValue::Element(element),
            Markup::Fragment(fragment) => AttributeValue::Fragment(fragment),
        }
    }
}

/// Recursive-descent parser over markup with embedded expressions.
///
/// Markup is scanned character by character from `pos`; expression tokens
/// are lexed on demand from the same position, so the two modes share one
/// cursor and switch freely at `{`, `}` and `<`.
pub struct Parser<'src> {
    pub(crate) source: &'src str,
    pub(crate) pos: usize,
    pub(crate) options: ParserOptions,
    depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, options: ParserOptions) -> Self {
        Self {
            source,
            pos: 0,
            options,
            depth: 0,
        }
    }

    /// Parse markup as the children of an implicit root element, so any
    /// number of top-level siblings is accepted
    pub fn parse_markup(&mut self) -> ParseResult<Vec<Node>> {
        self.parse_children(None)
    }

    /// Parse a program made of expression statements and declarations
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut body = Vec::new();

        loop {
            while self.match_token(Token::Semicolon) {}

            let Some((token, range)) = self.peek()? else {
                break;
            };

            let statement = match token {
                Token::Const => self.parse_declaration(DeclarationKind::Const, range)?,
                Token::Let => self.parse_declaration(DeclarationKind::Let, range)?,
                Token::Var => self.parse_declaration(DeclarationKind::Var, range)?,
                _ => {
                    let expression = self.parse_expression()?;
                    let span = expression.span();
                    Statement::Expression { expression, span }
                }
            };

            self.expect_statement_end()?;
            body.push(statement);
        }

        Ok(Program {
            body,
            span: Span::new(0, self.source.len()),
        })
    }

    /// Parse a single expression that must span the whole input
    pub fn parse_standalone_expression(&mut self) -> ParseResult<Expression> {
        let expression = self.parse_expression()?;
        match self.peek()? {
            None => Ok(expression),
            Some((token, range)) => Err(ParseError::unexpected_token(
                range.into(),
                "end of input",
                token.to_string(),
            )),
        }
    }

    fn parse_declaration(
        &mut self,
        kind: DeclarationKind,
        keyword: Range<usize>,
    ) -> ParseResult<Statement> {
        self.pos = keyword.end;
        let name = self.expect_ident()?;
        let init = if self.match_token(Token::Equals) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(Statement::Declaration {
            kind,
            name,
            init,
            span: Span::new(keyword.start, self.pos),
        })
    }

    /// A statement ends at `;`, at a line break, or at end of input
    fn expect_statement_end(&mut self) -> ParseResult<()> {
        if self.match_token(Token::Semicolon) {
            return Ok(());
        }
        match self.peek()? {
            None => Ok(()),
            Some((_, range)) if self.source[self.pos..range.start].contains('\n') => Ok(()),
            Some((token, range)) => Err(ParseError::unexpected_token(
                range.into(),
                "';'",
                token.to_string(),
            )),
        }
    }

    // ---- Markup ----

    /// Children up to the matching closing tag (`closing == Some(name)`,
    /// empty name for fragments) or up to end of input for the implicit root
    fn parse_children(&mut self, closing: Option<&str>) -> ParseResult<Vec<Node>> {
        let mut children = Vec::new();

        loop {
            if self.at_end() {
                return match closing {
                    None => Ok(children),
                    Some(name) => Err(ParseError::unexpected_eof(
                        self.pos,
                        format!("'</{}>'", name),
                    )),
                };
            }

            if self.starts_with("</") {
                let Some(expected) = closing else {
                    return Err(ParseError::invalid_syntax(
                        Span::new(self.pos, self.pos + 2),
                        "Unexpected closing tag",
                    ));
                };
                self.parse_closing_tag(expected)?;
                return Ok(children);
            }

            match self.peek_char() {
                Some('<') => children.push(self.parse_tag()?.into_node()),
                Some('{') => {
                    if let Some(container) = self.parse_child_container()? {
                        children.push(Node::Expression(container));
                    }
                }
                _ => children.push(Node::Text(self.parse_text())),
            }
        }
    }

    fn parse_closing_tag(&mut self, expected: &str) -> ParseResult<()> {
        let start = self.pos;
        self.pos += 2;
        self.skip_markup_trivia();

        let name = if self.peek_char() == Some('>') {
            String::new()
        } else {
            self.parse_tag_name()?
        };

        self.skip_markup_trivia();
        self.expect_char('>')?;

        if name != expected {
            return Err(ParseError::invalid_syntax(
                Span::new(start, self.pos),
                format!("Expected corresponding closing tag for <{}>", expected),
            ));
        }

        Ok(())
    }

    /// `{expr}` in child position; `{}` and comment-only containers vanish
    fn parse_child_container(&mut self) -> ParseResult<Option<ExpressionContainer>> {
        let start = self.pos;
        self.pos += 1;

        match self.peek()? {
            Some((Token::RBrace, range)) => {
                self.pos = range.end;
                return Ok(None);
            }
            Some((Token::Ellipsis, range)) => {
                return Err(ParseError::invalid_syntax(
                    range.into(),
                    "Spread children are not supported",
                ));
            }
            None => return Err(ParseError::unexpected_eof(self.pos, "expression")),
            Some(_) => {}
        }

        let expression = self.parse_expression()?;
        self.expect(Token::RBrace)?;

        Ok(Some(ExpressionContainer {
            expression,
            span: Span::new(start, self.pos),
        }))
    }

    fn parse_text(&mut self) -> Text {
        let start = self.pos;
        let rest = self.rest();
        self.pos += rest.find(['<', '{']).unwrap_or(rest.len());

        let raw = &self.source[start..self.pos];
        Text {
            value: decode_entities(raw),
            raw: raw.to_string(),
            span: Span::new(start, self.pos),
        }
    }

    pub(crate) fn parse_tag(&mut self) -> ParseResult<Markup> {
        let start = self.pos;
        self.enter(start)?;
        let result = self.parse_tag_inner(start);
        self.leave();
        result
    }

    fn parse_tag_inner(&mut self, start: usize) -> ParseResult<Markup> {
        self.expect_char('<')?;
        self.skip_markup_trivia();

        if self.eat_char('>') {
            let children = self.parse_children(Some(""))?;
            return Ok(Markup::Fragment(Fragment {
                children,
                span: Span::new(start, self.pos),
            }));
        }

        let name = self.parse_tag_name()?;
        let attributes = self.parse_attributes()?;
        self.skip_markup_trivia();

        if self.eat_str("/>") {
            return Ok(Markup::Element(Element {
                name,
                attributes,
                children: Vec::new(),
                self_closing: true,
                span: Span::new(start, self.pos),
            }));
        }

        self.expect_char('>')?;

        if self.options.auto_close_void_elements && is_void_element(&name) {
            // tolerate a redundant explicit close: `<br></br>`
            let redundant = format!("</{}>", name);
            if self.starts_with(&redundant) {
                self.pos += redundant.len();
            }
            return Ok(Markup::Element(Element {
                name,
                attributes,
                children: Vec::new(),
                self_closing: false,
                span: Span::new(start, self.pos),
            }));
        }

        let children = self.parse_children(Some(name.as_str()))?;

        Ok(Markup::Element(Element {
            name,
            attributes,
            children,
            self_closing: false,
            span: Span::new(start, self.pos),
        }))
    }

    /// `name`, `ns:name` or `A.B.C`
    fn parse_tag_name(&mut self) -> ParseResult<String> {
        let mut name = self.parse_markup_identifier("tag name")?;

        if self.eat_char(':') {
            name.push(':');
            name.push_str(&self.parse_markup_identifier("tag name")?);
            return Ok(name);
        }

        while self.eat_char('.') {
            name.push('.');
            name.push_str(&self.parse_markup_identifier("tag name")?);
        }

        Ok(name)
    }

    fn parse_attributes(&mut self) -> ParseResult<Vec<AttributeItem>> {
        let mut attributes = Vec::new();

        loop {
            self.skip_markup_trivia();
            match self.peek_char() {
                None => return Err(ParseError::unexpected_eof(self.pos, "'>'")),
                Some('>') | Some('/') => return Ok(attributes),
                Some('{') => attributes.push(AttributeItem::Spread(self.parse_spread_attribute()?)),
                Some(_) => attributes.push(AttributeItem::Attribute(self.parse_attribute()?)),
            }
        }
    }

    fn parse_spread_attribute(&mut self) -> ParseResult<SpreadAttribute> {
        let start = self.pos;
        self.pos += 1;
        self.expect(Token::Ellipsis)?;
        let argument = self.parse_expression()?;
        self.expect(Token::RBrace)?;

        Ok(SpreadAttribute {
            argument,
            span: Span::new(start, self.pos),
        })
    }

    fn parse_attribute(&mut self) -> ParseResult<Attribute> {
        let start = self.pos;
        let mut name = self.parse_markup_identifier("attribute name")?;
        if self.eat_char(':') {
            name.push(':');
            name.push_str(&self.parse_markup_identifier("attribute name")?);
        }

        let name_end = self.pos;
        self.skip_markup_trivia();

        if !self.eat_char('=') {
            self.pos = name_end;
            return Ok(Attribute {
                name,
                value: None,
                span: Span::new(start, name_end),
            });
        }

        self.skip_markup_trivia();

        let value = match self.peek_char() {
            Some(quote @ ('"' | '\'')) => AttributeValue::String(self.parse_attribute_string(quote)?),
            Some('{') => {
                let container_start = self.pos;
                self.pos += 1;
                if let Some((Token::RBrace, range)) = self.peek()? {
                    return Err(ParseError::invalid_syntax(
                        Span::new(container_start, range.end),
                        "Attributes must only be assigned a non-empty expression",
                    ));
                }
                let expression = self.parse_expression()?;
                self.expect(Token::RBrace)?;
                AttributeValue::Expression(ExpressionContainer {
                    expression,
                    span: Span::new(container_start, self.pos),
                })
            }
            Some('<') => self.parse_tag()?.into_attribute_value(),
            Some(other) => {
                return Err(ParseError::unexpected_token(
                    Span::new(self.pos, self.pos + other.len_utf8()),
                    "attribute value",
                    format!("'{}'", other),
                ))
            }
            None => return Err(ParseError::unexpected_eof(self.pos, "attribute value")),
        };

        Ok(Attribute {
            name,
            value: Some(value),
            span: Span::new(start, self.pos),
        })
    }

    /// Quoted attribute value; no backslash escapes, only character references
    fn parse_attribute_string(&mut self, quote: char) -> ParseResult<StringLiteral> {
        let start = self.pos;
        self.pos += quote.len_utf8();

        let Some(len) = self.rest().find(quote) else {
            return Err(ParseError::unexpected_eof(
                self.source.len(),
                format!("closing {}", quote),
            ));
        };

        let inner = &self.source[self.pos..self.pos + len];
        self.pos += len + quote.len_utf8();

        Ok(StringLiteral {
            value: decode_entities(inner),
            raw: self.source[start..self.pos].to_string(),
            span: Span::new(start, self.pos),
        })
    }

    fn parse_markup_identifier(&mut self, what: &str) -> ParseResult<String> {
        let start = self.pos;

        match self.peek_char() {
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
            Some(c) => {
                return Err(ParseError::unexpected_token(
                    Span::new(start, start + c.len_utf8()),
                    what,
                    format!("'{}'", c),
                ))
            }
            None => return Err(ParseError::unexpected_eof(start, what)),
        }

        let len = self
            .rest()
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '$' | '-')))
            .unwrap_or(self.rest().len());
        self.pos += len;

        Ok(self.source[start..self.pos].to_string())
    }

    /// Whitespace and comments between tag parts
    fn skip_markup_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();

            if self.starts_with("/*") {
                match self.rest()[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => self.pos = self.source.len(),
                }
            } else if self.starts_with("//") {
                match self.rest().find('\n') {
                    Some(end) => self.pos += end + 1,
                    None => self.pos = self.source.len(),
                }
            } else {
                return;
            }
        }
    }

    // ---- Cursor helpers ----

    pub(crate) fn enter(&mut self, pos: usize) -> ParseResult<()> {
        if self.depth >= self.options.max_depth {
            return Err(ParseError::recursion_limit(pos, self.options.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub(crate) fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn eat_char(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, expected: &str) -> bool {
        if self.starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    fn expect_char(&mut self, expected: char) -> ParseResult<()> {
        if self.eat_char(expected) {
            return Ok(());
        }
        match self.peek_char() {
            Some(found) => Err(ParseError::unexpected_token(
                Span::new(self.pos, self.pos + found.len_utf8()),
                format!("'{}'", expected),
                format!("'{}'", found),
            )),
            None => Err(ParseError::unexpected_eof(self.pos, format!("'{}'", expected))),
        }
    }

    // ---- Token helpers ----

    /// Lex the next expression token without consuming it
    pub(crate) fn peek(&self) -> ParseResult<Option<Spanned<'src>>> {
        let rest = self.rest();
        let mut lexer = Token::lexer(rest);

        match lexer.next() {
            None => Ok(None),
            Some(Ok(token)) => {
                let span = lexer.span();
                Ok(Some((token, self.pos + span.start..self.pos + span.end)))
            }
            Some(Err(_)) => {
                let span = lexer.span();
                Err(ParseError::lex_error(
                    Span::new(self.pos + span.start, self.pos + span.end),
                    format!("Unexpected character {:?}", lexer.slice()),
                ))
            }
        }
    }

    pub(crate) fn advance(&mut self) -> ParseResult<Option<Spanned<'src>>> {
        let next = self.peek()?;
        if let Some((_, range)) = &next {
            self.pos = range.end;
        }
        Ok(next)
    }

    pub(crate) fn check(&self, token: Token) -> bool {
        match self.peek() {
            Ok(Some((t, _))) => std::mem::discriminant(&t) == std::mem::discriminant(&token),
            _ => false,
        }
    }

    pub(crate) fn match_token(&mut self, token: Token) -> bool {
        match self.peek() {
            Ok(Some((t, range))) if std::mem::discriminant(&t) == std::mem::discriminant(&token) => {
                self.pos = range.end;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn expect(&mut self, token: Token) -> ParseResult<Range<usize>> {
        match self.peek()? {
            Some((t, range)) if std::mem::discriminant(&t) == std::mem::discriminant(&token) => {
                self.pos = range.end;
                Ok(range)
            }
            Some((t, range)) => Err(ParseError::unexpected_token(
                range.into(),
                token.to_string(),
                t.to_string(),
            )),
            None => Err(ParseError::unexpected_eof(self.source.len(), token.to_string())),
        }
    }

    pub(crate) fn expect_ident(&mut self) -> ParseResult<String> {
        match self.advance()? {
            Some((Token::Ident(name), _)) => Ok(name.to_string()),
            Some((token, range)) => Err(ParseError::unexpected_token(
                range.into(),
                "identifier",
                token.to_string(),
            )),
            None => Err(ParseError::unexpected_eof(self.source.len(), "identifier")),
        }
    }
}

/// Parse markup text into the children of an implicit root
pub fn parse_markup(input: &str, options: &ParserOptions) -> ParseResult<Vec<Node>> {
    Parser::new(input, *options).parse_markup()
}

pub fn parse_program(source: &str) -> ParseResult<Program> {
    Parser::new(source, ParserOptions::default()).parse_program()
}

pub fn parse_expression(source: &str) -> ParseResult<Expression> {
    Parser::new(source, ParserOptions::default()).parse_standalone_expression()
}
