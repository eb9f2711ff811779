use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;
use crate::tokenizer::{unescape, Token};

/// Operator in infix position; logical operators share the precedence
/// ladder with the binary ones so one climbing loop handles both
#[derive(Debug, Clone, Copy)]
enum InfixOperator {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
}

impl InfixOperator {
    fn from_token(token: &Token) -> Option<Self> {
        let binary = match token {
            Token::OrOr => return Some(InfixOperator::Logical(LogicalOperator::Or)),
            Token::AndAnd => return Some(InfixOperator::Logical(LogicalOperator::And)),
            Token::Pipe => BinaryOperator::BitOr,
            Token::Caret => BinaryOperator::BitXor,
            Token::Ampersand => BinaryOperator::BitAnd,
            Token::EqEq => BinaryOperator::Equal,
            Token::NotEq => BinaryOperator::NotEqual,
            Token::EqEqEq => BinaryOperator::StrictEqual,
            Token::NotEqEq => BinaryOperator::StrictNotEqual,
            Token::LAngle => BinaryOperator::LessThan,
            Token::LessEqual => BinaryOperator::LessThanOrEqual,
            Token::RAngle => BinaryOperator::GreaterThan,
            Token::GreaterEqual => BinaryOperator::GreaterThanOrEqual,
            Token::In => BinaryOperator::In,
            Token::Instanceof => BinaryOperator::Instanceof,
            Token::ShiftLeft => BinaryOperator::ShiftLeft,
            Token::ShiftRight => BinaryOperator::ShiftRight,
            Token::UnsignedShiftRight => BinaryOperator::UnsignedShiftRight,
            Token::Plus => BinaryOperator::Add,
            Token::Minus => BinaryOperator::Subtract,
            Token::Star => BinaryOperator::Multiply,
            Token::Slash => BinaryOperator::Divide,
            Token::Percent => BinaryOperator::Remainder,
            Token::StarStar => BinaryOperator::Exponent,
            _ => return None,
        };
        Some(InfixOperator::Binary(binary))
    }

    fn precedence(&self) -> u8 {
        match self {
            InfixOperator::Binary(op) => op.precedence(),
            InfixOperator::Logical(op) => op.precedence(),
        }
    }

    fn is_right_associative(&self) -> bool {
        matches!(self, InfixOperator::Binary(BinaryOperator::Exponent))
    }
}

fn unary_operator(token: &Token) -> Option<UnaryOperator> {
    match token {
        Token::Plus => Some(UnaryOperator::Plus),
        Token::Minus => Some(UnaryOperator::Minus),
        Token::Bang => Some(UnaryOperator::Not),
        Token::Tilde => Some(UnaryOperator::BitNot),
        Token::Typeof => Some(UnaryOperator::Typeof),
        Token::Void => Some(UnaryOperator::Void),
        _ => None,
    }
}

pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok().map(|n| n as f64),
        None => raw.parse::<f64>().ok(),
    }
}

/// Property-key spelling of a numeric literal (`{ 1.0: x }` has key `"1"`)
fn number_key(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn strip_quotes(raw: &str) -> &str {
    if raw.len() >= 2 {
        &raw[1..raw.len() - 1]
    } else {
        ""
    }
}

impl<'src> Parser<'src> {
    /// Parse an assignment-level expression (arrow, conditional or below)
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.enter(self.pos)?;
        let result = match self.try_parse_arrow() {
            Ok(Some(arrow)) => Ok(arrow),
            Ok(None) => self.parse_conditional(),
            Err(error) => Err(error),
        };
        self.leave();
        result
    }

    /// Arrow functions are recognized by scanning the parameter list and
    /// looking for `=>`; on mismatch the cursor is rewound.
    fn try_parse_arrow(&mut self) -> ParseResult<Option<Expression>> {
        let checkpoint = self.pos;
        let Some((token, range)) = self.peek()? else {
            return Ok(None);
        };

        let start = range.start;
        let is_async = matches!(token, Token::Async);
        if is_async {
            self.pos = range.end;
        }

        let params = match self.scan_arrow_params() {
            Some(params) if self.check(Token::Arrow) => params,
            _ => {
                self.pos = checkpoint;
                return Ok(None);
            }
        };
        self.expect(Token::Arrow)?;

        if let Some((Token::LBrace, brace)) = self.peek()? {
            return Err(ParseError::invalid_syntax(
                brace.into(),
                "Arrow functions with block bodies are not supported",
            ));
        }

        let body = self.parse_expression()?;
        let span = Span::new(start, body.span().end);

        Ok(Some(Expression::Arrow {
            params,
            body: Box::new(body),
            is_async,
            span,
        }))
    }

    /// `x` or `(a, b, c)`; `None` when the input is not a parameter list
    fn scan_arrow_params(&mut self) -> Option<Vec<String>> {
        let (token, _) = self.advance().ok().flatten()?;
        match token {
            Token::Ident(name) => Some(vec![name.to_string()]),
            Token::LParen => {
                let mut params = Vec::new();
                if self.match_token(Token::RParen) {
                    return Some(params);
                }
                loop {
                    match self.advance().ok().flatten()? {
                        (Token::Ident(name), _) => params.push(name.to_string()),
                        _ => return None,
                    }
                    if self.match_token(Token::RParen) {
                        return Some(params);
                    }
                    if !self.match_token(Token::Comma) {
                        return None;
                    }
                    if self.match_token(Token::RParen) {
                        return Some(params);
                    }
                }
            }
            _ => None,
        }
    }

    fn parse_conditional(&mut self) -> ParseResult<Expression> {
        let test = self.parse_binary(0)?;

        if !self.match_token(Token::Question) {
            return Ok(test);
        }

        let consequent = self.parse_expression()?;
        self.expect(Token::Colon)?;
        let alternate = self.parse_expression()?;
        let span = Span::new(test.span().start, alternate.span().end);

        Ok(Expression::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            span,
        })
    }

    /// Precedence climbing over binary and logical operators
    fn parse_binary(&mut self, min_precedence: u8) -> ParseResult<Expression> {
        self.enter(self.pos)?;
        let result = self.parse_binary_inner(min_precedence);
        self.leave();
        result
    }

    fn parse_binary_inner(&mut self, min_precedence: u8) -> ParseResult<Expression> {
        let mut left = self.parse_unary()?;

        loop {
            let Some((token, range)) = self.peek()? else {
                break;
            };
            // `<` right after markup opens the next element, never a comparison
            if matches!(token, Token::LAngle)
                && matches!(left, Expression::Element(_) | Expression::Fragment(_))
            {
                break;
            }
            let Some(operator) = InfixOperator::from_token(&token) else {
                break;
            };
            let precedence = operator.precedence();
            if precedence < min_precedence {
                break;
            }
            self.pos = range.end;

            let next_min = if operator.is_right_associative() {
                precedence
            } else {
                precedence + 1
            };
            let right = self.parse_binary(next_min)?;
            let span = Span::new(left.span().start, right.span().end);

            left = match operator {
                InfixOperator::Binary(operator) => Expression::Binary {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                    span,
                },
                InfixOperator::Logical(operator) => Expression::Logical {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                    span,
                },
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expression> {
        let Some((token, range)) = self.peek()? else {
            return Err(ParseError::unexpected_eof(self.pos, "expression"));
        };

        let Some(operator) = unary_operator(&token) else {
            return self.parse_postfix();
        };

        self.pos = range.end;
        self.enter(range.start)?;
        let argument = self.parse_unary();
        self.leave();
        let argument = argument?;

        Ok(Expression::Unary {
            operator,
            span: Span::new(range.start, argument.span().end),
            argument: Box::new(argument),
        })
    }

    /// Member access and calls
    fn parse_postfix(&mut self) -> ParseResult<Expression> {
        let mut expression = self.parse_primary()?;

        loop {
            let Some((token, range)) = self.peek()? else {
                break;
            };
            let start = expression.span().start;

            match token {
                Token::Dot => {
                    self.pos = range.end;
                    let name = self.expect_property_name()?;
                    expression = Expression::Member {
                        object: Box::new(expression),
                        property: MemberProperty::Named(name),
                        span: Span::new(start, self.pos),
                    };
                }
                Token::LBracket => {
                    self.pos = range.end;
                    let property = self.parse_expression()?;
                    self.expect(Token::RBracket)?;
                    expression = Expression::Member {
                        object: Box::new(expression),
                        property: MemberProperty::Computed(Box::new(property)),
                        span: Span::new(start, self.pos),
                    };
                }
                Token::LParen => {
                    self.pos = range.end;
                    let arguments = self.parse_arguments()?;
                    expression = Expression::Call {
                        callee: Box::new(expression),
                        arguments,
                        span: Span::new(start, self.pos),
                    };
                }
                _ => break,
            }
        }

        Ok(expression)
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        let mut arguments = Vec::new();

        loop {
            if self.match_token(Token::RParen) {
                break;
            }
            arguments.push(self.parse_expression()?);
            if !self.match_token(Token::Comma) {
                self.expect(Token::RParen)?;
                break;
            }
        }

        Ok(arguments)
    }

    fn expect_property_name(&mut self) -> ParseResult<String> {
        match self.advance()? {
            Some((Token::Ident(name), _)) => Ok(name.to_string()),
            Some((token, range)) => match token.keyword_text() {
                Some(keyword) => Ok(keyword.to_string()),
                None => Err(ParseError::unexpected_token(
                    range.into(),
                    "property name",
                    token.to_string(),
                )),
            },
            None => Err(ParseError::unexpected_eof(self.pos, "property name")),
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let Some((token, range)) = self.peek()? else {
            return Err(ParseError::unexpected_eof(self.pos, "expression"));
        };
        let span = Span::from(range.clone());

        let literal = |value: LiteralValue, raw: &str| Expression::Literal {
            value,
            raw: raw.to_string(),
            span,
        };

        let expression = match token {
            Token::Ident(name) => Expression::Identifier {
                name: name.to_string(),
                span,
            },
            // `async` not followed by an arrow is an ordinary name
            Token::Async => Expression::Identifier {
                name: "async".to_string(),
                span,
            },
            Token::Number(raw) => {
                let value = parse_number(raw)
                    .ok_or_else(|| ParseError::lex_error(span, "Invalid number literal"))?;
                literal(LiteralValue::Number(value), raw)
            }
            Token::String(raw) => literal(LiteralValue::String(unescape(strip_quotes(raw))), raw),
            Token::True => literal(LiteralValue::Boolean(true), "true"),
            Token::False => literal(LiteralValue::Boolean(false), "false"),
            Token::Null => literal(LiteralValue::Null, "null"),
            Token::Backtick => {
                self.pos = range.end;
                return self.parse_template(range.start);
            }
            Token::LParen => {
                self.pos = range.end;
                let inner = self.parse_expression()?;
                self.expect(Token::RParen)?;
                return Ok(inner);
            }
            Token::LBracket => {
                self.pos = range.end;
                return self.parse_array(range.start);
            }
            Token::LBrace => {
                self.pos = range.end;
                return self.parse_object(range.start);
            }
            Token::LAngle => {
                self.pos = range.start;
                return Ok(self.parse_tag()?.into_expression());
            }
            other => {
                return Err(ParseError::unexpected_token(
                    span,
                    "expression",
                    other.to_string(),
                ))
            }
        };

        self.pos = range.end;
        Ok(expression)
    }

    fn parse_array(&mut self, start: usize) -> ParseResult<Expression> {
        let mut elements = Vec::new();

        loop {
            if self.match_token(Token::RBracket) {
                break;
            }
            elements.push(self.parse_expression()?);
            if !self.match_token(Token::Comma) {
                self.expect(Token::RBracket)?;
                break;
            }
        }

        Ok(Expression::Array {
            elements,
            span: Span::new(start, self.pos),
        })
    }

    fn parse_object(&mut self, start: usize) -> ParseResult<Expression> {
        let mut properties = Vec::new();

        loop {
            if self.match_token(Token::RBrace) {
                break;
            }

            let Some((token, range)) = self.advance()? else {
                return Err(ParseError::unexpected_eof(self.pos, "property key"));
            };
            let key_span = Span::from(range.clone());

            let (key, shorthand_name) = match token {
                Token::Ident(name) => (PropertyKey::Identifier(name.to_string()), Some(name)),
                Token::String(raw) => (
                    PropertyKey::Literal {
                        value: unescape(strip_quotes(raw)),
                        raw: raw.to_string(),
                    },
                    None,
                ),
                Token::Number(raw) => {
                    let value = parse_number(raw)
                        .ok_or_else(|| ParseError::lex_error(key_span, "Invalid number literal"))?;
                    (
                        PropertyKey::Literal {
                            value: number_key(value),
                            raw: raw.to_string(),
                        },
                        None,
                    )
                }
                other => match other.keyword_text() {
                    Some(keyword) => (PropertyKey::Identifier(keyword.to_string()), None),
                    None => {
                        return Err(ParseError::unexpected_token(
                            key_span,
                            "property key",
                            other.to_string(),
                        ))
                    }
                },
            };

            let (value, shorthand) = if self.match_token(Token::Colon) {
                (self.parse_expression()?, false)
            } else if let Some(name) = shorthand_name {
                (
                    Expression::Identifier {
                        name: name.to_string(),
                        span: key_span,
                    },
                    true,
                )
            } else {
                return Err(match self.peek()? {
                    Some((found, range)) => {
                        ParseError::unexpected_token(range.into(), "':'", found.to_string())
                    }
                    None => ParseError::unexpected_eof(self.pos, "':'"),
                });
            };

            let span = Span::new(key_span.start, value.span().end.max(key_span.end));
            properties.push(Property {
                key,
                value,
                shorthand,
                span,
            });

            if !self.match_token(Token::Comma) {
                self.expect(Token::RBrace)?;
                break;
            }
        }

        Ok(Expression::Object {
            properties,
            span: Span::new(start, self.pos),
        })
    }

    /// Template body after the opening backtick; `${` switches back to
    /// expression tokens until the matching `}`
    fn parse_template(&mut self, start: usize) -> ParseResult<Expression> {
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        let mut segment_start = self.pos;

        loop {
            let Some(c) = self.peek_char() else {
                return Err(ParseError::unexpected_eof(self.pos, "'`'"));
            };

            match c {
                '`' => {
                    quasis.push(self.template_segment(segment_start, self.pos));
                    self.pos += 1;
                    break;
                }
                '\\' => {
                    self.pos += 1;
                    if let Some(escaped) = self.peek_char() {
                        self.pos += escaped.len_utf8();
                    }
                }
                '$' if self.starts_with("${") => {
                    quasis.push(self.template_segment(segment_start, self.pos));
                    self.pos += 2;
                    expressions.push(self.parse_expression()?);
                    self.expect(Token::RBrace)?;
                    segment_start = self.pos;
                }
                other => self.pos += other.len_utf8(),
            }
        }

        Ok(Expression::Template {
            quasis,
            expressions,
            span: Span::new(start, self.pos),
        })
    }

    fn template_segment(&self, start: usize, end: usize) -> TemplateSegment {
        let raw = &self.source[start..end];
        TemplateSegment {
            cooked: unescape(raw),
            raw: raw.to_string(),
            span: Span::new(start, end),
        }
    }
}
