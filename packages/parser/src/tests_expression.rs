use crate::*;

fn expr(source: &str) -> Expression {
    parse_expression(source).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", source, e))
}

#[test]
fn test_literals() {
    assert!(matches!(
        expr("42"),
        Expression::Literal { value: LiteralValue::Number(n), .. } if n == 42.0
    ));
    assert!(matches!(
        expr("0x1F"),
        Expression::Literal { value: LiteralValue::Number(n), .. } if n == 31.0
    ));
    assert!(matches!(
        expr(r#""a\tb""#),
        Expression::Literal { value: LiteralValue::String(s), .. } if s == "a\tb"
    ));
    assert!(matches!(
        expr("true"),
        Expression::Literal { value: LiteralValue::Boolean(true), .. }
    ));
    assert!(matches!(
        expr("null"),
        Expression::Literal { value: LiteralValue::Null, .. }
    ));
}

#[test]
fn test_binary_precedence() {
    // a + b * c parses as a + (b * c)
    match expr("a + b * c") {
        Expression::Binary {
            operator: BinaryOperator::Add,
            right,
            ..
        } => assert!(matches!(
            *right,
            Expression::Binary {
                operator: BinaryOperator::Multiply,
                ..
            }
        )),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_exponent_is_right_associative() {
    match expr("2 ** 3 ** 2") {
        Expression::Binary { left, right, .. } => {
            assert!(left.is_literal());
            assert!(matches!(
                *right,
                Expression::Binary {
                    operator: BinaryOperator::Exponent,
                    ..
                }
            ));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_logical_binds_looser_than_comparison() {
    match expr("a < b && c || d") {
        Expression::Logical {
            operator: LogicalOperator::Or,
            left,
            ..
        } => assert!(matches!(
            *left,
            Expression::Logical {
                operator: LogicalOperator::And,
                ..
            }
        )),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_conditional_nests_right() {
    match expr("a ? b : c ? d : e") {
        Expression::Conditional { alternate, .. } => {
            assert!(matches!(*alternate, Expression::Conditional { .. }))
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_member_and_call_chain() {
    match expr("props.items[0].label.toUpperCase()") {
        Expression::Call { callee, arguments, .. } => {
            assert!(arguments.is_empty());
            match *callee {
                Expression::Member {
                    property: MemberProperty::Named(name),
                    ..
                } => assert_eq!(name, "toUpperCase"),
                other => panic!("unexpected {:?}", other),
            }
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_keyword_property_names() {
    assert!(matches!(
        expr("module.default"),
        Expression::Member { property: MemberProperty::Named(name), .. } if name == "default"
    ));
    assert!(matches!(
        expr("x.in"),
        Expression::Member { property: MemberProperty::Named(name), .. } if name == "in"
    ));
}

#[test]
fn test_arrow_functions() {
    match expr("(a, b) => a + b") {
        Expression::Arrow {
            params, is_async, ..
        } => {
            assert_eq!(params, vec!["a".to_string(), "b".to_string()]);
            assert!(!is_async);
        }
        other => panic!("unexpected {:?}", other),
    }

    assert!(matches!(expr("x => x"), Expression::Arrow { params, .. } if params == ["x"]));
    assert!(matches!(expr("() => 1"), Expression::Arrow { params, .. } if params.is_empty()));
    assert!(matches!(
        expr("async () => 1"),
        Expression::Arrow { is_async: true, .. }
    ));
    // parenthesized expression, not an arrow
    assert!(matches!(expr("(a)"), Expression::Identifier { .. }));
    assert!(matches!(expr("async"), Expression::Identifier { .. }));
}

#[test]
fn test_block_arrow_body_rejected() {
    assert!(matches!(
        parse_expression("x => { return x }"),
        Err(ParseError::InvalidSyntax { .. })
    ));
}

#[test]
fn test_template_literal() {
    match expr("`Hello ${user.name}, you have ${count} new`") {
        Expression::Template {
            quasis,
            expressions,
            ..
        } => {
            assert_eq!(quasis.len(), 3);
            assert_eq!(expressions.len(), 2);
            assert_eq!(quasis[0].cooked, "Hello ");
            assert_eq!(quasis[1].cooked, ", you have ");
            assert_eq!(quasis[2].cooked, " new");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_template_escapes_and_nesting() {
    match expr(r"`a\`b ${ `inner ${x}` } \${no}`") {
        Expression::Template {
            quasis,
            expressions,
            ..
        } => {
            assert_eq!(quasis[0].cooked, "a`b ");
            assert_eq!(quasis[0].raw, r"a\`b ");
            assert!(matches!(expressions[0], Expression::Template { .. }));
            assert_eq!(quasis[1].cooked, " ${no}");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_object_and_array_literals() {
    match expr("{ a: 1, 'b-c': [1, 2,], 3: x, d, }") {
        Expression::Object { properties, .. } => {
            let keys: Vec<&str> = properties.iter().map(|p| p.key.name()).collect();
            assert_eq!(keys, vec!["a", "b-c", "3", "d"]);
            assert!(properties[3].shorthand);
            assert!(matches!(&properties[1].value, Expression::Array { elements, .. } if elements.len() == 2));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_unary_operators() {
    assert!(matches!(
        expr("-1"),
        Expression::Unary {
            operator: UnaryOperator::Minus,
            ..
        }
    ));
    assert!(matches!(
        expr("typeof x === 'string'"),
        Expression::Binary {
            operator: BinaryOperator::StrictEqual,
            ..
        }
    ));
    assert!(matches!(
        expr("!!ready"),
        Expression::Unary { operator: UnaryOperator::Not, argument, .. }
            if matches!(*argument, Expression::Unary { .. })
    ));
}

#[test]
fn test_markup_in_expression_position() {
    assert!(matches!(
        expr("cond && <b>yes</b>"),
        Expression::Logical { right, .. } if matches!(*right, Expression::Element(_))
    ));
    assert!(matches!(expr("<></>"), Expression::Fragment(_)));
}

#[test]
fn test_trailing_tokens_rejected() {
    assert!(matches!(
        parse_expression("a b"),
        Err(ParseError::UnexpectedToken { .. })
    ));
}

#[test]
fn test_lex_error_reported() {
    assert!(matches!(
        parse_expression("a # b"),
        Err(ParseError::LexError { .. })
    ));
}

#[test]
fn test_deep_parentheses_hit_limit() {
    let source = format!("{}1{}", "(".repeat(400), ")".repeat(400));
    assert!(matches!(
        parse_expression(&source),
        Err(ParseError::RecursionLimitExceeded { .. })
    ));
}

#[test]
fn test_spans_cover_source() {
    let source = "  foo.bar(1)  ";
    let expression = expr(source);
    let span = expression.span();
    assert_eq!(&source[span.start..span.end], "foo.bar(1)");
}
