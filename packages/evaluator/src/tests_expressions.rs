use crate::diagnostics::Diagnostic;
use crate::evaluator::EvalError;
use crate::interpreter::{interpret, InterpretError, Interpreter};
use crate::options::InterpretOptions;
use crate::scope::Scope;
use crate::value::{Function, Object, Value};
use tailbox_parser::parse_expression;

fn eval_with(options: InterpretOptions, source: &str) -> (Value, Vec<Diagnostic>) {
    let interpreter = Interpreter::new(options).unwrap();
    let evaluator = interpreter.evaluator();
    let expr = parse_expression(source).unwrap();
    let value = evaluator.evaluate(&expr, &Scope::new(), 0).unwrap();
    (value, evaluator.diagnostics())
}

fn eval(source: &str) -> Value {
    let (value, diagnostics) = eval_with(InterpretOptions::default(), source);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
    value
}

fn user_options() -> InterpretOptions {
    let mut profile = Object::new();
    profile.insert("name".to_string(), Value::from("Ada"));
    profile.insert("tags".to_string(), Value::array(vec![Value::from("math"), Value::from("code")]));
    let mut user = Object::new();
    user.insert("profile".to_string(), Value::object(profile));

    InterpretOptions::default()
        .with_binding("user", user)
        .with_binding("count", 3.0)
        .with_binding("items", vec![Value::from("a"), Value::from("b"), Value::from("c")])
}

#[test]
fn test_arithmetic() {
    assert_eq!(eval("1 + 1"), Value::Number(2.0));
    assert_eq!(eval("2 ** 3 ** 2"), Value::Number(512.0));
    assert_eq!(eval("7 % 4 * 2 - 1"), Value::Number(5.0));
    assert_eq!(eval("1 / 0"), Value::Number(f64::INFINITY));
    assert!(eval("0 / 0").to_number().is_nan());
}

#[test]
fn test_addition_coerces_like_javascript() {
    assert_eq!(eval("'1' + 1"), Value::from("11"));
    assert_eq!(eval("1 + true"), Value::Number(2.0));
    assert_eq!(eval("[1, 2] + 3"), Value::from("1,23"));
    assert_eq!(eval("null + 1"), Value::Number(1.0));
    assert!(eval("undefined + 1").to_number().is_nan());
    assert_eq!(eval("'3' * '4'"), Value::Number(12.0));
}

#[test]
fn test_comparisons() {
    assert_eq!(eval("1 < 2"), Value::Bool(true));
    assert_eq!(eval("'10' < '9'"), Value::Bool(true));
    assert_eq!(eval("'10' < 9"), Value::Bool(false));
    assert_eq!(eval("2 >= 2"), Value::Bool(true));
    assert_eq!(eval("1 == '1'"), Value::Bool(true));
    assert_eq!(eval("1 === '1'"), Value::Bool(false));
    assert_eq!(eval("null == undefined"), Value::Bool(true));
    assert_eq!(eval("null !== undefined"), Value::Bool(true));
    assert_eq!(eval("undefined < 1"), Value::Bool(false));
}

#[test]
fn test_unsupported_binary_operators_are_undefined() {
    assert_eq!(eval("1 | 2"), Value::Undefined);
    assert_eq!(eval("1 << 2"), Value::Undefined);
    assert_eq!(eval("'a' in x"), Value::Undefined);
}

#[test]
fn test_logical_operators() {
    assert_eq!(eval("0 || 'fallback'"), Value::from("fallback"));
    assert_eq!(eval("'first' || 'second'"), Value::from("first"));
    assert_eq!(eval("1 && 'yes'"), Value::from("yes"));
    // A falsy left operand yields `false`, not the operand itself
    assert_eq!(eval("0 && 'yes'"), Value::Bool(false));
    assert_eq!(eval("'' && 'yes'"), Value::Bool(false));
}

#[test]
fn test_conditional() {
    assert_eq!(eval("1 > 2 ? 'a' : 'b'"), Value::from("b"));
    assert_eq!(eval("[] ? 'truthy' : 'falsy'"), Value::from("truthy"));
}

#[test]
fn test_identifiers_resolve_through_bindings() {
    let (value, _) = eval_with(user_options(), "count * 2");
    assert_eq!(value, Value::Number(6.0));
    assert_eq!(eval("missing"), Value::Undefined);
}

#[test]
fn test_unicode_identifiers_resolve() {
    let options = InterpretOptions::default().with_binding("größe", 4.0);
    let (value, _) = eval_with(options, "[1, 2].map(zähler => zähler * größe)");
    assert_eq!(value, Value::array(vec![Value::Number(4.0), Value::Number(8.0)]));
}

#[test]
fn test_template_literal() {
    let (value, _) = eval_with(user_options(), "`${user.profile.name} has ${count} items`");
    assert_eq!(value, Value::from("Ada has 3 items"));
    assert_eq!(eval("`${1}${2}`"), Value::from("12"));
    assert_eq!(eval("`a\\tb`"), Value::from("a\tb"));
}

#[test]
fn test_member_paths() {
    let options = user_options();
    assert_eq!(eval_with(options.clone(), "user.profile.name").0, Value::from("Ada"));
    assert_eq!(eval_with(options.clone(), "user['profile'].tags[1]").0, Value::from("code"));
    assert_eq!(eval_with(options.clone(), "items[count - 1]").0, Value::from("c"));
    assert_eq!(eval_with(options.clone(), "user.profile.missing").0, Value::Undefined);
    assert_eq!(eval("'abc'.length"), Value::Number(3.0));
    assert_eq!(eval("[10, 20][1]"), Value::Number(20.0));
}

#[test]
fn test_failed_member_path_reports_and_yields_undefined() {
    let (value, diagnostics) = eval_with(user_options(), "user.account.id");
    assert_eq!(value, Value::Undefined);
    assert_eq!(diagnostics.len(), 1);
    match &diagnostics[0] {
        Diagnostic::UnresolvedMember { path, .. } => {
            assert_eq!(path, r#"user["account"]["id"]"#)
        }
        other => panic!("unexpected diagnostic {:?}", other),
    }
}

#[test]
fn test_methods_are_bound_to_their_parent() {
    let options = user_options();
    assert_eq!(
        eval_with(options.clone(), "user.profile.name.toUpperCase()").0,
        Value::from("ADA")
    );
    assert_eq!(
        eval_with(options.clone(), "user.profile.tags.join(' & ')").0,
        Value::from("math & code")
    );
    assert_eq!(eval("'a-b'.split('-').length"), Value::Number(2.0));
    assert_eq!(eval("(1.005).toFixed(1)"), Value::from("1.0"));
}

#[test]
fn test_bound_host_function() {
    let greet = Function::new("greet", |_, args| {
        Ok(Value::String(format!("Hello, {}!", args[0].to_js_string())))
    });
    let (value, _) = eval_with(InterpretOptions::default().with_binding("greet", greet), "greet('Ada')");
    assert_eq!(value, Value::from("Hello, Ada!"));
}

#[test]
fn test_calling_non_function_reports() {
    let (value, diagnostics) = eval_with(user_options(), "count()");
    assert_eq!(value, Value::Undefined);
    assert!(matches!(&diagnostics[..], [Diagnostic::NotCallable { callee, .. }] if callee == "count"));

    let (value, diagnostics) = eval_with(user_options(), "user.nothing()");
    assert_eq!(value, Value::Undefined);
    assert!(matches!(&diagnostics[..], [Diagnostic::NotCallable { callee, .. }] if callee == "user.nothing"));
}

#[test]
fn test_arrow_functions() {
    let (value, _) = eval_with(user_options(), "items.map((item, i) => `${i}:${item}`).join(',')");
    assert_eq!(value, Value::from("0:a,1:b,2:c"));

    let (value, _) = eval_with(user_options(), "items.filter(item => item !== 'b').length");
    assert_eq!(value, Value::Number(2.0));
}

#[test]
fn test_arrow_sees_bindings_but_not_enclosing_scope() {
    // `x` is a parameter of the outer arrow only; the inner arrow's scope
    // holds just `y`, so `x` falls through to bindings
    let options = InterpretOptions::default()
        .with_binding("x", "binding")
        .with_binding("list", vec![Value::Number(1.0)]);
    let (value, _) = eval_with(options, "[1].map(x => list.map(y => x))[0][0]");
    assert_eq!(value, Value::from("binding"));
}

#[test]
fn test_missing_arrow_arguments_are_undefined() {
    let (value, _) = eval_with(
        InterpretOptions::default().with_binding("items", vec![Value::Number(1.0)]),
        "items.map((a, b, c, d) => d)[0]",
    );
    assert_eq!(value, Value::Undefined);
}

#[test]
fn test_async_arrow_is_rejected() {
    let (value, diagnostics) = eval_with(InterpretOptions::default(), "async () => 1");
    assert_eq!(value, Value::Undefined);
    assert!(matches!(&diagnostics[..], [Diagnostic::UnsupportedArrow { .. }]));
}

#[test]
fn test_unary_only_applies_to_literals() {
    assert_eq!(eval("-1"), Value::Number(-1.0));
    assert_eq!(eval("+'42'"), Value::Number(42.0));
    assert_eq!(eval("!0"), Value::Bool(true));
    assert_eq!(eval("!''"), Value::Bool(true));
    assert_eq!(eval("-(1 + 1)"), Value::Undefined);
    assert_eq!(eval("!!true"), Value::Undefined);
    assert_eq!(eval("typeof 1"), Value::Undefined);
}

#[test]
fn test_array_and_object_literals() {
    let value = eval("{ a: 1, 'b-c': [true, null], 3: 'x', a: 2 }");
    let object = value.as_object().unwrap();
    assert_eq!(object.keys().collect::<Vec<_>>(), vec!["a", "b-c", "3"]);
    assert_eq!(object["a"], Value::Number(2.0));
    assert_eq!(object["b-c"], Value::array(vec![Value::Bool(true), Value::Null]));

    let (value, _) = eval_with(user_options(), "{ count }");
    assert_eq!(value.as_object().unwrap()["count"], Value::Number(3.0));
}

#[test]
fn test_recursion_limit() {
    let options = InterpretOptions {
        max_depth: 8,
        ..Default::default()
    };
    let interpreter = Interpreter::new(options).unwrap();
    let evaluator = interpreter.evaluator();
    let expr = parse_expression("1 + 1 + 1 + 1 + 1 + 1 + 1 + 1 + 1 + 1").unwrap();
    let result = evaluator.evaluate(&expr, &Scope::new(), 0);
    assert!(matches!(result, Err(EvalError::RecursionLimitExceeded { limit: 8, .. })));
}

#[test]
fn test_self_application_hits_recursion_limit() {
    let result = interpret("{(f => f(f))(f => f(f))}", InterpretOptions::default());
    assert!(matches!(
        result,
        Err(InterpretError::RecursionLimitExceeded { limit: 256, .. })
    ));
}

#[test]
fn test_recursion_through_calls_counts_toward_limit() {
    let options = InterpretOptions {
        max_depth: 32,
        ..Default::default()
    };
    let interpreter = Interpreter::new(options).unwrap();
    let evaluator = interpreter.evaluator();
    let countdown = |n: usize| {
        format!(
            "(f => f(f, {}))((rec, n) => n > 0 ? rec(rec, n - 1) : 'done')",
            n
        )
    };

    let deep = parse_expression(&countdown(100)).unwrap();
    let result = evaluator.evaluate(&deep, &Scope::new(), 0);
    assert!(matches!(result, Err(EvalError::RecursionLimitExceeded { limit: 32, .. })));

    // The failed chain leaves no depth behind
    let shallow = parse_expression(&countdown(3)).unwrap();
    assert_eq!(
        evaluator.evaluate(&shallow, &Scope::new(), 0).unwrap(),
        Value::from("done")
    );
}

#[test]
fn test_bounded_recursion_under_default_limit() {
    let (value, diagnostics) = eval_with(
        InterpretOptions::default(),
        "(f => f(f, 20))((rec, n) => n > 0 ? rec(rec, n - 1) + 1 : 0)",
    );
    assert!(diagnostics.is_empty());
    assert_eq!(value, Value::Number(20.0));
}

#[test]
fn test_callbacks_do_not_inherit_depth_from_earlier_items() {
    let items: Vec<Value> = (0..200).map(|i| Value::from(format!("item{}", i))).collect();
    let options = InterpretOptions {
        max_depth: 24,
        ..Default::default()
    }
    .with_binding("items", items);
    let (value, diagnostics) = eval_with(options, "items.map(item => item.toUpperCase().toLowerCase()).length");
    assert!(diagnostics.is_empty());
    assert_eq!(value, Value::Number(200.0));
}
