use crate::diagnostics::Diagnostic;
use crate::interpreter::{InterpretError, Interpretation, Interpreter};
use crate::options::InterpretOptions;
use crate::registry::ComponentRef;
use crate::render::{Element, ElementType};
use crate::value::{Function, Object, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn run(options: InterpretOptions, markup: &str) -> Interpretation {
    Interpreter::new(options).unwrap().interpret(markup).unwrap()
}

fn roots(markup: &str) -> Vec<Value> {
    run(InterpretOptions::default(), markup).roots
}

fn element(value: &Value) -> &Element {
    value
        .as_element()
        .unwrap_or_else(|| panic!("expected an element, got {:?}", value))
}

fn host(value: &Value) -> &str {
    match &element(value).element_type {
        ElementType::Host(tag) => tag,
        other => panic!("expected a host element, got {:?}", other),
    }
}

/// Text rendered as a fragment wrapping the string
fn fragment_text(value: &Value) -> &str {
    let fragment = element(value);
    assert!(fragment.is_fragment());
    fragment.children.as_str().unwrap()
}

#[test]
fn test_expression_child_interprets_to_number() {
    let interpretation = run(InterpretOptions::default(), "{1+1}");
    assert_eq!(interpretation.roots, vec![Value::Number(2.0)]);

    let wrapper = element(&interpretation.tree);
    assert_eq!(wrapper.element_type, ElementType::Host("div".to_string()));
    assert_eq!(wrapper.prop("className"), Some(&Value::from("jsx-parser")));
    assert_eq!(wrapper.children, Value::Number(2.0));
}

#[test]
fn test_wrapper_options() {
    let options = InterpretOptions {
        class_name: Some("preview".to_string()),
        ..Default::default()
    };
    let tree = run(options, "<p />").tree;
    assert_eq!(element(&tree).prop("className"), Some(&Value::from("jsx-parser preview")));

    let options = InterpretOptions {
        render_in_wrapper: false,
        ..Default::default()
    };
    let tree = run(options, "<p /><p />").tree;
    let fragment = element(&tree);
    assert!(fragment.is_fragment());
    assert_eq!(fragment.child_list().len(), 2);
}

#[test]
fn test_text_becomes_fragment_unless_disabled() {
    let roots = roots("<p>Fish &amp; chips</p>");
    assert_eq!(fragment_text(&element(&roots[0]).children), "Fish & chips");

    let options = InterpretOptions {
        disable_fragments: true,
        ..Default::default()
    };
    let roots = run(options, "<p>Fish &amp; chips</p>").roots;
    assert_eq!(element(&roots[0]).children, Value::from("Fish & chips"));
}

#[test]
fn test_children_normalization_and_keys() {
    let roots = roots("<ul><li>a</li><li key=\"x\">b</li>{'text'}</ul>");
    let list = element(&roots[0]);
    let items = list.child_list();
    assert_eq!(items.len(), 3);
    assert_eq!(element(&items[0]).key.as_deref(), Some("0"));
    assert_eq!(element(&items[1]).key.as_deref(), Some("x"));
    assert_eq!(items[2], Value::from("text"));

    // Single child is not wrapped in an array and gets no key
    let roots = self::roots("<ul><li>a</li></ul>");
    let only = &element(&roots[0]).children;
    assert_eq!(host(only), "li");
    assert_eq!(element(only).key, None);

    let roots = self::roots("<div></div>");
    assert_eq!(element(&roots[0]).children, Value::Undefined);
}

#[test]
fn test_key_generation_can_be_disabled() {
    let options = InterpretOptions {
        disable_key_generation: true,
        ..Default::default()
    };
    let roots = run(options, "<ul><li>a</li><li>b</li></ul>").roots;
    for item in element(&roots[0]).child_list() {
        assert_eq!(element(item).key, None);
    }
}

#[test]
fn test_key_prop_sets_element_key() {
    let roots = roots("<li key={1 + 1}>two</li>");
    let item = element(&roots[0]);
    assert_eq!(item.key.as_deref(), Some("2"));
    assert!(item.prop("key").is_none());
}

#[test]
fn test_document_wrappers_unwrap_to_children() {
    let roots = roots("<html><body><p>x</p><span>y</span></body></html>");
    let html = roots[0].as_array().unwrap();
    assert_eq!(html.len(), 1);
    let body = html[0].as_array().unwrap();
    assert_eq!(host(&body[0]), "p");
    assert_eq!(host(&body[1]), "span");
}

#[test]
fn test_blacklisted_tag_reports_once_and_siblings_render() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let options = InterpretOptions::default().on_error(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let interpretation = run(options, "<div><script>alert(1)</script><p>ok</p></div>");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(
        &interpretation.diagnostics[..],
        [Diagnostic::BlacklistedTag { name, .. }] if name == "script"
    ));

    let children = element(&interpretation.roots[0]).child_list();
    assert_eq!(children[0], Value::Null);
    assert_eq!(host(&children[1]), "p");
}

#[test]
fn test_blacklisted_tag_uses_render_error() {
    let options = InterpretOptions {
        blacklisted_tags: vec!["IFRAME".to_string()],
        ..Default::default()
    }
    .render_error(|message| Value::from(format!("error: {}", message)));

    let roots = run(options, "<iframe src=\"x\" /><script />").roots;
    assert_eq!(
        roots[0],
        Value::from("error: The tag <iframe> is blacklisted, and will not be rendered.")
    );
    // Overriding the list drops the default `script` entry
    assert_eq!(host(&roots[1]), "script");
}

#[test]
fn test_components_resolve_by_dotted_path() {
    let options = InterpretOptions::default()
        .with_component("Card", ComponentRef::new("Card"))
        .with_component("Layout.Header", ComponentRef::new("layout/Header"));

    let roots = run(options, "<Card title=\"t\"><Layout.Header /></Card>").roots;
    let card = element(&roots[0]);
    assert_eq!(card.element_type, ElementType::Component(ComponentRef::new("Card")));
    assert_eq!(card.prop("title"), Some(&Value::from("t")));
    assert_eq!(
        element(&card.children).element_type,
        ElementType::Component(ComponentRef::new("layout/Header"))
    );
}

#[test]
fn test_components_only_rejects_unregistered_tags() {
    let options = InterpretOptions {
        components_only: true,
        ..Default::default()
    }
    .with_component("Card", ComponentRef::new("Card"))
    .render_unrecognized(|name| Value::from(format!("<{}?>", name)));

    let interpretation = run(options, "<Card /><div />");
    assert_eq!(interpretation.roots[1], Value::from("<div?>"));
    assert!(matches!(
        &interpretation.diagnostics[..],
        [Diagnostic::UnrecognizedComponent { name, .. }] if name == "div"
    ));
}

#[test]
fn test_unknown_elements() {
    let permissive = roots("<Widget />");
    assert_eq!(host(&permissive[0]), "widget");

    let options = InterpretOptions {
        allow_unknown_elements: false,
        ..Default::default()
    };
    let interpretation = run(options, "<Widget /><my-widget /><DIV />");
    assert_eq!(interpretation.roots[0], Value::Null);
    assert_eq!(host(&interpretation.roots[1]), "my-widget");
    assert_eq!(host(&interpretation.roots[2]), "div");
    assert!(matches!(
        &interpretation.diagnostics[..],
        [Diagnostic::UnrecognizedTag { name, .. }] if name == "Widget"
    ));
}

#[test]
fn test_table_tags_drop_whitespace_text() {
    let markup = "<table>\n  <tbody>\n    <tr><td>1</td></tr>\n  </tbody>\n</table>";
    let roots = roots(markup);
    let tbody = &element(&roots[0]).children;
    assert_eq!(host(tbody), "tbody");
    let tr = &element(tbody).children;
    assert_eq!(host(tr), "tr");

    // Other tags keep whitespace runs as text
    let roots = self::roots("<div> <p /> </div>");
    let children = element(&roots[0]).child_list();
    assert_eq!(children.len(), 3);
    assert_eq!(fragment_text(&children[0]), " ");
}

#[test]
fn test_void_elements_have_no_children() {
    let options = InterpretOptions {
        auto_close_void_elements: true,
        ..Default::default()
    };
    let roots = run(options, "<p>a<br>b</p><img src=\"a.png\">").roots;
    let paragraph = element(&roots[0]).child_list();
    assert_eq!(host(&paragraph[1]), "br");
    assert_eq!(element(&paragraph[1]).children, Value::Undefined);
    assert_eq!(host(&roots[1]), "img");
}

#[test]
fn test_attribute_mapping() {
    let roots = roots(
        "<label class=\"field\" for=\"name\" maxlength={10} hidden onClick={() => 1} data-id=\"7\" />",
    );
    let label = element(&roots[0]);
    let names: Vec<&str> = label.props.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["className", "htmlFor", "maxLength", "hidden", "data-id"]);
    assert_eq!(label.prop("maxLength"), Some(&Value::Number(10.0)));
    assert_eq!(label.prop("hidden"), Some(&Value::Bool(true)));
}

#[test]
fn test_custom_attribute_blacklist() {
    let options = InterpretOptions {
        blacklisted_attrs: vec!["^data-".to_string(), "STYLE".to_string()],
        ..Default::default()
    };
    let roots = run(options, "<div data-x=\"1\" style=\"color: red\" onClick={f} />").roots;
    let div = element(&roots[0]);
    assert!(div.prop("data-x").is_none());
    assert!(div.prop("style").is_none());
    assert!(div.prop("onClick").is_some());
}

#[test]
fn test_spread_attributes() {
    let mut attrs = Object::new();
    attrs.insert("class".to_string(), Value::from("card"));
    attrs.insert("title".to_string(), Value::from("Hello"));
    attrs.insert(
        "onClick".to_string(),
        Value::Function(Function::new("click", |_, _| Ok(Value::Undefined))),
    );
    let mut user = Object::new();
    user.insert("attrs".to_string(), Value::object(attrs.clone()));

    let options = InterpretOptions::default()
        .with_binding("attrs", attrs)
        .with_binding("user", user);

    let roots = run(options, "<div id=\"a\" {...attrs} /><div {...user.attrs} title=\"late\" />").roots;
    let first = element(&roots[0]);
    let names: Vec<&str> = first.props.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["id", "className", "title"]);

    let second = element(&roots[1]);
    assert_eq!(second.prop("className"), Some(&Value::from("card")));
    assert_eq!(second.prop("title"), Some(&Value::from("late")));
}

#[test]
fn test_style_strings_become_declarations() {
    let roots = roots(
        "<div style=\"background-color: #fff; font-size:12px\" /><p style={{ marginTop: 4 }} />",
    );
    let style = element(&roots[0]).prop("style").unwrap().as_object().unwrap();
    assert_eq!(style["backgroundColor"], Value::from("#fff"));
    assert_eq!(style["fontSize"], Value::from("12px"));

    let style = element(&roots[1]).prop("style").unwrap().as_object().unwrap();
    assert_eq!(style["marginTop"], Value::Number(4.0));
}

#[test]
fn test_option_children_are_promoted() {
    let roots = roots("<select><option value=\"1\">One</option><option>{'Two'}</option></select>");
    let options = element(&roots[0]).child_list();
    // The text fragment is replaced by its own text
    assert_eq!(element(&options[0]).children, Value::from("One"));
    // Non-element children are left alone
    assert_eq!(element(&options[1]).children, Value::from("Two"));
}

#[test]
fn test_element_valued_attributes_and_nested_markup() {
    let options = InterpretOptions::default().with_binding(
        "items",
        vec![Value::from("a"), Value::from("b")],
    );
    let roots = run(
        options,
        "<nav icon=<i class=\"icon\" />>{items.map(item => <a href={`#${item}`}>{item}</a>)}</nav>",
    )
    .roots;
    let nav = element(&roots[0]);
    assert_eq!(host(nav.prop("icon").unwrap()), "i");

    let links = nav.children.as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(element(&links[1]).prop("href"), Some(&Value::from("#b")));
    assert_eq!(element(&links[1]).children, Value::from("b"));
}

#[test]
fn test_fragments() {
    let roots = roots("<><b>1</b><i>2</i></>");
    let fragment = element(&roots[0]);
    assert!(fragment.is_fragment());
    let children = fragment.child_list();
    assert_eq!(element(&children[0]).key.as_deref(), Some("0"));
    assert_eq!(element(&children[1]).key.as_deref(), Some("1"));
}

#[test]
fn test_diagnostics_are_collected_in_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let options = InterpretOptions::default().on_error(move |error| {
        log.lock().unwrap().push(error.to_string());
    });

    let interpretation = run(options, "<p>{a.b.c}</p><script />{nothing()}");
    assert_eq!(interpretation.diagnostics.len(), 3);
    assert!(matches!(interpretation.diagnostics[0], Diagnostic::UnresolvedMember { .. }));
    assert!(matches!(interpretation.diagnostics[1], Diagnostic::BlacklistedTag { .. }));
    assert!(matches!(interpretation.diagnostics[2], Diagnostic::NotCallable { .. }));

    let messages = seen.lock().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1], interpretation.diagnostics[1].to_string());
}

#[test]
fn test_nesting_limit_is_fatal() {
    let options = InterpretOptions {
        max_depth: 4,
        ..Default::default()
    };
    let markup = "<a><b><c><d><e><f></f></e></d></c></b></a>";
    let result = Interpreter::new(options).unwrap().interpret(markup);
    assert!(matches!(result, Err(InterpretError::RecursionLimitExceeded { limit: 4, .. })));
}

#[test]
fn test_render_never_fails() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let options = InterpretOptions::default().on_error(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let interpreter = Interpreter::new(options.clone()).unwrap();
    assert_eq!(interpreter.render("<div>"), Value::Null);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let interpreter =
        Interpreter::new(options.render_error(|_| Value::from("broken"))).unwrap();
    assert_eq!(interpreter.render("<div></span>"), Value::from("broken"));

    let tree = interpreter.render("<p>fine</p>");
    assert_eq!(host(&element(&tree).children), "p");
}

#[test]
fn test_parse_errors_are_surfaced() {
    let result = Interpreter::new(InterpretOptions::default())
        .unwrap()
        .interpret("<div attr={}></div>");
    assert!(matches!(result, Err(InterpretError::Parse(_))));
}
