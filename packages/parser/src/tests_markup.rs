use crate::*;

fn markup(source: &str) -> Vec<Node> {
    parse_markup(source, &ParserOptions::default())
        .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", source, e))
}

fn single_element(source: &str) -> Element {
    match markup(source).pop() {
        Some(Node::Element(element)) => element,
        other => panic!("expected a single element, got {:?}", other),
    }
}

fn attribute<'a>(element: &'a Element, name: &str) -> &'a Attribute {
    element
        .attributes
        .iter()
        .find_map(|item| match item {
            AttributeItem::Attribute(attribute) if attribute.name == name => Some(attribute),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no attribute {}", name))
}

#[test]
fn test_multiple_top_level_siblings() {
    let nodes = markup("<h1>Title</h1> <p>Body</p>");
    assert_eq!(nodes.len(), 3);
    assert!(matches!(&nodes[0], Node::Element(e) if e.name == "h1"));
    assert!(matches!(&nodes[1], Node::Text(t) if t.value == " "));
    assert!(matches!(&nodes[2], Node::Element(e) if e.name == "p"));
}

#[test]
fn test_plain_text_input() {
    let nodes = markup("just text");
    assert_eq!(nodes.len(), 1);
    assert!(matches!(&nodes[0], Node::Text(t) if t.raw == "just text"));
    assert!(markup("").is_empty());
}

#[test]
fn test_nested_elements_and_spans() {
    let source = "<div><span>a</span><b/></div>";
    let div = single_element(source);
    assert_eq!(div.span, Span::new(0, source.len()));
    assert_eq!(div.children.len(), 2);
    match &div.children[1] {
        Node::Element(b) => {
            assert_eq!(b.name, "b");
            assert!(b.self_closing);
            assert_eq!(&source[b.span.start..b.span.end], "<b/>");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_attribute_kinds() {
    let element = single_element(
        r#"<input type="text" value='a &amp; b' disabled data-id={id} aria-label="x" icon=<Icon /> {...rest} />"#,
    );

    assert!(matches!(
        &attribute(&element, "type").value,
        Some(AttributeValue::String(s)) if s.value == "text" && s.raw == "\"text\""
    ));
    assert!(matches!(
        &attribute(&element, "value").value,
        Some(AttributeValue::String(s)) if s.value == "a & b"
    ));
    assert!(attribute(&element, "disabled").value.is_none());
    assert!(matches!(
        &attribute(&element, "data-id").value,
        Some(AttributeValue::Expression(c)) if matches!(&c.expression, Expression::Identifier { name, .. } if name == "id")
    ));
    assert!(attribute(&element, "aria-label").value.is_some());
    assert!(matches!(
        &attribute(&element, "icon").value,
        Some(AttributeValue::Element(e)) if e.name == "Icon"
    ));
    assert!(matches!(
        element.attributes.last(),
        Some(AttributeItem::Spread(SpreadAttribute { argument: Expression::Identifier { .. }, .. }))
    ));
}

#[test]
fn test_dotted_and_namespaced_names() {
    let element = single_element("<Foo.Bar.Baz>x</Foo.Bar.Baz>");
    assert_eq!(element.name, "Foo.Bar.Baz");

    let element = single_element(r#"<svg:rect xlink:href="a" />"#);
    assert_eq!(element.name, "svg:rect");
    assert_eq!(attribute(&element, "xlink:href").name, "xlink:href");
}

#[test]
fn test_fragments() {
    let nodes = markup("<>a<b/></>");
    match &nodes[0] {
        Node::Fragment(fragment) => assert_eq!(fragment.children.len(), 2),
        other => panic!("expected fragment, got {:?}", other),
    }
}

#[test]
fn test_text_entities_decoded_raw_kept() {
    let element = single_element("<p>&lt;b&gt; &copy; &#169;</p>");
    match &element.children[0] {
        Node::Text(text) => {
            assert_eq!(text.value, "<b> © ©");
            assert_eq!(text.raw, "&lt;b&gt; &copy; &#169;");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_empty_and_comment_containers_dropped() {
    let element = single_element("<div>{}{/* note */}{ // line\n}</div>");
    assert!(element.children.is_empty());
}

#[test]
fn test_empty_attribute_expression_rejected() {
    let result = parse_markup("<div a={} />", &ParserOptions::default());
    assert!(matches!(result, Err(ParseError::InvalidSyntax { .. })));
}

#[test]
fn test_mismatched_closing_tag() {
    let result = parse_markup("<div><span></div>", &ParserOptions::default());
    match result {
        Err(ParseError::InvalidSyntax { message, .. }) => {
            assert!(message.contains("<span>"), "{}", message)
        }
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_unclosed_element_is_eof_error() {
    let result = parse_markup("<div><p>", &ParserOptions::default());
    assert!(matches!(result, Err(ParseError::UnexpectedEof { .. })));
}

#[test]
fn test_stray_closing_tag() {
    let result = parse_markup("text</div>", &ParserOptions::default());
    assert!(matches!(result, Err(ParseError::InvalidSyntax { .. })));
}

#[test]
fn test_void_elements_need_option() {
    let source = "<p>a<br>b<img src=\"x\"></p>";
    assert!(parse_markup(source, &ParserOptions::default()).is_err());

    let options = ParserOptions {
        auto_close_void_elements: true,
        ..ParserOptions::default()
    };
    let nodes = parse_markup(source, &options).unwrap();
    match &nodes[0] {
        Node::Element(p) => {
            assert_eq!(p.children.len(), 4);
            assert!(matches!(&p.children[1], Node::Element(br) if br.name == "br" && br.children.is_empty()));
        }
        other => panic!("unexpected {:?}", other),
    }

    let nodes = parse_markup("<br></br>after", &options).unwrap();
    assert_eq!(nodes.len(), 2);
}

#[test]
fn test_comments_inside_tags() {
    let element = single_element("<div /* c */ id=\"a\" // trailing\n></div>");
    assert_eq!(element.attributes.len(), 1);
}

#[test]
fn test_recursion_limit() {
    let depth = 300;
    let source = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
    let result = parse_markup(&source, &ParserOptions::default());
    assert!(matches!(
        result,
        Err(ParseError::RecursionLimitExceeded { limit: DEFAULT_MAX_DEPTH, .. })
    ));

    let shallow = format!("{}{}", "<a>".repeat(50), "</a>".repeat(50));
    assert!(parse_markup(&shallow, &ParserOptions::default()).is_ok());
}

#[test]
fn test_expression_children_with_markup() {
    let element = single_element("<ul>{items.map(item => <li key={item}>{item}</li>)}</ul>");
    match &element.children[0] {
        Node::Expression(container) => match &container.expression {
            Expression::Call { arguments, .. } => {
                assert!(matches!(&arguments[0], Expression::Arrow { body, .. } if matches!(body.as_ref(), Expression::Element(_))));
            }
            other => panic!("unexpected {:?}", other),
        },
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_ast_serializes_to_json() {
    let nodes = markup("<b>x</b>");
    let json = serde_json::to_value(&nodes).unwrap();
    assert_eq!(json[0]["type"], "Element");
    assert_eq!(json[0]["name"], "b");
}
