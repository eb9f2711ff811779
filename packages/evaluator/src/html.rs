//! Host element tables

/// Check if a lower-cased name is a known HTML tag
fn is_html_tag(name: &str) -> bool {
    matches!(
        name,
        // Common HTML tags
        "a" | "abbr" | "address" | "area" | "article" | "aside" | "audio" |
        "b" | "base" | "bdi" | "bdo" | "blockquote" | "body" | "br" | "button" |
        "canvas" | "caption" | "cite" | "code" | "col" | "colgroup" |
        "data" | "datalist" | "dd" | "del" | "details" | "dfn" | "dialog" | "div" | "dl" | "dt" |
        "em" | "embed" |
        "fieldset" | "figcaption" | "figure" | "footer" | "form" |
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "head" | "header" | "hgroup" | "hr" | "html" |
        "i" | "iframe" | "img" | "input" | "ins" |
        "kbd" |
        "label" | "legend" | "li" | "link" |
        "main" | "map" | "mark" | "menu" | "meta" | "meter" |
        "nav" | "noscript" |
        "object" | "ol" | "optgroup" | "option" | "output" |
        "p" | "picture" | "pre" | "progress" |
        "q" |
        "rp" | "rt" | "ruby" |
        "s" | "samp" | "script" | "search" | "section" | "select" | "slot" | "small" | "source" | "span" | "strong" | "style" | "sub" | "summary" | "sup" | "svg" |
        "table" | "tbody" | "td" | "template" | "textarea" | "tfoot" | "th" | "thead" | "time" | "title" | "tr" | "track" |
        "u" | "ul" |
        "var" | "video" |
        "wbr"
    )
}

/// Whether a browser would create a real element for this tag.
/// Hyphenated names are custom elements and always qualify.
pub fn is_known_element(name: &str) -> bool {
    name.contains('-') || is_html_tag(&name.to_ascii_lowercase())
}

/// `html`, `head` and `body` are replaced by their children
pub fn is_document_wrapper(name: &str) -> bool {
    ["html", "head", "body"]
        .iter()
        .any(|wrapper| name.eq_ignore_ascii_case(wrapper))
}

/// Table-family tags whose whitespace-only text children are dropped
pub fn drops_whitespace(name: &str) -> bool {
    ["table", "tbody", "tfoot", "thead", "tr"]
        .iter()
        .any(|tag| name.eq_ignore_ascii_case(tag))
}

/// Attribute names that differ between markup and element props
pub fn rename_attribute(name: &str) -> &str {
    match name {
        "class" => "className",
        "for" => "htmlFor",
        "maxlength" => "maxLength",
        "colspan" => "colSpan",
        "rowspan" => "rowSpan",
        other => other,
    }
}
