//! Inline `style` strings to structured declarations

use crate::value::{Object, Value};

/// Parse `"color: red; background-color: blue"` into
/// `{ color: "red", backgroundColor: "blue" }`.
///
/// Rules without a `:` or with an empty property name are skipped. The
/// value is everything after the first `:`, trimmed.
pub fn parse_style(style: &str) -> Object {
    let mut declaration = Object::new();
    for rule in style.split(';').filter(|rule| !rule.is_empty()) {
        let Some((name, value)) = rule.split_once(':') else {
            continue;
        };
        let name = camel_case(name.trim());
        if name.is_empty() {
            continue;
        }
        declaration.insert(name, Value::string(value.trim()));
    }
    declaration
}

#[derive(Clone, Copy, PartialEq)]
enum Scan {
    Separator,
    Word,
}

/// Lower camel case for CSS property names.
///
/// Boundaries are inserted between two adjacent uppercase letters (pairs
/// consumed left to right without overlap), then between a lowercase and an
/// uppercase letter. Anything outside `A-Z`, `a-z` and `U+00C0..=U+00FF`
/// separates words. Words are lower-cased; every word after the first gets
/// an upper-cased first character.
pub fn camel_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let chars = split_pairs(&chars, |a, b| a.is_ascii_uppercase() && b.is_ascii_uppercase());
    let chars = split_pairs(&chars, |a, b| a.is_ascii_lowercase() && b.is_ascii_uppercase());

    let mut output = String::with_capacity(input.len());
    let mut state = Scan::Separator;
    let mut seen_word = false;
    for c in chars {
        if !is_word_char(c) {
            state = Scan::Separator;
            continue;
        }
        state = match state {
            Scan::Separator => {
                let first = !seen_word;
                seen_word = true;
                let mut lower = c.to_lowercase();
                if first {
                    output.extend(lower);
                } else if let Some(head) = lower.next() {
                    // Upper-case the lower-cased form, like `s[0].toUpperCase()`
                    output.extend(head.to_uppercase());
                    output.extend(lower);
                }
                Scan::Word
            }
            Scan::Word => {
                output.extend(c.to_lowercase());
                Scan::Word
            }
        };
    }
    output
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{00C0}'..='\u{00FF}').contains(&c)
}

/// Insert a separator inside every matching pair, scanning left to right
/// and resuming after the pair
fn split_pairs(chars: &[char], is_boundary: impl Fn(char, char) -> bool) -> Vec<char> {
    let mut output = Vec::with_capacity(chars.len() + chars.len() / 2);
    let mut i = 0;
    while i < chars.len() {
        match chars.get(i + 1) {
            Some(&next) if is_boundary(chars[i], next) => {
                output.extend([chars[i], ' ', next]);
                i += 2;
            }
            _ => {
                output.push(chars[i]);
                i += 1;
            }
        }
    }
    output
}
