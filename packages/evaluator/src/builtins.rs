//! Property reads, including the native members markup can call on
//! strings, arrays, numbers and rendered elements.

use crate::evaluator::EvalResult;
use crate::render::Element;
use crate::value::{format_number, Function, Object, Value};

/// Read `key` from `target`. `None` means the read itself failed
/// (property access on `undefined` or `null`).
pub fn get_member(target: &Value, key: &str) -> Option<Value> {
    let value = match target {
        Value::Undefined | Value::Null => return None,
        Value::String(s) => string_member(s, key),
        Value::Array(items) => array_member(items, key),
        Value::Object(object) => object.get(key).cloned().unwrap_or_default(),
        Value::Number(_) => number_member(key),
        Value::Element(element) => element_member(element, key),
        Value::Bool(_) | Value::Function(_) => Value::Undefined,
    };
    Some(value)
}

/// Canonical array index (`"0"`, `"12"`, not `"01"` or `"1.0"`)
fn array_index(key: &str) -> Option<usize> {
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse().ok()
}

fn string_member(s: &str, key: &str) -> Value {
    if let Some(index) = array_index(key) {
        return s
            .encode_utf16()
            .nth(index)
            .map(|unit| Value::String(String::from_utf16_lossy(&[unit])))
            .unwrap_or_default();
    }
    match key {
        "length" => Value::Number(s.encode_utf16().count() as f64),
        "toUpperCase" => method(key, |this, _| Ok(with_str(this, |s| s.to_uppercase().into()))),
        "toLowerCase" => method(key, |this, _| Ok(with_str(this, |s| s.to_lowercase().into()))),
        "trim" => method(key, |this, _| Ok(with_str(this, |s| s.trim().into()))),
        "includes" => method(key, |this, args| {
            let needle = arg_string(args, 0);
            Ok(with_str(this, |s| s.contains(needle.as_str()).into()))
        }),
        "startsWith" => method(key, |this, args| {
            let needle = arg_string(args, 0);
            Ok(with_str(this, |s| s.starts_with(needle.as_str()).into()))
        }),
        "endsWith" => method(key, |this, args| {
            let needle = arg_string(args, 0);
            Ok(with_str(this, |s| s.ends_with(needle.as_str()).into()))
        }),
        "split" => method(key, |this, args| {
            let separator = args.first().filter(|arg| !arg.is_undefined());
            Ok(with_str(this, |s| split(s, separator)))
        }),
        _ => Value::Undefined,
    }
}

fn split(s: &str, separator: Option<&Value>) -> Value {
    let parts: Vec<Value> = match separator.map(Value::to_js_string) {
        None => vec![Value::string(s)],
        Some(separator) if separator.is_empty() => s
            .encode_utf16()
            .map(|unit| Value::String(String::from_utf16_lossy(&[unit])))
            .collect(),
        Some(separator) => s.split(separator.as_str()).map(Value::string).collect(),
    };
    Value::array(parts)
}

fn array_member(items: &[Value], key: &str) -> Value {
    if let Some(index) = array_index(key) {
        return items.get(index).cloned().unwrap_or_default();
    }
    match key {
        "length" => Value::Number(items.len() as f64),
        "map" => method(key, |this, args| {
            let (Some(items), Some(callback)) = (this.as_array(), callback_arg(args)) else {
                return Ok(Value::Undefined);
            };
            let mut mapped = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                mapped.push(callback.call(&[item.clone(), Value::Number(index as f64), this.clone()])?);
            }
            Ok(Value::array(mapped))
        }),
        "filter" => method(key, |this, args| {
            let (Some(items), Some(callback)) = (this.as_array(), callback_arg(args)) else {
                return Ok(Value::Undefined);
            };
            let mut kept = Vec::new();
            for (index, item) in items.iter().enumerate() {
                let keep = callback.call(&[item.clone(), Value::Number(index as f64), this.clone()])?;
                if keep.is_truthy() {
                    kept.push(item.clone());
                }
            }
            Ok(Value::array(kept))
        }),
        "join" => method(key, |this, args| {
            let separator = match args.first() {
                None | Some(Value::Undefined) => ",".to_string(),
                Some(separator) => separator.to_js_string(),
            };
            Ok(this
                .as_array()
                .map(|items| {
                    let parts: Vec<String> = items
                        .iter()
                        .map(|item| if item.is_nullish() { String::new() } else { item.to_js_string() })
                        .collect();
                    Value::String(parts.join(&separator))
                })
                .unwrap_or_default())
        }),
        "includes" => method(key, |this, args| {
            let needle = args.first().cloned().unwrap_or_default();
            Ok(this
                .as_array()
                .map(|items| Value::Bool(items.iter().any(|item| same_value_zero(item, &needle))))
                .unwrap_or_default())
        }),
        "indexOf" => method(key, |this, args| {
            let needle = args.first().cloned().unwrap_or_default();
            Ok(this
                .as_array()
                .map(|items| {
                    let index = items.iter().position(|item| item.strict_equals(&needle));
                    Value::Number(index.map_or(-1.0, |index| index as f64))
                })
                .unwrap_or_default())
        }),
        "slice" => method(key, |this, args| {
            let Some(items) = this.as_array() else {
                return Ok(Value::Undefined);
            };
            let start = relative_index(args.first(), items.len(), 0);
            let end = relative_index(args.get(1), items.len(), items.len());
            let sliced = if start < end { items[start..end].to_vec() } else { Vec::new() };
            Ok(Value::array(sliced))
        }),
        _ => Value::Undefined,
    }
}

fn number_member(key: &str) -> Value {
    match key {
        "toFixed" => method(key, |this, args| {
            let Some(n) = this.as_number() else {
                return Ok(Value::Undefined);
            };
            let digits = args
                .first()
                .map(Value::to_number)
                .filter(|digits| digits.is_finite())
                .unwrap_or(0.0)
                .clamp(0.0, 100.0) as usize;
            if !n.is_finite() || n.abs() >= 1e21 {
                return Ok(Value::String(format_number(n)));
            }
            Ok(Value::String(to_fixed(n, digits)))
        }),
        _ => Value::Undefined,
    }
}

/// Digits after the point of any finite f64 fit in this many places.
const EXACT_PLACES: usize = 1100;

/// `toFixed` rounding: ties go to the larger magnitude, judged on the exact
/// binary value, so `2.5` gives `3` and `1.005` (really `1.00499...`) gives `1.00`.
fn to_fixed(n: f64, digits: usize) -> String {
    let exact = format!("{:.*}", EXACT_PLACES, n.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(digits))
        .collect();
    if frac_part.as_bytes().get(digits).is_some_and(|digit| *digit >= b'5') {
        let mut carry = true;
        for digit in kept.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let (int_digits, frac_digits) = kept.split_at(kept.len() - digits);
    let mut out = String::with_capacity(kept.len() + 2);
    if n < 0.0 {
        out.push('-');
    }
    out.extend(int_digits.iter().map(|digit| char::from(*digit)));
    if digits > 0 {
        out.push('.');
        out.extend(frac_digits.iter().map(|digit| char::from(*digit)));
    }
    out
}

fn element_member(element: &Element, key: &str) -> Value {
    match key {
        "type" => Value::String(element.element_type.to_string()),
        "key" => element
            .key
            .as_ref()
            .map(|key| Value::String(key.clone()))
            .unwrap_or(Value::Null),
        "props" => {
            let mut props: Object = element.props.clone();
            if !element.children.is_undefined() {
                props.insert("children".to_string(), element.children.clone());
            }
            Value::object(props)
        }
        _ => Value::Undefined,
    }
}

fn method<F>(name: &str, call: F) -> Value
where
    F: Fn(&Value, &[Value]) -> EvalResult<Value> + Send + Sync + 'static,
{
    Value::Function(Function::new(name, call))
}

fn with_str(this: &Value, f: impl FnOnce(&str) -> Value) -> Value {
    this.as_str().map(f).unwrap_or_default()
}

fn arg_string(args: &[Value], index: usize) -> String {
    args.get(index).cloned().unwrap_or_default().to_js_string()
}

fn callback_arg(args: &[Value]) -> Option<&Function> {
    args.first().and_then(Value::as_function)
}

fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => a.strict_equals(b),
    }
}

/// Resolve a possibly negative index argument against `len`
fn relative_index(arg: Option<&Value>, len: usize, default: usize) -> usize {
    let relative = match arg {
        None | Some(Value::Undefined) => return default,
        Some(value) => value.to_number(),
    };
    let relative = if relative.is_nan() { 0.0 } else { relative.trunc() };
    let index = if relative < 0.0 {
        (len as f64 + relative).max(0.0)
    } else {
        relative.min(len as f64)
    };
    index as usize
}
