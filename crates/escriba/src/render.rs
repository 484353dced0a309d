//! Block YAML rendering for scenario documents.
//!
//! Values are converted to a `serde_yaml_ng::Value` tree, stripped of
//! defaults, and written in block style with every string scalar
//! double-quoted. Each step is one list item under `steps:`: `  - ` on its
//! first line, four spaces on continuation lines.

use serde::Serialize;
use serde_yaml_ng::{Mapping, Value};

use crate::scenario::{Scenario, Step};
use crate::strip::strip_defaults;

const INDENT: usize = 2;

/// Render the document header (every top-level field except `steps`).
///
/// # Errors
/// Returns an error if the scenario cannot be converted to a YAML tree.
pub fn render_header(scenario: &Scenario) -> Result<String, serde_yaml_ng::Error> {
    let mut value = stripped(scenario)?;
    if let Value::Mapping(map) = &mut value {
        map.shift_remove("steps");
    }
    Ok(render_block(&value, 0))
}

/// Render one step as a `steps:` list item.
///
/// # Errors
/// Returns an error if the step cannot be converted to a YAML tree.
pub fn render_step(step: &Step) -> Result<String, serde_yaml_ng::Error> {
    let value = stripped(step)?;
    Ok(render_item(&value, INDENT))
}

/// Render any value as a block document at the given indentation.
#[must_use]
pub fn render_block(value: &Value, indent: usize) -> String {
    let mut out = String::new();
    write_value(&mut out, value, indent);
    out
}

fn stripped<T: Serialize>(value: &T) -> Result<Value, serde_yaml_ng::Error> {
    Ok(strip_defaults(&serde_yaml_ng::to_value(value)?))
}

/// Render `value` as a list item whose dash sits at `indent`.
fn render_item(value: &Value, indent: usize) -> String {
    if !is_block(value) {
        return format!("{}- {}\n", pad(indent), scalar(value));
    }
    let body = render_block(value, indent + INDENT);
    // Swap the leading padding of the first line for the dash.
    format!("{}- {}", pad(indent), &body[indent + INDENT..])
}

fn write_value(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Mapping(map) if !map.is_empty() => write_mapping(out, map, indent),
        Value::Sequence(items) if !items.is_empty() => {
            for item in items {
                out.push_str(&render_item(item, indent));
            }
        }
        Value::Tagged(tagged) => write_value(out, &tagged.value, indent),
        other => {
            out.push_str(&pad(indent));
            out.push_str(&scalar(other));
            out.push('\n');
        }
    }
}

fn write_mapping(out: &mut String, map: &Mapping, indent: usize) {
    for (key, value) in map {
        out.push_str(&pad(indent));
        out.push_str(&render_key(key));
        out.push(':');
        if is_block(value) {
            out.push('\n');
            write_value(out, value, indent + INDENT);
        } else {
            out.push(' ');
            out.push_str(&scalar(value));
            out.push('\n');
        }
    }
}

fn is_block(value: &Value) -> bool {
    match value {
        Value::Mapping(map) => !map.is_empty(),
        Value::Sequence(items) => !items.is_empty(),
        Value::Tagged(tagged) => is_block(&tagged.value),
        _ => false,
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Sequence(_) => "[]".to_string(),
        Value::Mapping(_) => "{}".to_string(),
        Value::Tagged(tagged) => scalar(&tagged.value),
    }
}

fn render_key(key: &Value) -> String {
    match key {
        Value::String(s) if is_plain_key(s) => s.clone(),
        other => scalar(other),
    }
}

fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// JSON string escaping is valid YAML double-quoted escaping.
fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s.escape_default()))
}

fn pad(width: usize) -> String {
    " ".repeat(width)
}
