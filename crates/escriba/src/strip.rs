//! Default stripping of rendered value trees.
//!
//! Removes `null` fields, zero or empty `modifiers`, and empty `framePath`
//! lists at every depth. The `debug` payload is copied verbatim.

use serde_yaml_ng::{Mapping, Value};

const DEBUG_KEY: &str = "debug";

/// Return a copy of `value` with default-valued fields removed.
///
/// Idempotent: stripping a stripped tree returns it unchanged.
#[must_use]
pub fn strip_defaults(value: &Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(strip_mapping(map)),
        Value::Sequence(items) => Value::Sequence(items.iter().map(strip_defaults).collect()),
        Value::Tagged(tagged) => {
            let mut tagged = tagged.clone();
            tagged.value = strip_defaults(&tagged.value);
            Value::Tagged(tagged)
        }
        other => other.clone(),
    }
}

fn strip_mapping(map: &Mapping) -> Mapping {
    let mut stripped = Mapping::with_capacity(map.len());
    for (key, value) in map {
        if value.is_null() {
            continue;
        }
        let name = key.as_str().unwrap_or_default();
        if name == DEBUG_KEY {
            stripped.insert(key.clone(), value.clone());
            continue;
        }
        if is_default_field(name, value) {
            continue;
        }
        stripped.insert(key.clone(), strip_defaults(value));
    }
    stripped
}

fn is_default_field(name: &str, value: &Value) -> bool {
    match name {
        "modifiers" => match value {
            Value::Number(n) => n.as_u64() == Some(0),
            Value::Sequence(items) => items.is_empty(),
            _ => false,
        },
        "framePath" => value.as_sequence().is_some_and(Vec::is_empty),
        _ => false,
    }
}
