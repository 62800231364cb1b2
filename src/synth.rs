//! Sample-parameter synthesis from declared tool schemas.
//!
//! Builds one plausible parameter object per tool for live testing. Values
//! come from declared enums and defaults first, then keyword heuristics on
//! the parameter name, then type-level placeholders. An empty result object
//! means the tool has no testable parameters; the engine skips it rather
//! than attempt invocation.

use serde_json::{json, Map, Value};

use crate::catalog::{ParamType, PropertySchema, ToolInputSchema};

/// Synthesize sample parameters for one tool.
///
/// Iterates the `required` names when non-empty, otherwise the first three
/// declared property names. Required names with no matching property
/// declaration synthesize nothing.
pub fn synthesize(schema: &ToolInputSchema) -> Map<String, Value> {
    let names: Vec<&String> = if schema.required.is_empty() {
        schema.properties.keys().take(3).collect()
    } else {
        schema.required.iter().collect()
    };

    let mut params = Map::new();
    for name in names {
        let Some(prop) = schema.properties.get(name) else {
            continue;
        };
        if let Some(value) = synthesize_value(name, prop) {
            params.insert(name.clone(), value);
        }
    }
    params
}

fn synthesize_value(name: &str, prop: &PropertySchema) -> Option<Value> {
    match prop.param_type? {
        ParamType::String => Some(string_value(name, prop)),
        ParamType::Number | ParamType::Integer => Some(numeric_value(name, prop)),
        ParamType::Boolean => Some(
            prop.default
                .clone()
                .filter(Value::is_boolean)
                .unwrap_or(Value::Bool(false)),
        ),
        ParamType::Array => Some(array_value(prop)),
        ParamType::Object => Some(json!({})),
        ParamType::Unknown => None,
    }
}

/// Keyword heuristics on the parameter name, checked in fixed order.
fn string_value(name: &str, prop: &PropertySchema) -> Value {
    if let Some(first) = prop.enum_values.as_ref().and_then(|v| v.first()) {
        return first.clone();
    }

    let lower = name.to_ascii_lowercase();
    let text = if lower.contains("path") {
        "/tmp/test.txt"
    } else if lower.contains("url") {
        "https://example.com"
    } else if lower.contains("query") {
        "test query"
    } else if lower.contains("name") || lower.contains("library") {
        "react"
    } else if lower.contains("pattern") {
        "*.txt"
    } else if lower.contains("id") {
        "test-id"
    } else {
        "test"
    };
    Value::String(text.to_string())
}

fn numeric_value(name: &str, prop: &PropertySchema) -> Value {
    if let Some(default) = prop.default.clone().filter(Value::is_number) {
        return default;
    }

    let lower = name.to_ascii_lowercase();
    let n = if lower.contains("depth") {
        2
    } else if lower.contains("max") {
        3
    } else if lower.contains("token") {
        2000
    } else {
        1
    };
    json!(n)
}

fn array_value(prop: &PropertySchema) -> Value {
    match prop.items.as_ref().and_then(|i| i.item_type) {
        Some(ParamType::String) => json!(["test"]),
        _ => json!([]),
    }
}

// =============================================================================
// Tests
// =============================================================================
