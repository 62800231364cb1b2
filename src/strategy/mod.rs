//! Prompt-rendering strategies.
//!
//! A strategy is a pure, deterministic function from (tool name, parameter
//! object) to an instruction string for a tool-calling LLM agent. The set is
//! closed: an enum with one render arm per style, selected via exhaustive
//! matching. No strategy throws for any well-formed parameter object, every
//! strategy references every parameter key, and non-primitive values
//! serialize as canonical (key-sorted) JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub mod fallback;
pub mod selector;

pub use fallback::{FallbackChain, FallbackExecutor, FallbackOutcome};
pub use selector::{ParamShape, SelectionPolicy, StrategySelector};

/// Closed set of prompt-rendering styles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum PromptStrategy {
    /// Single directive line with a flat `key: value` list. Minimal tokens,
    /// commanding tone.
    Imperative,
    /// One sentence per parameter stating its type explicitly. Disambiguates
    /// array and numeric arguments.
    NaturalExplicit,
    /// Numbered assignment steps ending with an explicit "call now"
    /// instruction. Reduces premature reasoning loops.
    StepByStep,
    /// Single-line function-call notation with the raw JSON payload.
    DirectWithSchema,
    /// Comma-separated `name=value (typeName)` annotations.
    ExplicitTypes,
}

impl PromptStrategy {
    /// All strategies in fixed calibration order.
    pub const ALL: [PromptStrategy; 5] = [
        PromptStrategy::Imperative,
        PromptStrategy::NaturalExplicit,
        PromptStrategy::StepByStep,
        PromptStrategy::DirectWithSchema,
        PromptStrategy::ExplicitTypes,
    ];

    /// Wire name, matching the persisted mapping format.
    pub fn name(self) -> &'static str {
        match self {
            PromptStrategy::Imperative => "imperative",
            PromptStrategy::NaturalExplicit => "naturalExplicit",
            PromptStrategy::StepByStep => "stepByStep",
            PromptStrategy::DirectWithSchema => "directWithSchema",
            PromptStrategy::ExplicitTypes => "explicitTypes",
        }
    }

    /// Render the instruction prompt for one tool call.
    pub fn render(self, tool: &str, params: &Map<String, Value>) -> String {
        match self {
            PromptStrategy::Imperative => render_imperative(tool, params),
            PromptStrategy::NaturalExplicit => render_natural_explicit(tool, params),
            PromptStrategy::StepByStep => render_step_by_step(tool, params),
            PromptStrategy::DirectWithSchema => render_direct_with_schema(tool, params),
            PromptStrategy::ExplicitTypes => render_explicit_types(tool, params),
        }
    }
}

impl fmt::Display for PromptStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Render arms
// =============================================================================

fn render_imperative(tool: &str, params: &Map<String, Value>) -> String {
    if params.is_empty() {
        return format!("Use the {} tool now.", tool);
    }
    let args: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}: {}", key, canonical_json(value)))
        .collect();
    format!("Use the {} tool with {}.", tool, args.join(", "))
}

fn render_natural_explicit(tool: &str, params: &Map<String, Value>) -> String {
    let mut sentences = vec![format!("Call the {} tool.", tool)];
    for (key, value) in params {
        let sentence = match value {
            Value::Array(_) => format!(
                "Pass {} as an array containing {}.",
                key,
                canonical_json(value)
            ),
            Value::Number(n) => format!("Pass {} as the number {}.", key, n),
            Value::Bool(b) => format!("Pass {} as the boolean value {}.", key, b),
            Value::Object(_) => {
                format!("Pass {} as an object: {}.", key, canonical_json(value))
            }
            Value::String(_) => {
                format!("Pass {} as the string {}.", key, canonical_json(value))
            }
            Value::Null => format!("Pass {} as null.", key),
        };
        sentences.push(sentence);
    }
    sentences.join(" ")
}

fn render_step_by_step(tool: &str, params: &Map<String, Value>) -> String {
    let mut lines = vec![format!("Follow these steps to invoke the {} tool:", tool)];
    for (index, (key, value)) in params.iter().enumerate() {
        lines.push(format!("{}. Set {} to {}", index + 1, key, canonical_json(value)));
    }
    lines.push(format!("{}. Call the {} tool now.", params.len() + 1, tool));
    lines.join("\n")
}

fn render_direct_with_schema(tool: &str, params: &Map<String, Value>) -> String {
    format!("{}({})", tool, canonical_json(&Value::Object(params.clone())))
}

fn render_explicit_types(tool: &str, params: &Map<String, Value>) -> String {
    if params.is_empty() {
        return format!("Call {} with no arguments.", tool);
    }
    let args: Vec<String> = params
        .iter()
        .map(|(key, value)| {
            format!("{}={} ({})", key, canonical_json(value), value_type_name(value))
        })
        .collect();
    format!("Call {} with {}.", tool, args.join(", "))
}

// =============================================================================
// Canonical JSON
// =============================================================================

/// Stable JSON text: object keys sorted recursively, array order preserved.
pub fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|key| {
                    format!(
                        "{}:{}",
                        Value::String(key.clone()),
                        canonical_json(&map[key])
                    )
                })
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", rendered.join(","))
        }
        other => other.to_string(),
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn sample_params() -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("path".to_string(), json!("/tmp/test.txt"));
        params.insert("max_depth".to_string(), json!(2));
        params.insert("urls".to_string(), json!(["https://example.com"]));
        params
    }

    #[test]
    fn test_imperative_single_line() {
        let prompt = PromptStrategy::Imperative.render("list_directory", &sample_params());
        assert!(!prompt.contains('\n'));
        assert!(prompt.starts_with("Use the list_directory tool with "));
        assert!(prompt.contains("path: \"/tmp/test.txt\""));
        assert!(prompt.contains("max_depth: 2"));
    }

    #[test]
    fn test_natural_explicit_states_types() {
        let prompt =
            PromptStrategy::NaturalExplicit.render("tavily-extract", &sample_params());
        assert!(prompt.contains("Pass urls as an array containing [\"https://example.com\"]."));
        assert!(prompt.contains("Pass max_depth as the number 2."));
        assert!(prompt.contains("Pass path as the string \"/tmp/test.txt\"."));
    }

    #[test]
    fn test_step_by_step_numbered_with_final_call() {
        let prompt = PromptStrategy::StepByStep.render("list_directory", &sample_params());
        let lines: Vec<&str> = prompt.lines().collect();
        // header + 3 assignments + final call
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("1. Set "));
        assert_eq!(lines[4], "4. Call the list_directory tool now.");
    }

    #[test]
    fn test_direct_with_schema_function_notation() {
        let mut params = Map::new();
        params.insert("query".to_string(), json!("rust"));
        let prompt = PromptStrategy::DirectWithSchema.render("search_web", &params);
        assert_eq!(prompt, "search_web({\"query\":\"rust\"})");
    }

    #[test]
    fn test_explicit_types_annotations() {
        let prompt = PromptStrategy::ExplicitTypes.render("list_directory", &sample_params());
        assert!(prompt.contains("max_depth=2 (number)"));
        assert!(prompt.contains("path=\"/tmp/test.txt\" (string)"));
        assert!(prompt.contains("urls=[\"https://example.com\"] (array)"));
    }

    #[test]
    fn test_empty_params_do_not_panic() {
        let empty = Map::new();
        for strategy in PromptStrategy::ALL {
            let prompt = strategy.render("noop_tool", &empty);
            assert!(prompt.contains("noop_tool"));
        }
    }

    #[test]
    fn test_canonical_json_sorts_nested_keys() {
        let value = json!({"b": {"z": 1, "a": [true, null]}, "a": "x"});
        assert_eq!(
            canonical_json(&value),
            "{\"a\":\"x\",\"b\":{\"a\":[true,null],\"z\":1}}"
        );
    }

    #[test]
    fn test_wire_names_round_trip() {
        for strategy in PromptStrategy::ALL {
            let encoded = serde_json::to_string(&strategy).unwrap();
            assert_eq!(encoded, format!("\"{}\"", strategy.name()));
            let decoded: PromptStrategy = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, strategy);
        }
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let params = sample_params();
        for strategy in PromptStrategy::ALL {
            assert_eq!(
                strategy.render("list_directory", &params),
                strategy.render("list_directory", &params)
            );
        }
    }

    proptest! {
        /// Every render arm mentions every parameter key and never panics.
        #[test]
        fn render_references_every_key(
            entries in proptest::collection::btree_map(
                "[a-z_]{1,10}",
                prop_oneof![
                    Just(json!("value")),
                    Just(json!(7)),
                    Just(json!(true)),
                    Just(json!(["a", "b"])),
                    Just(json!({"nested": 1})),
                ],
                1..6,
            )
        ) {
            let mut params = Map::new();
            for (key, value) in &entries {
                params.insert(key.clone(), value.clone());
            }
            for strategy in PromptStrategy::ALL {
                let prompt = strategy.render("sample_tool", &params);
                for key in entries.keys() {
                    prop_assert!(
                        prompt.contains(key.as_str()),
                        "{} omitted key {}",
                        strategy.name(),
                        key
                    );
                }
            }
        }
    }
}
