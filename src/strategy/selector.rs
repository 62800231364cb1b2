//! Strategy selection policies.
//!
//! The selector picks a rendering strategy for a (tool, params) pair. The
//! persisted mapping is injected at construction; selection is a total
//! function and never fails.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::calibration::StrategyMapping;

use super::PromptStrategy;

/// Shape classification of a parameter object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamShape {
    pub has_arrays: bool,
    pub has_numbers: bool,
    pub has_complex: bool,
    pub param_count: usize,
}

impl ParamShape {
    pub fn classify(params: &Map<String, Value>) -> Self {
        Self {
            has_arrays: params.values().any(Value::is_array),
            has_numbers: params.values().any(Value::is_number),
            has_complex: params.values().any(Value::is_object),
            param_count: params.len(),
        }
    }
}

/// How the selector picks a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionPolicy {
    /// Calibrated mapping lookup; mapping default when the tool is unmapped.
    ToolBased,
    /// Parameter-shape rules only.
    ParamBased,
    /// Mapping lookup first, shape rules for unmapped tools.
    Hybrid,
}

/// Picks a rendering strategy for a (tool, params) pair under one policy.
#[derive(Debug)]
pub struct StrategySelector {
    policy: SelectionPolicy,
    mapping: StrategyMapping,
}

impl StrategySelector {
    pub fn new(policy: SelectionPolicy, mapping: StrategyMapping) -> Self {
        Self { policy, mapping }
    }

    /// Select a strategy. Total: always returns a library strategy.
    pub fn select(&self, tool: &str, params: &Map<String, Value>) -> PromptStrategy {
        match self.policy {
            SelectionPolicy::ToolBased => self.tool_based(tool),
            SelectionPolicy::ParamBased => param_based(params),
            SelectionPolicy::Hybrid => self
                .mapping
                .strategy_for(tool)
                .unwrap_or_else(|| param_based(params)),
        }
    }

    fn tool_based(&self, tool: &str) -> PromptStrategy {
        self.mapping
            .strategy_for(tool)
            .unwrap_or(self.mapping.default)
    }
}

/// Fixed shape precedence: arrays, then numbers, then wide/complex, then
/// the imperative baseline.
fn param_based(params: &Map<String, Value>) -> PromptStrategy {
    let shape = ParamShape::classify(params);
    if shape.has_arrays {
        PromptStrategy::NaturalExplicit
    } else if shape.has_numbers {
        PromptStrategy::NaturalExplicit
    } else if shape.param_count > 2 || shape.has_complex {
        PromptStrategy::StepByStep
    } else {
        PromptStrategy::Imperative
    }
}

// =============================================================================
// Tests
// =============================================================================
