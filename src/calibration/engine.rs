//! Calibration engine — measures every strategy against every tool.
//!
//! Execution is strictly sequential: one (tool, strategy) trial runs to
//! completion before the next begins. Concurrent trials against the shared
//! backend would corrupt conversational state and invalidate latency
//! measurements. Each trial runs in a freshly isolated agent session; a fixed
//! inter-trial delay backs off the calibrated backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::agent::AgentExecutor;
use crate::catalog::ToolDescriptor;
use crate::strategy::PromptStrategy;
use crate::synth;
use crate::types::CalibrationConfig;

use super::store::{StrategyMapping, ToolStrategyEntry};

// =============================================================================
// Records
// =============================================================================

/// One measured (tool, strategy) trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationAttempt {
    #[serde(rename = "strategyName")]
    pub strategy: PromptStrategy,
    pub success: bool,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
    #[serde(rename = "errorMessage", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full calibration record for one tool. Produced once per run, never
/// mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationResult {
    pub tool_name: String,
    pub server_name: String,
    pub sample_params: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_strategy: Option<PromptStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_duration_ms: Option<u64>,
    pub all_attempts: Vec<CalibrationAttempt>,
    pub all_failed: bool,
}

/// Outcome of one server calibration pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCalibration {
    pub server: String,
    pub results: Vec<CalibrationResult>,
    /// Tools with no testable parameters, never attempted.
    pub skipped: Vec<String>,
    /// How many tools picked each strategy as best.
    pub distribution: BTreeMap<PromptStrategy, usize>,
}

// =============================================================================
// Engine
// =============================================================================

/// Sequential calibration driver over an opaque agent collaborator.
#[derive(Debug)]
pub struct CalibrationEngine<'a, E> {
    executor: &'a E,
    config: CalibrationConfig,
}

impl<'a, E: AgentExecutor> CalibrationEngine<'a, E> {
    pub fn new(executor: &'a E, config: CalibrationConfig) -> Self {
        Self { executor, config }
    }

    /// Calibrate every tool of one server, merging winners into `mapping`.
    ///
    /// Per-trial failures are recorded, never propagated; a tool where every
    /// strategy fails gets `all_failed` and no mapping entry.
    pub fn calibrate_server(
        &self,
        server: &str,
        tools: &[ToolDescriptor],
        mapping: &mut StrategyMapping,
    ) -> ServerCalibration {
        info!(server, tools = tools.len(), "starting calibration pass");

        let mut results = Vec::new();
        let mut skipped = Vec::new();
        let mut distribution: BTreeMap<PromptStrategy, usize> = BTreeMap::new();

        for (tool_index, tool) in tools.iter().enumerate() {
            if tool_index > 0 {
                std::thread::sleep(self.config.attempt_delay);
            }
            debug!(server, tool = %tool.prompt_line(), "calibrating tool");

            let params = synth::synthesize(&tool.input_schema);
            if params.is_empty() {
                info!(server, tool = %tool.name, "no testable parameters, skipping");
                skipped.push(tool.name.clone());
                continue;
            }

            let result = self.calibrate_tool(server, &tool.name, params);
            if let Some(best) = result.best_strategy {
                *distribution.entry(best).or_default() += 1;
                mapping.merge_entry(ToolStrategyEntry {
                    server: server.to_string(),
                    tool: tool.name.clone(),
                    strategy: best,
                });
            }
            results.push(result);
        }

        info!(
            server,
            calibrated = results.len(),
            skipped = skipped.len(),
            "calibration pass complete"
        );
        ServerCalibration {
            server: server.to_string(),
            results,
            skipped,
            distribution,
        }
    }

    /// Try every strategy, in fixed order, against one tool.
    fn calibrate_tool(
        &self,
        server: &str,
        tool: &str,
        params: Map<String, Value>,
    ) -> CalibrationResult {
        let mut attempts = Vec::with_capacity(PromptStrategy::ALL.len());
        for (index, strategy) in PromptStrategy::ALL.into_iter().enumerate() {
            if index > 0 {
                std::thread::sleep(self.config.attempt_delay);
            }
            attempts.push(self.run_trials(tool, strategy, &params));
        }

        let best = attempts
            .iter()
            .filter(|attempt| attempt.success)
            .min_by_key(|attempt| attempt.duration_ms)
            .cloned();
        let all_failed = best.is_none();

        match &best {
            Some(attempt) => info!(
                server,
                tool,
                best = %attempt.strategy,
                duration_ms = attempt.duration_ms,
                "tool calibrated"
            ),
            None => warn!(server, tool, "all strategies failed"),
        }

        CalibrationResult {
            tool_name: tool.to_string(),
            server_name: server.to_string(),
            sample_params: params,
            best_strategy: best.as_ref().map(|attempt| attempt.strategy),
            best_duration_ms: best.as_ref().map(|attempt| attempt.duration_ms),
            all_attempts: attempts,
            all_failed,
        }
    }

    /// Run the configured sample count for one strategy. The recorded attempt
    /// is the fastest successful sample, or the last failure when none
    /// succeed.
    fn run_trials(
        &self,
        tool: &str,
        strategy: PromptStrategy,
        params: &Map<String, Value>,
    ) -> CalibrationAttempt {
        let prompt = strategy.render(tool, params);
        let samples = self.config.samples_per_strategy.max(1);

        let mut recorded = self.run_single(tool, strategy, &prompt);
        for _ in 1..samples {
            std::thread::sleep(self.config.attempt_delay);
            recorded = pick_attempt(recorded, self.run_single(tool, strategy, &prompt));
        }
        recorded
    }

    /// One trial. Duration covers the single agent invocation only; the
    /// per-trial error is caught here and recorded, never thrown upward.
    fn run_single(
        &self,
        tool: &str,
        strategy: PromptStrategy,
        prompt: &str,
    ) -> CalibrationAttempt {
        let started = Instant::now();
        let outcome = self.executor.run(prompt, self.config.max_steps);
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(_) => {
                info!(tool, strategy = %strategy, duration_ms, "trial succeeded");
                CalibrationAttempt {
                    strategy,
                    success: true,
                    duration_ms,
                    error: None,
                }
            }
            Err(err) => {
                warn!(tool, strategy = %strategy, duration_ms, error = %err, "trial failed");
                CalibrationAttempt {
                    strategy,
                    success: false,
                    duration_ms,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}

/// Prefer success, then lower latency; among failures keep the newest.
fn pick_attempt(prev: CalibrationAttempt, next: CalibrationAttempt) -> CalibrationAttempt {
    match (prev.success, next.success) {
        (true, true) => {
            if next.duration_ms < prev.duration_ms {
                next
            } else {
                prev
            }
        }
        (true, false) => prev,
        (false, _) => next,
    }
}

// =============================================================================
// Tests
// =============================================================================
