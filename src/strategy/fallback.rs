//! Runtime fallback retry across alternate strategies.
//!
//! When the primary strategy fails at runtime, the executor walks a chain of
//! alternates chosen from the parameter shape. Each retry runs in a freshly
//! isolated agent session so earlier failed attempts cannot contaminate later
//! reasoning. Per-attempt errors are swallowed as "this strategy failed";
//! only full chain exhaustion propagates.

use serde_json::{Map, Value};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::agent::AgentExecutor;
use crate::types::{Error, Result};

use super::selector::ParamShape;
use super::PromptStrategy;

// =============================================================================
// Chains
// =============================================================================

/// Named retry chain, chosen from parameter shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackChain {
    /// Params contain arrays.
    ArrayFocused,
    /// Params contain numbers.
    TypeSafe,
    /// At most one parameter.
    Fast,
    /// Everything else.
    Standard,
}

impl FallbackChain {
    /// Pick the chain for a parameter shape. Precedence mirrors the
    /// paramBased selector: arrays, then numbers, then arity.
    pub fn for_shape(shape: ParamShape) -> Self {
        if shape.has_arrays {
            FallbackChain::ArrayFocused
        } else if shape.has_numbers {
            FallbackChain::TypeSafe
        } else if shape.param_count <= 1 {
            FallbackChain::Fast
        } else {
            FallbackChain::Standard
        }
    }

    /// Ordered strategies for this chain.
    pub fn strategies(self) -> &'static [PromptStrategy] {
        match self {
            FallbackChain::ArrayFocused => &[
                PromptStrategy::StepByStep,
                PromptStrategy::NaturalExplicit,
                PromptStrategy::Imperative,
            ],
            FallbackChain::TypeSafe => &[
                PromptStrategy::NaturalExplicit,
                PromptStrategy::StepByStep,
                PromptStrategy::Imperative,
            ],
            FallbackChain::Fast => &[PromptStrategy::Imperative, PromptStrategy::StepByStep],
            FallbackChain::Standard => &[
                PromptStrategy::Imperative,
                PromptStrategy::NaturalExplicit,
                PromptStrategy::StepByStep,
            ],
        }
    }
}

// =============================================================================
// Executor
// =============================================================================

/// Successful fallback run.
#[derive(Debug, Clone)]
pub struct FallbackOutcome {
    pub strategy: PromptStrategy,
    pub output: String,
    pub duration: Duration,
    pub fallback_used: bool,
}

/// Retries alternate strategies after a primary failure, sequentially, one
/// isolated session per attempt.
#[derive(Debug)]
pub struct FallbackExecutor<E> {
    executor: E,
    max_steps: u32,
    retry_delay: Duration,
}

impl<E: AgentExecutor> FallbackExecutor<E> {
    pub fn new(executor: E, max_steps: u32, retry_delay: Duration) -> Self {
        Self {
            executor,
            max_steps,
            retry_delay,
        }
    }

    /// Retry alternates from the shape-selected chain after `failed` failed.
    ///
    /// The failed strategy is never retried. Returns the first success
    /// annotated `fallback_used`, or `Error::ChainExhausted` naming every
    /// attempted strategy (primary included).
    pub fn run_with_fallback(
        &self,
        tool: &str,
        params: &Map<String, Value>,
        failed: PromptStrategy,
    ) -> Result<FallbackOutcome> {
        let chain = FallbackChain::for_shape(ParamShape::classify(params));
        debug!(tool, chain = ?chain, failed = %failed, "entering fallback chain");

        let mut attempted = vec![failed.name().to_string()];
        let mut first_retry = true;

        for &strategy in chain.strategies() {
            if strategy == failed {
                continue;
            }
            if !first_retry {
                std::thread::sleep(self.retry_delay);
            }
            first_retry = false;
            attempted.push(strategy.name().to_string());

            let prompt = strategy.render(tool, params);
            let started = Instant::now();
            match self.executor.run(&prompt, self.max_steps) {
                Ok(output) => {
                    let duration = started.elapsed();
                    debug!(
                        tool,
                        strategy = %strategy,
                        duration_ms = duration.as_millis() as u64,
                        "fallback strategy succeeded"
                    );
                    return Ok(FallbackOutcome {
                        strategy,
                        output,
                        duration,
                        fallback_used: true,
                    });
                }
                Err(err) => {
                    warn!(tool, strategy = %strategy, error = %err, "fallback strategy failed");
                }
            }
        }

        Err(Error::ChainExhausted {
            tool: tool.to_string(),
            attempted,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    /// Records prompts; fails the first `failures` calls, then succeeds.
    struct FlakyAgent {
        failures: usize,
        calls: RefCell<Vec<String>>,
    }

    impl FlakyAgent {
        fn new(failures: usize) -> Self {
            Self {
                failures,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl AgentExecutor for FlakyAgent {
        fn run(&self, prompt: &str, _max_steps: u32) -> Result<String> {
            let mut calls = self.calls.borrow_mut();
            calls.push(prompt.to_string());
            if calls.len() <= self.failures {
                Err(Error::agent("simulated failure"))
            } else {
                Ok("done".to_string())
            }
        }
    }

    fn params(value: serde_json::Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test params must be an object"),
        }
    }

    fn executor(agent: FlakyAgent) -> FallbackExecutor<FlakyAgent> {
        FallbackExecutor::new(agent, 5, Duration::ZERO)
    }

    #[test]
    fn test_chain_selection_by_shape() {
        let array = ParamShape::classify(&params(json!({"urls": ["a"]})));
        assert_eq!(FallbackChain::for_shape(array), FallbackChain::ArrayFocused);

        let numeric = ParamShape::classify(&params(json!({"max_pages": 3})));
        assert_eq!(FallbackChain::for_shape(numeric), FallbackChain::TypeSafe);

        let single = ParamShape::classify(&params(json!({"path": "/tmp"})));
        assert_eq!(FallbackChain::for_shape(single), FallbackChain::Fast);

        let wide = ParamShape::classify(&params(json!({"a": "x", "b": "y"})));
        assert_eq!(FallbackChain::for_shape(wide), FallbackChain::Standard);
    }

    #[test]
    fn test_failed_strategy_is_never_retried() {
        // Numeric params select typeSafe [naturalExplicit, stepByStep, imperative];
        // naturalExplicit already failed, so only the other two may run.
        let params = params(json!({"max_pages": 3}));
        let exec = executor(FlakyAgent::new(0));
        let outcome = exec
            .run_with_fallback("crawl", &params, PromptStrategy::NaturalExplicit)
            .unwrap();

        assert_eq!(outcome.strategy, PromptStrategy::StepByStep);
        assert!(outcome.fallback_used);

        let excluded = PromptStrategy::NaturalExplicit.render("crawl", &params);
        for prompt in exec.executor.calls.borrow().iter() {
            assert_ne!(prompt, &excluded);
        }
    }

    #[test]
    fn test_first_success_wins() {
        // Standard chain; first alternate fails, second succeeds.
        let params = params(json!({"a": "x", "b": "y"}));
        let exec = executor(FlakyAgent::new(1));
        let outcome = exec
            .run_with_fallback("tool", &params, PromptStrategy::DirectWithSchema)
            .unwrap();

        // standard = [imperative, naturalExplicit, stepByStep]
        assert_eq!(outcome.strategy, PromptStrategy::NaturalExplicit);
        assert_eq!(exec.executor.calls.borrow().len(), 2);
    }

    #[test]
    fn test_exhaustion_lists_all_attempted() {
        let params = params(json!({"path": "/tmp"}));
        let exec = executor(FlakyAgent::new(usize::MAX));
        let err = exec
            .run_with_fallback("list_directory", &params, PromptStrategy::Imperative)
            .unwrap_err();

        // fast = [imperative, stepByStep]; imperative excluded as the primary
        match err {
            Error::ChainExhausted { tool, attempted } => {
                assert_eq!(tool, "list_directory");
                assert_eq!(attempted, vec!["imperative", "stepByStep"]);
            }
            other => panic!("expected ChainExhausted, got {other}"),
        }
    }
}
