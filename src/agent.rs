//! Agent execution collaborator.
//!
//! The calibrator treats agent execution as a black box: it renders a prompt,
//! runs it under a step budget, and observes only success/failure and
//! duration. The underlying model, reasoning policy, and tool binding are
//! out of scope.

use serde_json::json;
use uuid::Uuid;

use crate::types::{AgentConfig, Error, Result};

/// Opaque agent-execution collaborator.
///
/// Every `run` call executes in a freshly isolated session: implementations
/// must not carry conversational or memory state across calls. The wall-clock
/// timeout and step cap are enforced inside the implementation.
pub trait AgentExecutor {
    fn run(&self, prompt: &str, max_steps: u32) -> Result<String>;
}

/// HTTP-backed executor for a remote agent service.
///
/// One POST per run, with a fresh session id so the backend cannot correlate
/// attempts into a shared conversation. The blocking client owns its internal
/// runtime; the calibration loop stays a plain sequential procedure.
#[derive(Debug)]
pub struct HttpAgentExecutor {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpAgentExecutor {
    pub fn new(config: &AgentConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

impl AgentExecutor for HttpAgentExecutor {
    fn run(&self, prompt: &str, max_steps: u32) -> Result<String> {
        let body = json!({
            "session_id": Uuid::new_v4().to_string(),
            "prompt": prompt,
            "max_steps": max_steps,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|err| {
                if err.is_timeout() {
                    Error::timeout(format!("agent call timed out: {err}"))
                } else {
                    Error::from(err)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::agent(format!("agent returned {status}")));
        }
        Ok(response.text()?)
    }
}
