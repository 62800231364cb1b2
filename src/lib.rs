//! # Promptcal - Tool-Invocation Strategy Calibration
//!
//! Empirically determines, per tool, which of several natural-language prompt
//! renderings ("strategies") most reliably and quickly elicits a correct tool
//! call from an LLM-driven agent, and persists that choice for reuse.
//!
//! ## Architecture
//!
//! ```text
//!   tool catalog ──> Parameter Synthesizer ──> sample args
//!                                                  │
//!                    Strategy Library ──> rendered prompts
//!                                                  │
//!                    Calibration Engine ──> agent collaborator (opaque)
//!                          │                       │
//!                          └── outcomes/latency ◄──┘
//!                          │
//!                    Results Store (tool → best strategy, merge-safe)
//!                          │
//!   runtime:         Strategy Selector ──(failure)──> Fallback Chain Executor
//! ```
//!
//! Calibration is strictly sequential: one (tool, strategy) trial completes
//! before the next begins, each in a freshly isolated agent session.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod agent;
pub mod calibration;
pub mod catalog;
pub mod strategy;
pub mod synth;
pub mod types;

// Internal utilities
pub mod observability;

pub use types::{Config, Error, Result};
