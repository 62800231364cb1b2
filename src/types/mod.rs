//! Core types for the calibrator.
//!
//! This module provides foundational types used throughout the system:
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for the agent backend and
//!   calibration runs
mod config;
mod errors;

pub use config::{AgentConfig, CalibrationConfig, Config};
pub use errors::{Error, Result};
