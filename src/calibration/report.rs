//! Per-server calibration reports.
//!
//! Each server pass produces two parallel files: a machine-readable JSON
//! array of calibration results and a human-readable text summary.

use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::types::Result;

use super::engine::ServerCalibration;

/// Write both report files for one server pass.
///
/// Returns the (json, text) paths. The report directory is created on
/// demand.
pub fn write_reports(dir: &Path, calibration: &ServerCalibration) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)?;

    let json_path = dir.join(format!("{}-calibration.json", calibration.server));
    let text_path = dir.join(format!("{}-calibration.txt", calibration.server));

    std::fs::write(&json_path, serde_json::to_string_pretty(&calibration.results)?)?;
    std::fs::write(&text_path, render_text(calibration))?;

    Ok((json_path, text_path))
}

/// Render the human-readable report body.
pub fn render_text(calibration: &ServerCalibration) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Calibration report for server '{}'\n",
        calibration.server
    ));
    out.push_str(&format!("Generated: {}\n\n", Utc::now().to_rfc3339()));

    for result in &calibration.results {
        match (result.best_strategy, result.best_duration_ms) {
            (Some(best), Some(duration_ms)) => out.push_str(&format!(
                "  {:<32} {} ({} ms)\n",
                result.tool_name,
                best.name(),
                duration_ms
            )),
            _ => out.push_str(&format!(
                "  {:<32} FAILED (no strategy succeeded)\n",
                result.tool_name
            )),
        }
    }
    for tool in &calibration.skipped {
        out.push_str(&format!("  {:<32} SKIPPED (no testable parameters)\n", tool));
    }

    out.push_str("\nStrategy distribution:\n");
    for (strategy, count) in &calibration.distribution {
        out.push_str(&format!("  {:<20} {}\n", strategy.name(), count));
    }
    out
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::engine::{CalibrationAttempt, CalibrationResult};
    use crate::strategy::PromptStrategy;
    use std::collections::BTreeMap;

    fn sample_calibration() -> ServerCalibration {
        let result = CalibrationResult {
            tool_name: "list_directory".to_string(),
            server_name: "fs".to_string(),
            sample_params: serde_json::Map::new(),
            best_strategy: Some(PromptStrategy::Imperative),
            best_duration_ms: Some(500),
            all_attempts: vec![CalibrationAttempt {
                strategy: PromptStrategy::Imperative,
                success: true,
                duration_ms: 500,
                error: None,
            }],
            all_failed: false,
        };
        let failed = CalibrationResult {
            tool_name: "broken_tool".to_string(),
            server_name: "fs".to_string(),
            sample_params: serde_json::Map::new(),
            best_strategy: None,
            best_duration_ms: None,
            all_attempts: Vec::new(),
            all_failed: true,
        };
        let mut distribution = BTreeMap::new();
        distribution.insert(PromptStrategy::Imperative, 1);
        ServerCalibration {
            server: "fs".to_string(),
            results: vec![result, failed],
            skipped: vec!["no_params".to_string()],
            distribution,
        }
    }

    #[test]
    fn test_text_report_contents() {
        let text = render_text(&sample_calibration());
        assert!(text.contains("Calibration report for server 'fs'"));
        assert!(text.contains("list_directory"));
        assert!(text.contains("imperative (500 ms)"));
        assert!(text.contains("broken_tool"));
        assert!(text.contains("FAILED"));
        assert!(text.contains("no_params"));
        assert!(text.contains("SKIPPED"));
        assert!(text.contains("Strategy distribution:"));
    }

    #[test]
    fn test_write_reports_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let (json_path, text_path) =
            write_reports(dir.path(), &sample_calibration()).unwrap();

        assert_eq!(
            json_path.file_name().unwrap().to_str().unwrap(),
            "fs-calibration.json"
        );
        assert_eq!(
            text_path.file_name().unwrap().to_str().unwrap(),
            "fs-calibration.txt"
        );

        let raw = std::fs::read_to_string(&json_path).unwrap();
        let parsed: Vec<CalibrationResult> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].tool_name, "list_directory");
        assert!(parsed[1].all_failed);

        assert!(std::fs::read_to_string(&text_path)
            .unwrap()
            .contains("list_directory"));
    }
}
