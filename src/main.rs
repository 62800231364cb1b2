//! Calibration CLI entry point.
//!
//! `calibrate <server|all>` runs the calibration engine against one or all
//! configured servers. A failed catalog lookup aborts that server's pass
//! only; the mapping is rewritten after each completed pass so earlier
//! results survive later failures.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use promptcal::agent::HttpAgentExecutor;
use promptcal::calibration::{report, CalibrationEngine, StrategyMapping};
use promptcal::catalog::ToolCatalog;
use promptcal::Config;

#[derive(Debug, Parser)]
#[command(
    name = "calibrate",
    about = "Benchmark prompt strategies against a server's tools"
)]
struct Cli {
    /// Server to calibrate, or "all".
    server: String,

    /// Tool catalog file: serverName -> [tool descriptors].
    #[arg(long, env = "PROMPTCAL_CATALOG", default_value = "calibration/catalog.json")]
    catalog: PathBuf,

    /// Optional config file; defaults apply when absent.
    #[arg(long, env = "PROMPTCAL_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    promptcal::observability::init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "calibration aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> promptcal::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let catalog = ToolCatalog::load(&cli.catalog)?;
    let servers = if cli.server == "all" {
        catalog.server_names()
    } else {
        vec![cli.server.clone()]
    };

    let executor = HttpAgentExecutor::new(&config.agent)?;
    let engine = CalibrationEngine::new(&executor, config.calibration.clone());

    let mut mapping = StrategyMapping::load(&config.calibration.mapping_path)?;

    for server in &servers {
        // CatalogFailure is fatal to this server's pass only.
        let tools = match catalog.tools_for(server) {
            Ok(tools) => tools,
            Err(err) => {
                tracing::error!(server = %server, error = %err, "skipping server");
                continue;
            }
        };

        let outcome = engine.calibrate_server(server, tools, &mut mapping);
        mapping.save(&config.calibration.mapping_path)?;

        let (json_path, text_path) =
            report::write_reports(&config.calibration.report_dir, &outcome)?;
        tracing::info!(
            server = %server,
            calibrated = outcome.results.len(),
            skipped = outcome.skipped.len(),
            json_report = %json_path.display(),
            text_report = %text_path.display(),
            "server pass complete"
        );
    }

    Ok(())
}
