pub mod cli;
pub mod replay;

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::Context;
use clap::Parser;

use cli::*;
use common::logger::{TraceId, init_logger, root_span};
use strategy::{SignalGenerator, StrategyConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logger("mors", cli.json_logs);

    let base = StrategyConfig::from_env().context("reading MORS_* environment")?;
    let config = build_config_from_cli(&cli, base);

    let mut generator = SignalGenerator::new(config).context("invalid strategy configuration")?;
    tracing::info!(config = ?generator.config(), "strategy configured");

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let trace_id = TraceId::default();
    let span = root_span("replay", &trace_id);
    if let Some(path) = &cli.input {
        span.record("subject", tracing::field::display(path.display()));
    }
    let _guard = span.enter();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = replay::replay(reader, &mut generator, &mut out)?;

    tracing::info!(
        updates = summary.updates,
        signals = summary.signals,
        skipped = summary.skipped,
        last_state = %generator.last_state(),
        "replay finished"
    );

    Ok(())
}
