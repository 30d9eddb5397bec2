use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use strategy::{CurvaturePadding, StrategyConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PaddingCli {
    /// First ten curvature offsets count as 0.0
    Zero,
    /// First ten curvature offsets are left out
    Trimmed,
}

/// Replays a JSON-lines tick stream and prints every emitted signal as one JSON line.
///
/// Flags override the `MORS_*` environment, which overrides the defaults.
#[derive(Debug, Parser)]
#[clap(name = "mors", version)]
pub struct Cli {
    /// Tick file (JSON lines). Reads stdin when omitted.
    #[clap(long)]
    pub input: Option<PathBuf>,

    /// Classification window size
    #[clap(long)]
    pub window_size: Option<usize>,

    /// EMA smoothing factor, in (0, 1]
    #[clap(long)]
    pub ema_alpha: Option<f64>,

    /// Samples required before the trend can leave neutral
    #[clap(long)]
    pub min_window_samples: Option<usize>,

    /// Curvature window capacity
    #[clap(long)]
    pub curvature_window: Option<usize>,

    /// Curvature series padding
    #[clap(long, value_enum)]
    pub padding: Option<PaddingCli>,

    /// Emit logs as JSON
    #[clap(long)]
    pub json_logs: bool,
}

/// Convert CLI padding selection → internal CurvaturePadding
pub(crate) fn cli_to_padding(p: PaddingCli) -> CurvaturePadding {
    match p {
        PaddingCli::Zero => CurvaturePadding::ZeroPadded,
        PaddingCli::Trimmed => CurvaturePadding::Trimmed,
    }
}

/// Layer CLI flags over a base configuration
pub(crate) fn build_config_from_cli(cli: &Cli, base: StrategyConfig) -> StrategyConfig {
    let mut cfg = base;

    if let Some(window_size) = cli.window_size {
        cfg.window_size = window_size;
    }
    if let Some(alpha) = cli.ema_alpha {
        cfg.ema_alpha = alpha;
    }
    if let Some(min) = cli.min_window_samples {
        cfg = cfg.with_min_window_samples(min);
    }
    if let Some(window) = cli.curvature_window {
        cfg = cfg.with_curvature_window(window);
    }
    if let Some(padding) = cli.padding {
        cfg = cfg.with_curvature_padding(cli_to_padding(padding));
    }

    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_base_config() {
        let cli = Cli::parse_from([
            "mors",
            "--window-size",
            "50",
            "--ema-alpha",
            "0.3",
            "--min-window-samples",
            "40",
            "--padding",
            "trimmed",
        ]);

        let cfg = build_config_from_cli(&cli, StrategyConfig::default());

        assert_eq!(cfg.window_size, 50);
        assert_eq!(cfg.ema_alpha, 0.3);
        assert_eq!(cfg.trend.min_window_samples, 40);
        assert_eq!(cfg.curvature.window, 300);
        assert_eq!(cfg.curvature.padding, CurvaturePadding::Trimmed);
        assert!(cli.input.is_none());
        assert!(!cli.json_logs);
    }

    #[test]
    fn no_flags_keep_base_config() {
        let cli = Cli::parse_from(["mors"]);
        let base = StrategyConfig::new(80, 0.2).with_curvature_window(120);

        assert_eq!(build_config_from_cli(&cli, base.clone()), base);
    }
}
