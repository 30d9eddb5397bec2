use std::str::FromStr;

use crate::error::ConfigError;
use crate::pulse::curvature::{CURVATURE_WINDOW, MIN_CURVATURE_SAMPLES};

/// Thresholds consumed by the trend classifier.
///
/// Checked as an ordered chain; see [`crate::pulse::trend::classify`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrendThresholds {
    pub strong_up_avg: f64,
    pub up_avg: f64,
    pub strong_down_avg: f64,
    pub down_avg: f64,

    pub pos_ratio_strong: f64,
    pub pos_ratio_up: f64,
    pub neg_ratio_strong: f64,
    pub neg_ratio_down: f64,

    /// Below this many samples the window always classifies as neutral.
    pub min_window_samples: usize,
}

impl Default for TrendThresholds {
    fn default() -> Self {
        Self {
            strong_up_avg: 0.35,
            up_avg: 0.15,
            strong_down_avg: -0.35,
            down_avg: -0.15,
            pos_ratio_strong: 0.7,
            pos_ratio_up: 0.6,
            neg_ratio_strong: 0.7,
            neg_ratio_down: 0.6,
            min_window_samples: 100,
        }
    }
}

/// How the curvature series treats the first ten offsets, which have no full history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CurvaturePadding {
    /// Offsets 0..10 enter the percentile series as 0.0.
    #[default]
    ZeroPadded,
    /// Offsets 0..10 are left out of the percentile series.
    Trimmed,
}

impl FromStr for CurvaturePadding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" | "zero_padded" => Ok(CurvaturePadding::ZeroPadded),
            "trimmed" | "trim" => Ok(CurvaturePadding::Trimmed),
            other => Err(format!("unknown curvature padding: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvatureConfig {
    /// Capacity of the curvature window. Detection waits until it is full.
    pub window: usize,
    pub padding: CurvaturePadding,
}

impl Default for CurvatureConfig {
    fn default() -> Self {
        Self {
            window: CURVATURE_WINDOW,
            padding: CurvaturePadding::default(),
        }
    }
}

/// Strategy parameters. Built once, then moved into the generator.
#[derive(Clone, Debug, PartialEq)]
pub struct StrategyConfig {
    /// Capacity of the classification window.
    pub window_size: usize,

    /// EMA smoothing factor, in (0, 1].
    pub ema_alpha: f64,

    pub trend: TrendThresholds,
    pub curvature: CurvatureConfig,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::new(100, 0.1)
    }
}

impl StrategyConfig {
    pub fn new(window_size: usize, ema_alpha: f64) -> Self {
        Self {
            window_size,
            ema_alpha,
            trend: TrendThresholds::default(),
            curvature: CurvatureConfig::default(),
        }
    }

    /// Average thresholds for strong up, up, strong down and down.
    pub fn with_scale(mut self, strong_up: f64, up: f64, strong_down: f64, down: f64) -> Self {
        self.trend.strong_up_avg = strong_up;
        self.trend.up_avg = up;
        self.trend.strong_down_avg = strong_down;
        self.trend.down_avg = down;
        self
    }

    pub fn with_pos_threshold(mut self, strong: f64, up: f64) -> Self {
        self.trend.pos_ratio_strong = strong;
        self.trend.pos_ratio_up = up;
        self
    }

    pub fn with_neg_threshold(mut self, strong: f64, down: f64) -> Self {
        self.trend.neg_ratio_strong = strong;
        self.trend.neg_ratio_down = down;
        self
    }

    pub fn with_min_window_samples(mut self, min_window_samples: usize) -> Self {
        self.trend.min_window_samples = min_window_samples;
        self
    }

    pub fn with_curvature_window(mut self, window: usize) -> Self {
        self.curvature.window = window;
        self
    }

    pub fn with_curvature_padding(mut self, padding: CurvaturePadding) -> Self {
        self.curvature.padding = padding;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ema_alpha > 0.0 && self.ema_alpha <= 1.0) {
            return Err(ConfigError::InvalidAlpha(self.ema_alpha));
        }
        if self.window_size == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if self.curvature.window < MIN_CURVATURE_SAMPLES {
            return Err(ConfigError::CurvatureWindowTooSmall {
                min: MIN_CURVATURE_SAMPLES,
                got: self.curvature.window,
            });
        }
        if self.window_size < self.trend.min_window_samples {
            tracing::warn!(
                window_size = self.window_size,
                min_window_samples = self.trend.min_window_samples,
                "classification window can never reach the sample floor; trend stays neutral"
            );
        }
        Ok(())
    }

    /// Reads `MORS_*` variables over the defaults. Unset variables keep their default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        set_from(&lookup, "MORS_WINDOW_SIZE", &mut cfg.window_size)?;
        set_from(&lookup, "MORS_EMA_ALPHA", &mut cfg.ema_alpha)?;

        set_from(&lookup, "MORS_STRONG_UP_AVG", &mut cfg.trend.strong_up_avg)?;
        set_from(&lookup, "MORS_UP_AVG", &mut cfg.trend.up_avg)?;
        set_from(&lookup, "MORS_STRONG_DOWN_AVG", &mut cfg.trend.strong_down_avg)?;
        set_from(&lookup, "MORS_DOWN_AVG", &mut cfg.trend.down_avg)?;
        set_from(&lookup, "MORS_POS_RATIO_STRONG", &mut cfg.trend.pos_ratio_strong)?;
        set_from(&lookup, "MORS_POS_RATIO_UP", &mut cfg.trend.pos_ratio_up)?;
        set_from(&lookup, "MORS_NEG_RATIO_STRONG", &mut cfg.trend.neg_ratio_strong)?;
        set_from(&lookup, "MORS_NEG_RATIO_DOWN", &mut cfg.trend.neg_ratio_down)?;
        set_from(
            &lookup,
            "MORS_MIN_WINDOW_SAMPLES",
            &mut cfg.trend.min_window_samples,
        )?;

        set_from(&lookup, "MORS_CURVATURE_WINDOW", &mut cfg.curvature.window)?;
        set_from(&lookup, "MORS_CURVATURE_PADDING", &mut cfg.curvature.padding)?;

        Ok(cfg)
    }
}

fn set_from<F, T>(lookup: &F, key: &'static str, slot: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv {
                key,
                value: raw.clone(),
            })?;
    }
    Ok(())
}
