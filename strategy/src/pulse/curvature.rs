//! Curvature Reversal Detector
//!
//! Decides whether the latest smoothed score sits at an extreme bend of the
//! recent trajectory, i.e. a likely local top or bottom.
//!
//! ## Local curvature
//! With `W` the full window of length `n`:
//!
//! ```text
//! prev5 = W[n-10..n-5]
//! last5 = W[n-5..n]
//! diff  = mean(last5) - mean(prev5)
//! ```
//!
//! ## Shape filter
//! A trend that is still printing new extremes is not reversing:
//! - top:    `diff < 0 && max(last5) < max(prev5)`
//! - bottom: `diff > 0 && min(last5) > min(prev5)`
//!
//! ## Percentile threshold
//! "Extreme" is relative to the window's own history. The curvature series is
//! `curv[i] = mean(W[i-5..i]) - mean(W[i-10..i-5])` for `i in 10..n`; the
//! first ten offsets are either padded with zeros or dropped, per
//! [`CurvaturePadding`]. After sorting, `idx = floor(0.1 * len)`:
//!
//! ```text
//! low  = sorted[idx]
//! high = sorted[len - idx - 1]
//! ```
//!
//! A top needs `diff <= low`, a bottom needs `diff >= high`.
//!
//! ## Warm-up guard
//! Nothing is reported until the window is completely full.

use super::{PulseResult, PulseValidity};
use crate::config::{CurvatureConfig, CurvaturePadding};
use crate::rolling_window::RollingWindow;

/// Default capacity of the curvature window.
pub const CURVATURE_WINDOW: usize = 300;

/// Samples per block when comparing the two most recent blocks.
const BLOCK: usize = 5;

/// Two blocks are needed for a single curvature value.
pub const MIN_CURVATURE_SAMPLES: usize = 2 * BLOCK;

/// Tail fraction used for the low/high thresholds.
const TAIL: f64 = 0.1;

/// Which reversal the caller is looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extremum {
    /// Local top after an up-trend (curvature bending down).
    Top,
    /// Local bottom after a down-trend (curvature bending up).
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PercentileBounds {
    /// 10th percentile of the curvature series.
    pub low: f64,
    /// 90th percentile, taken symmetrically from the top end.
    pub high: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvatureReading {
    pub extremum: Extremum,

    /// Curvature at the current point.
    pub diff: f64,

    /// Whether the shape filter passed.
    pub shape_ok: bool,

    /// Only computed once the shape filter passes.
    pub bounds: Option<PercentileBounds>,

    pub is_best_point: bool,

    pub validity: PulseValidity,
}

impl CurvatureReading {
    fn warming_up(extremum: Extremum) -> Self {
        Self {
            extremum,
            diff: 0.0,
            shape_ok: false,
            bounds: None,
            is_best_point: false,
            validity: PulseValidity::Invalid,
        }
    }
}

impl PulseResult for CurvatureReading {
    fn validity(&self) -> PulseValidity {
        self.validity
    }
}

/// Curvature detector state. Fed with every smoothed score, whatever the trend.
#[derive(Clone, Debug)]
pub struct CurvatureFilter {
    window: RollingWindow,
    padding: CurvaturePadding,
}

impl Default for CurvatureFilter {
    fn default() -> Self {
        Self::new(CURVATURE_WINDOW, CurvaturePadding::default())
    }
}

impl CurvatureFilter {
    pub fn new(window: usize, padding: CurvaturePadding) -> Self {
        Self {
            window: RollingWindow::new(window),
            padding,
        }
    }

    pub fn from_config(cfg: &CurvatureConfig) -> Self {
        Self::new(cfg.window, cfg.padding)
    }

    pub fn append(&mut self, score: f64) {
        self.window.push(score);
    }

    pub fn is_best_point(&self, extremum: Extremum) -> bool {
        self.evaluate(extremum).is_best_point
    }

    pub fn evaluate(&self, extremum: Extremum) -> CurvatureReading {
        let ws = &self.window;
        let n = ws.len();

        if !ws.is_full() || n < MIN_CURVATURE_SAMPLES {
            return CurvatureReading::warming_up(extremum);
        }

        let prev = n - 2 * BLOCK..n - BLOCK;
        let last = n - BLOCK..n;

        let diff = ws.mean_of(last.clone()) - ws.mean_of(prev.clone());

        let (prev_min, prev_max) = min_max(ws.range(prev));
        let (last_min, last_max) = min_max(ws.range(last));

        let shape_ok = match extremum {
            Extremum::Top => diff < 0.0 && last_max < prev_max,
            Extremum::Bottom => diff > 0.0 && last_min > prev_min,
        };

        if !shape_ok {
            return CurvatureReading {
                extremum,
                diff,
                shape_ok,
                bounds: None,
                is_best_point: false,
                validity: PulseValidity::Valid,
            };
        }

        let mut series = self.curvature_series();
        let bounds = percentile_bounds(&mut series);

        let is_best_point = match (extremum, bounds) {
            (Extremum::Top, Some(b)) => diff <= b.low,
            (Extremum::Bottom, Some(b)) => diff >= b.high,
            (_, None) => false,
        };

        tracing::debug!(
            ?extremum,
            diff,
            low = bounds.map(|b| b.low),
            high = bounds.map(|b| b.high),
            is_best_point,
            "curvature evaluated"
        );

        CurvatureReading {
            extremum,
            diff,
            shape_ok,
            bounds,
            is_best_point,
            validity: PulseValidity::Valid,
        }
    }

    /// Curvature at every offset of the current window, oldest first.
    pub fn curvature_series(&self) -> Vec<f64> {
        let ws = &self.window;
        let n = ws.len();

        let mut series = Vec::with_capacity(n);
        if self.padding == CurvaturePadding::ZeroPadded {
            series.resize(n.min(MIN_CURVATURE_SAMPLES), 0.0);
        }
        for i in MIN_CURVATURE_SAMPLES..n {
            series.push(ws.mean_of(i - BLOCK..i) - ws.mean_of(i - 2 * BLOCK..i - BLOCK));
        }
        series
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }
}

/// Sorts `series` in place and reads the symmetric 10% tails.
///
/// Returns `None` for an empty series.
pub fn percentile_bounds(series: &mut [f64]) -> Option<PercentileBounds> {
    if series.is_empty() {
        return None;
    }

    series.sort_by(f64::total_cmp);

    let len = series.len();
    let idx = (len as f64 * TAIL) as usize;

    Some(PercentileBounds {
        low: series[idx],
        high: series[len - idx - 1],
    })
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
