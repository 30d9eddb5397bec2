use std::collections::BTreeMap;

use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::config::StrategyConfig;
use crate::error::ConfigError;
use crate::pulse::curvature::{CurvatureFilter, Extremum};
use crate::pulse::ema::EmaPulse;
use crate::pulse::trend::TrendPulse;
use crate::pulse::Pulse;
use crate::time::now_ms;
use crate::types::{Signal, SignalType, TickData, TrendState};

/// Fixed strength attached to every signal from this detector.
pub const SIGNAL_STRENGTH: f64 = 5.0;

const SCORE: &str = "score";

const REASON_TOP: &str = "strong_up + curvature best point";
const REASON_BOTTOM: &str = "strong_down + curvature best point";

/// Something a strategy runner can drive with per-update observations.
pub trait Strategy {
    fn on_data_update<T: TickData>(&mut self, ticks: &[T]) -> Option<Signal>;
}

/// Turns a score stream into entry signals.
///
/// Owns the EMA state and both rolling windows; build one per tracked
/// subject. Not internally synchronized: every update takes `&mut self`.
#[derive(Clone, Debug)]
pub struct SignalGenerator {
    config: StrategyConfig,
    ema: EmaPulse,
    trend: TrendPulse,
    curvature: CurvatureFilter,
    last_state: TrendState,
}

impl SignalGenerator {
    pub fn new(config: StrategyConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            ema: EmaPulse::new(config.ema_alpha),
            trend: TrendPulse::new(config.window_size, config.trend),
            curvature: CurvatureFilter::from_config(&config.curvature),
            last_state: TrendState::Neutral,
            config,
        })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Trend state computed by the most recent scored update.
    pub fn last_state(&self) -> TrendState {
        self.last_state
    }

    /// Smoothed score after the most recent scored update.
    pub fn ema_score(&self) -> Option<f64> {
        self.ema.value()
    }

    /// Process one update. Returns `None` whenever no entry qualifies,
    /// including when the update carries no `score` observation.
    pub fn on_update<T: TickData>(&mut self, ticks: &[T]) -> Option<Signal> {
        let Some(score) = find_score(ticks) else {
            trace!(observations = ticks.len(), "update without score");
            return None;
        };

        let smoothed = self.ema.evaluate(score);
        let ema_score = smoothed.value;

        self.trend.push(ema_score);
        self.curvature.append(ema_score);

        let reading = self.trend.classify();
        trace!(
            score,
            ema_score,
            samples = reading.samples,
            curvature_samples = self.curvature.window().len(),
            avg = reading.avg,
            "score processed"
        );
        self.observe_state(reading.state);

        let (extremum, signal_type, reason) = match reading.state {
            TrendState::Neutral | TrendState::Up | TrendState::Down => return None,
            TrendState::StrongUp => (Extremum::Top, SignalType::ShortEntry, REASON_TOP),
            TrendState::StrongDown => (Extremum::Bottom, SignalType::LongEntry, REASON_BOTTOM),
        };

        if !self.curvature.is_best_point(extremum) {
            return None;
        }

        let signal = build_signal(signal_type, reason, score, ema_score);
        info!(
            signal_type = %signal.signal_type,
            id = %signal.id,
            score,
            ema_score,
            "signal emitted"
        );
        Some(signal)
    }

    fn observe_state(&mut self, state: TrendState) {
        if state != self.last_state {
            debug!(from = %self.last_state, to = %state, "trend state changed");
            self.last_state = state;
        }
    }
}

impl Strategy for SignalGenerator {
    fn on_data_update<T: TickData>(&mut self, ticks: &[T]) -> Option<Signal> {
        self.on_update(ticks)
    }
}

/// First observation named `score`, compared without regard to ASCII case.
fn find_score<T: TickData>(ticks: &[T]) -> Option<f64> {
    ticks
        .iter()
        .find(|t| t.name().eq_ignore_ascii_case(SCORE))
        .map(|t| t.value())
}

fn build_signal(signal_type: SignalType, reason: &str, score: f64, ema_score: f64) -> Signal {
    Signal {
        signal_type,
        ts: now_ms(),
        strength: SIGNAL_STRENGTH,
        reason: reason.to_string(),
        meta: BTreeMap::from([
            ("score".to_string(), score),
            ("ema_score".to_string(), ema_score),
        ]),
        id: Uuid::new_v4().to_string(),
    }
}
