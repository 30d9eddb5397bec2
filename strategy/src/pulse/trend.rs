use super::{Pulse, PulseResult, PulseValidity};
use crate::config::TrendThresholds;
use crate::rolling_window::RollingWindow;
use crate::types::TrendState;

/// Trend Pulse
///
/// Classifies the directional bias of the smoothed score over the
/// classification window.
///
/// ## Statistics
///
/// ```text
/// avg       = sum(window) / n
/// pos_ratio = count(v > 0) / n
/// neg_ratio = count(v < 0) / n
/// ```
///
/// Samples equal to zero count toward neither ratio.
///
/// ## Decision
/// Rules are checked in order and the first match wins:
/// 1. strong up:   `avg > strong_up_avg   && pos_ratio >= pos_ratio_strong`
/// 2. up:          `avg > up_avg          && pos_ratio >= pos_ratio_up`
/// 3. strong down: `avg < strong_down_avg && neg_ratio >= neg_ratio_strong`
/// 4. down:        `avg < down_avg        && neg_ratio >= neg_ratio_down`
/// 5. neutral otherwise
///
/// ## Warm-up guard
/// Fewer than `min_window_samples` samples always yields `Neutral` with
/// `Invalid` validity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrendReading {
    pub state: TrendState,
    pub avg: f64,
    pub pos_ratio: f64,
    pub neg_ratio: f64,
    pub samples: usize,
    pub validity: PulseValidity,
}

impl Default for TrendReading {
    fn default() -> Self {
        Self {
            state: TrendState::Neutral,
            avg: 0.0,
            pos_ratio: 0.0,
            neg_ratio: 0.0,
            samples: 0,
            validity: PulseValidity::Invalid,
        }
    }
}

impl PulseResult for TrendReading {
    fn validity(&self) -> PulseValidity {
        self.validity
    }
}

/// Trend pulse state.
///
/// Owns the classification window; the window is recomputed from scratch on every update.
#[derive(Clone, Debug)]
pub struct TrendPulse {
    window: RollingWindow,
    thresholds: TrendThresholds,
}

impl TrendPulse {
    pub fn new(window_size: usize, thresholds: TrendThresholds) -> Self {
        Self {
            window: RollingWindow::new(window_size),
            thresholds,
        }
    }

    pub fn push(&mut self, smoothed: f64) {
        self.window.push(smoothed);
    }

    pub fn classify(&self) -> TrendReading {
        classify(&self.window, &self.thresholds)
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }
}

impl Pulse for TrendPulse {
    type Input = f64;
    type Output = TrendReading;

    fn evaluate(&mut self, smoothed: f64) -> TrendReading {
        self.push(smoothed);
        self.classify()
    }
}

/// Classify a window. Pure in its inputs.
pub fn classify(window: &RollingWindow, thresholds: &TrendThresholds) -> TrendReading {
    let n = window.len();
    if n == 0 || n < thresholds.min_window_samples {
        return TrendReading {
            samples: n,
            ..TrendReading::default()
        };
    }

    let mut sum = 0.0;
    let (mut pos, mut neg) = (0usize, 0usize);
    for v in window.iter() {
        sum += v;
        if v > 0.0 {
            pos += 1;
        } else if v < 0.0 {
            neg += 1;
        }
    }

    let avg = sum / n as f64;
    let pos_ratio = pos as f64 / n as f64;
    let neg_ratio = neg as f64 / n as f64;

    let t = thresholds;
    let state = if avg > t.strong_up_avg && pos_ratio >= t.pos_ratio_strong {
        TrendState::StrongUp
    } else if avg > t.up_avg && pos_ratio >= t.pos_ratio_up {
        TrendState::Up
    } else if avg < t.strong_down_avg && neg_ratio >= t.neg_ratio_strong {
        TrendState::StrongDown
    } else if avg < t.down_avg && neg_ratio >= t.neg_ratio_down {
        TrendState::Down
    } else {
        TrendState::Neutral
    };

    TrendReading {
        state,
        avg,
        pos_ratio,
        neg_ratio,
        samples: n,
        validity: PulseValidity::Valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn window_of(values: &[f64]) -> RollingWindow {
        let mut w = RollingWindow::new(values.len().max(1));
        for &v in values {
            w.push(v);
        }
        w
    }

    /// `n_a` copies of `a` followed by `n_b` copies of `b`.
    fn mixed(a: f64, n_a: usize, b: f64, n_b: usize) -> RollingWindow {
        let mut values = vec![a; n_a];
        values.extend(std::iter::repeat_n(b, n_b));
        window_of(&values)
    }

    fn state(window: &RollingWindow) -> TrendState {
        classify(window, &TrendThresholds::default()).state
    }

    #[test]
    fn empty_window_is_neutral_and_invalid() {
        let r = classify(&RollingWindow::new(10), &TrendThresholds::default());

        assert_eq!(r.state, TrendState::Neutral);
        assert_eq!(r.validity, PulseValidity::Invalid);
        assert_eq!(r.samples, 0);
    }

    #[test]
    fn below_sample_floor_is_neutral_even_when_strongly_positive() {
        let w = window_of(&[1.0; 99]);
        let r = classify(&w, &TrendThresholds::default());

        assert_eq!(r.state, TrendState::Neutral);
        assert_eq!(r.validity, PulseValidity::Invalid);
        assert_eq!(r.samples, 99);
    }

    #[test]
    fn strong_up_exactly_at_ratio_cutoff() {
        // avg = (70 - 15) / 100 = 0.55, pos_ratio = 0.7
        let w = mixed(1.0, 70, -0.5, 30);
        let r = classify(&w, &TrendThresholds::default());

        assert_eq!(r.state, TrendState::StrongUp);
        assert_eq!(r.pos_ratio, 0.7);
        assert_eq!(r.validity, PulseValidity::Valid);
    }

    #[test]
    fn one_below_strong_ratio_falls_through_to_up() {
        // avg = 0.535, pos_ratio = 0.69
        let w = mixed(1.0, 69, -0.5, 31);
        assert_eq!(state(&w), TrendState::Up);
    }

    #[test]
    fn high_average_with_weak_ratio_is_neutral() {
        // avg = 0.5 but only half the samples are positive
        let w = mixed(1.0, 50, 0.0, 50);
        let r = classify(&w, &TrendThresholds::default());

        assert_eq!(r.state, TrendState::Neutral);
        assert_eq!(r.pos_ratio, 0.5);
        assert_eq!(r.neg_ratio, 0.0);
    }

    #[test]
    fn up_requires_average_above_up_threshold() {
        // pos_ratio = 1.0 but avg = 0.1
        let w = window_of(&[0.1; 100]);
        assert_eq!(state(&w), TrendState::Neutral);

        let w = window_of(&[0.2; 100]);
        assert_eq!(state(&w), TrendState::Up);
    }

    #[test]
    fn average_equal_to_threshold_does_not_pass() {
        let thresholds = TrendThresholds {
            strong_up_avg: 0.5,
            ..TrendThresholds::default()
        };
        let w = window_of(&[0.5; 100]);
        // avg == strong_up_avg is not strictly greater
        assert_eq!(classify(&w, &thresholds).state, TrendState::Up);
    }

    #[test]
    fn strong_down_and_down_mirror_the_up_side() {
        let w = mixed(-1.0, 70, 0.5, 30);
        assert_eq!(state(&w), TrendState::StrongDown);

        let w = mixed(-1.0, 69, 0.5, 31);
        assert_eq!(state(&w), TrendState::Down);

        let w = mixed(-0.5, 60, 0.25, 40);
        // avg = -0.2, neg_ratio = 0.6
        assert_eq!(state(&w), TrendState::Down);
    }

    #[test]
    fn pulse_uses_only_the_most_recent_window() {
        let mut pulse = TrendPulse::new(100, TrendThresholds::default());

        for _ in 0..100 {
            pulse.evaluate(-1.0);
        }
        assert_eq!(pulse.classify().state, TrendState::StrongDown);

        let mut last = TrendReading::default();
        for _ in 0..100 {
            last = pulse.evaluate(1.0);
        }
        assert_eq!(last.state, TrendState::StrongUp);
        assert_eq!(last.samples, 100);
        assert_eq!(pulse.window().len(), 100);
    }

    #[test]
    fn custom_floor_is_respected() {
        let thresholds = TrendThresholds {
            min_window_samples: 5,
            ..TrendThresholds::default()
        };
        let mut pulse = TrendPulse::new(10, thresholds);

        for _ in 0..4 {
            assert_eq!(pulse.evaluate(1.0).state, TrendState::Neutral);
        }
        assert_eq!(pulse.evaluate(1.0).state, TrendState::StrongUp);
    }

    proptest! {
        #[test]
        fn short_windows_are_always_neutral(values in prop::collection::vec(-5.0f64..5.0, 0..100)) {
            let w = window_of(&values);
            let r = classify(&w, &TrendThresholds::default());
            prop_assert_eq!(r.state, TrendState::Neutral);
            prop_assert_eq!(r.validity, PulseValidity::Invalid);
        }

        #[test]
        fn ratios_stay_in_unit_interval(values in prop::collection::vec(-5.0f64..5.0, 100..200)) {
            let r = classify(&window_of(&values), &TrendThresholds::default());
            prop_assert!((0.0..=1.0).contains(&r.pos_ratio));
            prop_assert!((0.0..=1.0).contains(&r.neg_ratio));
            prop_assert!(r.pos_ratio + r.neg_ratio <= 1.0 + 1e-12);
        }
    }
}
