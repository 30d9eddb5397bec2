//! Exponential smoothing of the raw score.
//!
//! ```text
//! ema_0 = raw_0
//! ema_t = alpha * raw_t + (1 - alpha) * ema_{t-1}
//! ```
//!
//! Non-finite inputs are not rejected; they propagate through the recurrence
//! under ordinary floating-point rules.

use super::{Pulse, PulseResult, PulseValidity};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothedScore {
    /// Score as received.
    pub raw: f64,
    /// Smoothed value after this update.
    pub value: f64,
}

impl PulseResult for SmoothedScore {
    fn validity(&self) -> PulseValidity {
        // Seeded by the first observation, so every output is usable.
        PulseValidity::Valid
    }
}

/// EMA state. Only the last smoothed value is kept.
#[derive(Clone, Debug)]
pub struct EmaPulse {
    alpha: f64,
    last: Option<f64>,
}

impl EmaPulse {
    pub fn new(alpha: f64) -> Self {
        Self { alpha, last: None }
    }

    pub fn update(&mut self, raw: f64) -> f64 {
        let next = match self.last {
            None => raw,
            Some(prev) => self.alpha * raw + (1.0 - self.alpha) * prev,
        };
        self.last = Some(next);
        next
    }

    /// Last smoothed value, `None` before the first update.
    pub fn value(&self) -> Option<f64> {
        self.last
    }
}

impl Pulse for EmaPulse {
    type Input = f64;
    type Output = SmoothedScore;

    fn evaluate(&mut self, raw: f64) -> SmoothedScore {
        let value = self.update(raw);
        SmoothedScore { raw, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_update_seeds_with_raw() {
        let mut ema = EmaPulse::new(0.2);
        assert_eq!(ema.value(), None);

        assert_eq!(ema.update(3.0), 3.0);
        assert_eq!(ema.value(), Some(3.0));
    }

    #[test]
    fn follows_recurrence() {
        let mut ema = EmaPulse::new(0.5);

        ema.update(1.0);
        assert_eq!(ema.update(3.0), 2.0);
        assert_eq!(ema.update(0.0), 1.0);
    }

    #[test]
    fn nan_propagates() {
        let mut ema = EmaPulse::new(0.3);
        ema.update(1.0);

        assert!(ema.update(f64::NAN).is_nan());
        assert!(ema.update(1.0).is_nan());
    }

    #[test]
    fn evaluate_reports_raw_and_smoothed() {
        let mut ema = EmaPulse::new(0.25);
        ema.evaluate(4.0);

        let out = ema.evaluate(0.0);
        assert_eq!(out.raw, 0.0);
        assert_eq!(out.value, 3.0);
        assert!(out.is_valid());
    }

    proptest! {
        #[test]
        fn alpha_one_is_identity(samples in prop::collection::vec(-1.0e9f64..1.0e9, 1..200)) {
            let mut ema = EmaPulse::new(1.0);
            for &s in &samples {
                prop_assert_eq!(ema.update(s), s);
            }
        }
    }
}
