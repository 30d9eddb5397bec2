//! Per-update observers over the score stream.
//!
//! A pulse owns its own state (an EMA scalar, a rolling window) and is fed
//! synchronously, one update at a time. Nothing here performs I/O.

pub mod curvature;
pub mod ema;
pub mod trend;

/// Whether a pulse result carries enough history to act on.
///
/// Invalid results must never produce a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PulseValidity {
    /// Warming up (not enough history).
    #[default]
    Invalid,

    Valid,
}

/// Trait implemented by all pulse result types.
pub trait PulseResult {
    fn validity(&self) -> PulseValidity;

    fn is_valid(&self) -> bool {
        self.validity() == PulseValidity::Valid
    }
}

/// Core Pulse trait.
///
/// A pulse:
/// - owns internal state
/// - consumes exactly one input per update
/// - produces a result
pub trait Pulse {
    /// Input type consumed per update
    type Input;

    /// Output type produced per update
    type Output: PulseResult;

    fn evaluate(&mut self, input: Self::Input) -> Self::Output;
}
