//! Trend-reversal signal generation over a stream of score observations.
//!
//! Each update flows one way: raw score → EMA → classification and curvature
//! windows → trend state and reversal confirmation → optional [`Signal`].

pub mod config;
pub mod error;
pub mod generator;
pub mod pulse;
pub mod rolling_window;
pub mod time;
pub mod types;

pub use config::{CurvaturePadding, StrategyConfig, TrendThresholds};
pub use error::ConfigError;
pub use generator::{SignalGenerator, Strategy};
pub use pulse::curvature::Extremum;
pub use types::{Signal, SignalType, Tick, TickData, TrendState};
