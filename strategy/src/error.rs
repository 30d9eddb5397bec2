use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("ema alpha must be in (0, 1], got {0}")]
    InvalidAlpha(f64),

    #[error("classification window size must be positive")]
    EmptyWindow,

    #[error("curvature window must hold at least {min} samples, got {got}")]
    CurvatureWindowTooSmall { min: usize, got: usize },

    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: &'static str, value: String },
}
