use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A named numeric observation delivered with an update.
pub trait TickData {
    fn name(&self) -> &str;
    fn value(&self) -> f64;
}

/// Owned observation, as read from a feed or a replay file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub name: String,
    pub value: f64,
}

impl Tick {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl TickData for Tick {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> f64 {
        self.value
    }
}

impl TickData for (&str, f64) {
    fn name(&self) -> &str {
        self.0
    }

    fn value(&self) -> f64 {
        self.1
    }
}

impl TickData for (String, f64) {
    fn name(&self) -> &str {
        &self.0
    }

    fn value(&self) -> f64 {
        self.1
    }
}

/// Discrete classification of the recent directional bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendState {
    StrongUp,
    Up,
    #[default]
    Neutral,
    Down,
    StrongDown,
}

impl fmt::Display for TrendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendState::StrongUp => "strong_up",
            TrendState::Up => "up",
            TrendState::Neutral => "neutral",
            TrendState::Down => "down",
            TrendState::StrongDown => "strong_down",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    ShortEntry,
    ShortExit,
    LongEntry,
    LongExit,
    Flat,
    None,
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalType::ShortEntry => "short_entry",
            SignalType::ShortExit => "short_exit",
            SignalType::LongEntry => "long_entry",
            SignalType::LongExit => "long_exit",
            SignalType::Flat => "flat",
            SignalType::None => "none",
        };
        f.write_str(s)
    }
}

/// Trading signal handed to the caller. The generator keeps no history of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub signal_type: SignalType,

    /// Wall-clock creation time, milliseconds since the Unix epoch.
    pub ts: i64,

    pub strength: f64,
    pub reason: String,

    /// Diagnostic scalars (`score`, `ema_score`).
    pub meta: BTreeMap<String, f64>,

    /// UUID v4, hyphenated.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_serializes_with_snake_case_type() {
        let signal = Signal {
            signal_type: SignalType::ShortEntry,
            ts: 1_700_000_000_000,
            strength: 5.0,
            reason: "strong_up + curvature best point".into(),
            meta: BTreeMap::from([("score".to_string(), 0.3), ("ema_score".to_string(), 0.4)]),
            id: "id-1".into(),
        };

        let json = serde_json::to_value(&signal).unwrap();

        assert_eq!(json["signal_type"], "short_entry");
        assert_eq!(json["ts"], 1_700_000_000_000_i64);
        assert_eq!(json["meta"]["score"], 0.3);
        assert_eq!(json["id"], "id-1");
    }

    #[test]
    fn display_matches_wire_names() {
        assert_eq!(SignalType::LongExit.to_string(), "long_exit");
        assert_eq!(TrendState::StrongDown.to_string(), "strong_down");
        assert_eq!(
            serde_json::to_string(&TrendState::StrongUp).unwrap(),
            "\"strong_up\""
        );
    }

    #[test]
    fn tuple_ticks_expose_name_and_value() {
        let t = ("Score", 0.25);
        assert_eq!(t.name(), "Score");
        assert_eq!(t.value(), 0.25);

        let owned = Tick::new("score", -1.0);
        assert_eq!(TickData::name(&owned), "score");
    }
}
