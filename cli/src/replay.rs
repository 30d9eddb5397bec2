use std::io::{BufRead, Write};

use anyhow::Context;
use serde::Deserialize;
use serde::de::Error as _;
use serde_json::{Map, Value};
use tracing::warn;

use common::logger::child_span;
use strategy::{Strategy, Tick};

/// One input line: an ordered list of ticks, a single tick, or a name → value object.
///
/// Object keys keep their document order (`serde_json/preserve_order`), so the
/// first `score` key wins here exactly as in a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TickLine {
    List(Vec<Tick>),
    Single(Tick),
    Named(Map<String, Value>),
}

impl TryFrom<TickLine> for Vec<Tick> {
    type Error = serde_json::Error;

    fn try_from(line: TickLine) -> Result<Self, Self::Error> {
        match line {
            TickLine::List(ticks) => Ok(ticks),
            TickLine::Single(tick) => Ok(vec![tick]),
            TickLine::Named(map) => map
                .into_iter()
                .map(|(name, value)| match value.as_f64() {
                    Some(v) => Ok(Tick::new(name, v)),
                    None => Err(serde_json::Error::custom(format!(
                        "observation `{name}` is not a number"
                    ))),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub updates: usize,
    pub signals: usize,
    pub skipped: usize,
}

/// Decode a line. Blank lines yield `None`.
pub(crate) fn parse_line(line: &str) -> Result<Option<Vec<Tick>>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let parsed: TickLine = serde_json::from_str(line)?;
    Ok(Some(parsed.try_into()?))
}

/// Drive `strategy` with every line of `reader`, writing signals to `out`.
///
/// Undecodable lines are logged and skipped; I/O failures abort the replay.
pub(crate) fn replay<S, R, W>(
    reader: R,
    strategy: &mut S,
    out: &mut W,
) -> anyhow::Result<ReplaySummary>
where
    S: Strategy,
    R: BufRead,
    W: Write,
{
    let span = child_span("replay_lines");
    let _guard = span.enter();

    let mut summary = ReplaySummary::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("reading line {line_no}"))?;

        let ticks = match parse_line(&line) {
            Ok(Some(ticks)) => ticks,
            Ok(None) => continue,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping undecodable line");
                summary.skipped += 1;
                continue;
            }
        };

        summary.updates += 1;

        if let Some(signal) = strategy.on_data_update(ticks.as_slice()) {
            serde_json::to_writer(&mut *out, &signal).context("encoding signal")?;
            out.write_all(b"\n").context("writing signal")?;
            summary.signals += 1;
        }
    }

    out.flush().context("flushing output")?;
    Ok(summary)
}
