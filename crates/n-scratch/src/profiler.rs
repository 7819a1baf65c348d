//! Profiler: a stopwatch with named laps.
//!
//! ```text
//! profiler.start();
//! parse();   profiler.lap("parse");
//! execute(); profiler.lap("execute");
//! profiler.stop();
//! print!("{}", profiler.report(Some("u")));
//! ```
//!
//! The report lists the total, then each lap's share of it:
//!
//! ```text
//! Total Time: 1.250ms
//! 0.250ms       20.00%    parse
//! 1.000ms       80.00%    execute
//! ```
//!
//! Times are shown in milliseconds with microsecond granularity.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use unicode_width::UnicodeWidthStr;

/// Default width of the per-lap time column.
pub const DEFAULT_PADDING: usize = 14;

/// Widest time column a profiler will pad to.
pub const MAX_PADDING: usize = 256;

/// Measures elapsed time between `start` and `stop`, with intermediate laps.
#[derive(Debug, Clone)]
pub struct Profiler {
    padding: usize,
    start: Option<Instant>,
    end: Option<Instant>,
    laps: Vec<(String, Instant)>,
}

impl Profiler {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            start: None,
            end: None,
            laps: Vec::new(),
        }
    }

    /// Reset, then start measuring.
    pub fn start(&mut self) {
        self.reset();
        self.start = Some(Instant::now());
    }

    /// Forget the start, end, and every lap. Padding is kept.
    pub fn reset(&mut self) {
        self.start = None;
        self.end = None;
        self.laps.clear();
    }

    /// Stop measuring.
    pub fn stop(&mut self) {
        self.end = Some(Instant::now());
    }

    /// Record an intermediate point named `name`.
    pub fn lap(&mut self, name: impl Into<String>) {
        self.laps.push((name.into(), Instant::now()));
    }

    /// Width of the time column in lap lines, capped at [`MAX_PADDING`].
    pub const fn set_padding(&mut self, padding: usize) {
        self.padding = if padding > MAX_PADDING {
            MAX_PADDING
        } else {
            padding
        };
    }

    /// Time from `start` to `stop`. Zero if either is missing.
    #[must_use]
    pub fn total(&self) -> Duration {
        match (self.start, self.end) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    /// Lap names with the time since the previous lap (or start).
    #[must_use]
    pub fn laps(&self) -> Vec<(&str, Duration)> {
        let Some(start) = self.start else {
            return Vec::new();
        };
        let mut previous = start;
        self.laps
            .iter()
            .map(|(name, at)| {
                let delta = at.saturating_duration_since(previous);
                previous = *at;
                (name.as_str(), delta)
            })
            .collect()
    }

    /// Human-readable summary, optionally under a header line.
    #[must_use]
    pub fn report(&self, header: Option<&str>) -> String {
        format_report(header, self.total(), &self.laps(), self.padding)
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

fn format_report(
    header: Option<&str>,
    total: Duration,
    laps: &[(&str, Duration)],
    padding: usize,
) -> String {
    let mut out = String::new();
    if let Some(header) = header {
        out.push_str(header);
        out.push('\n');
    }
    let _ = writeln!(out, "Total Time: {}", format_millis(total));

    for (name, delta) in laps {
        let share = if total.is_zero() {
            0.0
        } else {
            delta.as_secs_f64() / total.as_secs_f64() * 100.0
        };
        let _ = writeln!(
            out,
            "{}{share:.2}%    {name}",
            pad_right(&format_millis(*delta), padding)
        );
    }
    out
}

/// `1234567 µs` → `"1,234.567ms"`.
fn format_millis(duration: Duration) -> String {
    let micros = duration.as_micros();
    let whole = (micros / 1000).to_string();
    let frac = micros % 1000;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped}.{frac:03}ms")
}

/// Pad `text` with spaces to `width` display columns.
fn pad_right(text: &str, width: usize) -> String {
    let used = text.width();
    let mut padded = String::with_capacity(text.len() + width.saturating_sub(used));
    padded.push_str(text);
    padded.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    padded
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
