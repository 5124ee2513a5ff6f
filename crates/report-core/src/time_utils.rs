//! Epoch conversion and calendar bucketing for job timestamps.
//!
//! Slurm accounting exports store times as Unix seconds. All conversions here
//! are lenient: anything that is not a finite, representable instant maps to
//! `None`.

use chrono::{DateTime, NaiveDate, Utc};

/// Largest magnitude, in seconds, of an instant stored as signed 64-bit
/// nanoseconds since the epoch (1677-09-21 to 2262-04-11).
pub const MAX_EPOCH_SECONDS: f64 = 9_223_372_036.854_776;

/// Convert (possibly fractional) Unix seconds into a UTC timestamp.
///
/// Returns `None` for NaN, infinities and values beyond
/// [`MAX_EPOCH_SECONDS`] in either direction, so a millisecond value in a
/// seconds column reads as missing rather than a date thousands of years out.
pub fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() || secs.abs() > MAX_EPOCH_SECONDS {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
    // Rounding can carry a full second.
    let (whole, nanos) = if nanos >= 1_000_000_000 {
        (whole as i64 + 1, 0)
    } else {
        (whole as i64, nanos)
    };
    DateTime::from_timestamp(whole, nanos)
}

/// Signed difference `end - start` in fractional minutes.
///
/// `None` when either side is missing.
pub fn minutes_between(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Option<f64> {
    let delta = end? - start?;
    let minutes = match delta.num_microseconds() {
        Some(us) => us as f64 / 60_000_000.0,
        None => delta.num_seconds() as f64 / 60.0,
    };
    Some(minutes)
}

/// Calendar-month key, e.g. `"2024-03"`.
pub fn month_key(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m").to_string()
}

/// Human label for a month key: `"2024-03"` → `"Mar 2024"`.
///
/// Unrecognised keys are returned unchanged.
pub fn month_label(key: &str) -> String {
    NaiveDate::parse_from_str(&format!("{key}-01"), "%Y-%m-%d")
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|_| key.to_string())
}

/// Every calendar day from `first` to `last` inclusive.
///
/// Empty when `last < first`.
pub fn day_range(first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    first.iter_days().take_while(move |d| *d <= last)
}
