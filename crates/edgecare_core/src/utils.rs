//! Date and number helpers shared by the aggregations.
//!
//! Calendar days are always taken in UTC, matching how timestamps are stored.

use chrono::{DateTime, Duration, NaiveDate, Utc};

pub const WINDOW_DAYS: i64 = 7;

/// Start of the trailing weekly window ending at `now` (inclusive bound).
pub fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(WINDOW_DAYS)
}

pub fn in_window(ts: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    ts >= window_start(now)
}

/// The seven UTC dates ending with `now`'s date, oldest first.
pub fn window_dates(now: DateTime<Utc>) -> Vec<NaiveDate> {
    (0..WINDOW_DAYS)
        .rev()
        .map(|i| (now - Duration::days(i)).date_naive())
        .collect()
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Tally keys in arrival order; the first key seen sorts first on ties.
pub fn tally<'a, I>(keys: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }
    counts
}

/// Highest count; ties go to the key whose first occurrence came earliest.
pub fn most_frequent<'a>(counts: &[(&'a str, usize)]) -> Option<(&'a str, usize)> {
    counts
        .iter()
        .fold(None::<(&'a str, usize)>, |best, &(k, n)| match best {
            Some((_, top)) if top >= n => best,
            _ => Some((k, n)),
        })
}
