//! Weekly aggregation over an athlete's log.
//!
//! Every figure is recomputed from the full log on request; nothing is cached.
//! The window is the trailing seven days ending at the reference instant and
//! calendar days are UTC dates.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::LogEntry;
use crate::utils::{in_window, mean, most_frequent, round1, tally, window_dates};

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct WeeklySummary {
    pub has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_pain: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pain_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_affected_area: Option<String>,
}

/// Pain entries (sentinels excluded) with their severities, in log order.
pub(crate) fn pain_in_window(entries: &[LogEntry], now: DateTime<Utc>) -> Vec<(&LogEntry, u8)> {
    entries
        .iter()
        .filter(|e| in_window(e.timestamp, now))
        .filter_map(|e| e.pain_severity().map(|s| (e, s)))
        .collect()
}

pub(crate) fn distinct_days(pain: &[(&LogEntry, u8)]) -> u32 {
    pain.iter()
        .map(|(e, _)| e.timestamp.date_naive())
        .collect::<BTreeSet<NaiveDate>>()
        .len() as u32
}

pub(crate) fn average(pain: &[(&LogEntry, u8)]) -> Option<f64> {
    let severities: Vec<f64> = pain.iter().map(|(_, s)| f64::from(*s)).collect();
    mean(&severities).map(round1)
}

pub fn weekly_summary(entries: &[LogEntry], now: DateTime<Utc>) -> WeeklySummary {
    if !entries.iter().any(|e| in_window(e.timestamp, now)) {
        return WeeklySummary::default();
    }

    let pain = pain_in_window(entries, now);
    let counts = tally(pain.iter().map(|(e, _)| e.body_part.as_str()));

    WeeklySummary {
        has_data: true,
        average_pain: average(&pain),
        pain_days: Some(distinct_days(&pain)),
        most_affected_area: most_frequent(&counts).map(|(part, _)| part.to_string()),
    }
}

/// Day-by-day view used by the athlete's weekly overview page.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct WeeklyChart {
    pub has_data: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub daily_averages: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pain_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_affected: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub body_part_counts: BTreeMap<String, usize>,
}

/// Mean severity per UTC date over the window, `None` for pain-free dates.
pub(crate) fn daily_means(
    pain: &[(&LogEntry, u8)],
    now: DateTime<Utc>,
) -> Vec<(NaiveDate, Option<f64>)> {
    window_dates(now)
        .into_iter()
        .map(|day| {
            let day_values: Vec<f64> = pain
                .iter()
                .filter(|(e, _)| e.timestamp.date_naive() == day)
                .map(|(_, s)| f64::from(*s))
                .collect();
            (day, mean(&day_values).map(round1))
        })
        .collect()
}

pub fn weekly_chart(entries: &[LogEntry], now: DateTime<Utc>) -> WeeklyChart {
    let pain = pain_in_window(entries, now);
    if pain.is_empty() {
        return WeeklyChart::default();
    }

    let days = daily_means(&pain, now);
    let counts = tally(pain.iter().map(|(e, _)| e.body_part.as_str()));

    WeeklyChart {
        has_data: true,
        labels: days
            .iter()
            .map(|(d, _)| d.format("%a").to_string())
            .collect(),
        daily_averages: days.iter().map(|(_, avg)| avg.unwrap_or(0.0)).collect(),
        weekly_avg: average(&pain),
        pain_days: Some(distinct_days(&pain)),
        most_affected: most_frequent(&counts).map(|(part, _)| part.to_string()),
        body_part_counts: counts
            .iter()
            .map(|(part, n)| (part.to_string(), *n))
            .collect(),
    }
}
