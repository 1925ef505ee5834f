//! Coach-facing weekly report and rule-based load guidance.
//!
//! Only real pain entries inside the weekly window feed the report; the
//! "No Pain" sentinels are audit rows and carry no severity.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::LogEntry;
use crate::aggregate::{average, daily_means, distinct_days, pain_in_window};
use crate::utils::{most_frequent, tally};

const REPORT_RECENT_LIMIT: usize = 5;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoadGuidance {
    RecoveryFocus,
    ReducedLoad,
    ControlledLoad,
    FullLoad,
}

impl LoadGuidance {
    pub fn advice(self) -> &'static str {
        match self {
            LoadGuidance::RecoveryFocus => {
                "Current patterns indicate prioritizing recovery-focused sessions."
            }
            LoadGuidance::ReducedLoad => {
                "Recent entries suggest considering a reduced training load."
            }
            LoadGuidance::ControlledLoad => {
                "A controlled training load may be appropriate based on recent observations."
            }
            LoadGuidance::FullLoad => "Current observations support full training load.",
        }
    }
}

/// First matching rule wins, most conservative first.
pub fn load_guidance(average_severity: f64, pain_days: u32, max_area_count: usize) -> LoadGuidance {
    if average_severity >= 7.0 || pain_days >= 5 {
        return LoadGuidance::RecoveryFocus;
    }
    if average_severity >= 5.0 || max_area_count >= 3 {
        return LoadGuidance::ReducedLoad;
    }
    if average_severity >= 3.0 || (2..=3).contains(&pain_days) {
        return LoadGuidance::ControlledLoad;
    }
    if pain_days <= 1 {
        return LoadGuidance::FullLoad;
    }
    // e.g. mild severity spread over four days
    LoadGuidance::ControlledLoad
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CoachLogRow {
    pub date: String,
    pub body_part: String,
    pub severity: u8,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DayAverage {
    pub day: String,
    pub average: Option<f64>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CoachWeeklyReport {
    pub has_data: bool,
    pub player_id: String,
    #[serde(flatten)]
    pub details: Option<CoachReportDetails>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CoachReportDetails {
    pub total_logs: usize,
    pub average_severity: f64,
    pub pain_days: u32,
    pub most_logged_area: String,
    pub most_active_day: String,
    pub frequency_by_area: BTreeMap<String, usize>,
    /// Oldest day first; `None` when nothing was logged that day.
    pub daily_average: Vec<DayAverage>,
    pub summary_text: String,
    pub recent_logs: Vec<CoachLogRow>,
    pub load_guidance: String,
    pub guidance_level: LoadGuidance,
}

fn insight_lines(
    top_area: &str,
    top_count: usize,
    area_count: usize,
    daily: &[Option<f64>],
) -> Vec<String> {
    let mut lines = Vec::new();

    if top_count >= 3 {
        lines.push(format!(
            "Consistent entries noted for {top_area} over the past week."
        ));
    } else if top_count >= 2 {
        lines.push(format!("Multiple entries recorded for {top_area} this week."));
    }

    if area_count >= 4 {
        lines.push("Entries observed across multiple body areas this week.".to_string());
    } else if area_count >= 2 {
        lines.push(format!("Observations recorded across {area_count} body areas."));
    }

    let logged: Vec<f64> = daily.iter().flatten().copied().collect();
    if logged.len() >= 3 {
        let max = logged.iter().copied().fold(f64::MIN, f64::max);
        let min = logged.iter().copied().fold(f64::MAX, f64::min);
        if max - min <= 2.0 {
            lines.push(
                "Severity levels remained relatively consistent throughout the week.".to_string(),
            );
        }
    }

    if lines.is_empty() {
        lines.push("Observations recorded across the selected period.".to_string());
    }
    lines
}

pub fn coach_weekly_report(
    player_id: &str,
    entries: &[LogEntry],
    now: DateTime<Utc>,
) -> CoachWeeklyReport {
    let pain = pain_in_window(entries, now);
    let areas = tally(pain.iter().map(|(e, _)| e.body_part.as_str()));
    let (Some(average_severity), Some((top_area, top_count))) =
        (average(&pain), most_frequent(&areas))
    else {
        return CoachWeeklyReport {
            has_data: false,
            player_id: player_id.to_string(),
            details: None,
        };
    };

    let pain_days = distinct_days(&pain);

    let weekday_names: Vec<String> = pain
        .iter()
        .map(|(e, _)| e.timestamp.format("%A").to_string())
        .collect();
    let weekdays = tally(weekday_names.iter().map(String::as_str));
    let most_active_day = most_frequent(&weekdays)
        .map(|(day, _)| day.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let days = daily_means(&pain, now);
    let daily_average = days
        .iter()
        .map(|(d, avg)| DayAverage {
            day: d.format("%a").to_string(),
            average: *avg,
        })
        .collect();
    let daily_values: Vec<Option<f64>> = days.iter().map(|(_, avg)| *avg).collect();

    let mut newest: Vec<&(&LogEntry, u8)> = pain.iter().collect();
    newest.sort_by(|a, b| b.0.timestamp.cmp(&a.0.timestamp));
    let recent_logs = newest
        .into_iter()
        .take(REPORT_RECENT_LIMIT)
        .map(|(e, s)| CoachLogRow {
            date: e.timestamp.format("%d %b").to_string(),
            body_part: e.body_part.clone(),
            severity: *s,
        })
        .collect();

    let guidance = load_guidance(average_severity, pain_days, top_count);

    CoachWeeklyReport {
        has_data: true,
        player_id: player_id.to_string(),
        details: Some(CoachReportDetails {
            total_logs: pain.len(),
            average_severity,
            pain_days,
            most_logged_area: top_area.to_string(),
            most_active_day,
            frequency_by_area: areas.iter().map(|(k, n)| (k.to_string(), *n)).collect(),
            daily_average,
            summary_text: insight_lines(top_area, top_count, areas.len(), &daily_values).join(" "),
            recent_logs,
            load_guidance: guidance.advice().to_string(),
            guidance_level: guidance,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 8, 18, 0, 0).unwrap()
    }

    fn days_ago(d: i64) -> DateTime<Utc> {
        now() - Duration::days(d)
    }

    #[test]
    fn guidance_rules_in_priority_order() {
        assert_eq!(load_guidance(7.0, 1, 1), LoadGuidance::RecoveryFocus);
        assert_eq!(load_guidance(2.0, 5, 1), LoadGuidance::RecoveryFocus);
        assert_eq!(load_guidance(5.0, 1, 1), LoadGuidance::ReducedLoad);
        assert_eq!(load_guidance(2.0, 1, 3), LoadGuidance::ReducedLoad);
        assert_eq!(load_guidance(3.0, 1, 1), LoadGuidance::ControlledLoad);
        assert_eq!(load_guidance(2.0, 3, 1), LoadGuidance::ControlledLoad);
        assert_eq!(load_guidance(2.9, 1, 2), LoadGuidance::FullLoad);
        assert_eq!(load_guidance(2.0, 4, 1), LoadGuidance::ControlledLoad);
    }

    #[test]
    fn report_without_pain_has_no_details() {
        let entries = vec![LogEntry::no_pain(days_ago(0))];
        let r = coach_weekly_report("p1", &entries, now());
        assert!(!r.has_data);
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            serde_json::json!({"has_data": false, "player_id": "p1"})
        );
    }

    #[test]
    fn report_aggregates_window() {
        let entries = vec![
            LogEntry::pain("Left Knee", 4, days_ago(9)),
            LogEntry::pain("Left Knee", 4, days_ago(3)),
            LogEntry::pain("Chest", 5, days_ago(2)),
            LogEntry::no_pain(days_ago(2)),
            LogEntry::pain("Left Knee", 6, days_ago(1)),
            LogEntry::pain("Left Knee", 5, days_ago(0)),
        ];
        let r = coach_weekly_report("p1", &entries, now());
        let d = r.details.expect("details");
        assert_eq!(d.total_logs, 4);
        assert_eq!(d.average_severity, 5.0);
        assert_eq!(d.pain_days, 4);
        assert_eq!(d.most_logged_area, "Left Knee");
        assert_eq!(d.frequency_by_area.get("Left Knee"), Some(&3));
        assert_eq!(d.daily_average.len(), 7);
        assert_eq!(d.daily_average[0].day, "Mon");
        assert_eq!(d.daily_average[0].average, None);
        assert_eq!(d.daily_average[6].day, "Sun");
        assert_eq!(d.daily_average[6].average, Some(5.0));
        assert_eq!(d.recent_logs.len(), 4);
        assert_eq!(d.recent_logs[0].date, "08 Mar");
        assert_eq!(d.guidance_level, LoadGuidance::ReducedLoad);
        assert!(d.summary_text.contains("Consistent entries noted for Left Knee"));
        assert!(d.summary_text.contains("Observations recorded across 2 body areas."));
        assert!(d.summary_text.contains("relatively consistent"));
    }

    #[test]
    fn single_entry_gets_fallback_insight() {
        let entries = vec![LogEntry::pain("Chest", 2, days_ago(0))];
        let d = coach_weekly_report("p1", &entries, now()).details.unwrap();
        assert_eq!(
            d.summary_text,
            "Observations recorded across the selected period."
        );
        assert_eq!(d.guidance_level, LoadGuidance::FullLoad);
        assert_eq!(d.most_active_day, "Sunday");
    }
}
