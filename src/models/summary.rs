// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rolling weekly averages over an athlete's most recent daily logs.

use serde::{Deserialize, Serialize};

use crate::models::DailyLog;

/// Number of most recent logs the summary covers.
pub const SUMMARY_WINDOW: usize = 7;

/// Stiffness above this level counts as a stiff day.
const STIFF_DAY_THRESHOLD: i32 = 5;

/// Averages over the last [`SUMMARY_WINDOW`] logs.
///
/// Averages are rounded to one decimal (calories to whole kcal).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub avg_pain: f64,
    pub avg_freshness: f64,
    pub avg_sleep: f64,
    pub avg_intensity: f64,
    pub avg_risk: f64,
    pub stiff_days: u32,
    pub avg_calories: f64,
    /// Number of logs the averages were computed from
    pub log_count: u32,
}

impl WeeklySummary {
    /// Build a summary from logs ordered most recent first.
    ///
    /// Only the first [`SUMMARY_WINDOW`] entries are used. An empty slice
    /// yields all zeros.
    pub fn from_recent_logs(logs: &[DailyLog]) -> Self {
        let recent = &logs[..logs.len().min(SUMMARY_WINDOW)];
        if recent.is_empty() {
            return Self::default();
        }

        let n = recent.len() as f64;
        let avg = |f: fn(&DailyLog) -> f64| recent.iter().map(f).sum::<f64>() / n;

        Self {
            avg_pain: round_to(avg(|l| l.knee_pain as f64), 1),
            avg_freshness: round_to(avg(|l| l.leg_freshness as f64), 1),
            avg_sleep: round_to(avg(|l| l.sleep_hours), 1),
            avg_intensity: round_to(avg(|l| l.training_intensity as f64), 1),
            avg_risk: round_to(avg(|l| l.acl_injury_score), 1),
            stiff_days: recent
                .iter()
                .filter(|l| l.stiffness_level > STIFF_DAY_THRESHOLD)
                .count() as u32,
            avg_calories: round_to(avg(|l| l.calorie_intake), 0),
            log_count: recent.len() as u32,
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};

    fn log(day: i64, pain: i32, stiffness: i32, calories: f64) -> DailyLog {
        let base = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        DailyLog {
            id: format!("log-{}", day),
            athlete_id: "athlete".to_string(),
            date: base - Duration::days(day),
            knee_pain: pain,
            leg_freshness: 6,
            sleep_hours: 7.5,
            training_intensity: 4,
            acl_injury_score: 12.0,
            stiffness_level: stiffness,
            calorie_intake: calories,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_history_is_all_zero() {
        assert_eq!(WeeklySummary::from_recent_logs(&[]), WeeklySummary::default());
    }

    #[test]
    fn test_averages_and_stiff_days() {
        let logs = vec![log(0, 2, 7, 2500.0), log(1, 3, 5, 2200.0), log(2, 5, 9, 2401.0)];
        let summary = WeeklySummary::from_recent_logs(&logs);

        assert_eq!(summary.avg_pain, 3.3);
        assert_eq!(summary.avg_freshness, 6.0);
        assert_eq!(summary.avg_sleep, 7.5);
        assert_eq!(summary.avg_risk, 12.0);
        // 5 is not above the threshold
        assert_eq!(summary.stiff_days, 2);
        assert_eq!(summary.avg_calories, 2367.0);
        assert_eq!(summary.log_count, 3);
    }

    #[test]
    fn test_only_most_recent_seven_are_used() {
        let mut logs: Vec<DailyLog> = (0..7).map(|d| log(d, 1, 0, 2000.0)).collect();
        // Older entries that would skew the average
        logs.extend((7..14).map(|d| log(d, 10, 10, 5000.0)));

        let summary = WeeklySummary::from_recent_logs(&logs);
        assert_eq!(summary.avg_pain, 1.0);
        assert_eq!(summary.stiff_days, 0);
        assert_eq!(summary.avg_calories, 2000.0);
        assert_eq!(summary.log_count, 7);
    }
}
