//! Daily health log model.

use crate::models::user::UserSummary;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One calendar-day health snapshot for an athlete.
///
/// Stored in the `daily_logs` collection keyed by `id`. The
/// `(athlete_id, date)` pair is unique.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub id: String,
    /// Athlete profile ID
    pub athlete_id: String,
    /// UTC calendar day
    pub date: NaiveDate,
    /// 0..=10
    pub knee_pain: i32,
    /// 0..=10
    pub leg_freshness: i32,
    /// 0..=24
    pub sleep_hours: f64,
    /// 0..=10
    pub training_intensity: i32,
    /// 0..=100
    pub acl_injury_score: f64,
    /// 0..=10
    pub stiffness_level: i32,
    /// kcal, non-negative
    pub calorie_intake: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Athlete identity attached to a returned log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAthlete {
    /// Athlete profile ID
    pub id: String,
    pub user: UserSummary,
}

/// Daily log joined with the athlete it belongs to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogView {
    #[serde(flatten)]
    pub log: DailyLog,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub athlete: Option<LogAthlete>,
}

/// Sort most recent day first, newest entry first within a day.
pub fn sort_most_recent_first(logs: &mut [DailyLog]) {
    logs.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
