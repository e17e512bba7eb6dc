// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily log admission and queries.
//!
//! Handles the core rules:
//! 1. Every read and write is gated by the access policy, creation included
//! 2. At most one log per athlete per UTC calendar day, enforced by a
//!    unique key claimed before the log is written
//! 3. Listings without an explicit athlete are scoped by the caller's role

use std::collections::HashMap;

use chrono::NaiveDate;
use futures_util::{stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::{keys, Database};
use crate::error::{AppError, Result};
use crate::models::daily_log::{sort_most_recent_first, DailyLogView, LogAthlete};
use crate::models::user::UserSummary;
use crate::models::{DailyLog, User, WeeklySummary};
use crate::services::access::AccessPolicy;
use crate::time_utils::{parse_calendar_day, today_utc};

const MAX_CONCURRENT_DB_OPS: usize = 16;

/// Body of `POST /daily-logs`. Missing metrics default to 0.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewDailyLog {
    /// Athlete profile ID
    #[validate(length(min = 1, message = "Athlete ID is required"))]
    pub athlete_id: String,
    /// `YYYY-MM-DD` or RFC3339; defaults to today (UTC)
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, max = 10, message = "Knee pain must be between 0 and 10"))]
    pub knee_pain: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 10, message = "Leg freshness must be between 0 and 10"))]
    pub leg_freshness: i32,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 24.0, message = "Sleep hours must be between 0 and 24"))]
    pub sleep_hours: f64,
    #[serde(default)]
    #[validate(range(
        min = 0,
        max = 10,
        message = "Training intensity must be between 0 and 10"
    ))]
    pub training_intensity: i32,
    #[serde(default)]
    #[validate(range(
        min = 0.0,
        max = 100.0,
        message = "ACL injury score must be between 0 and 100"
    ))]
    pub acl_injury_score: f64,
    #[serde(default)]
    #[validate(range(min = 0, max = 10, message = "Stiffness level must be between 0 and 10"))]
    pub stiffness_level: i32,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Calorie intake cannot be negative"))]
    pub calorie_intake: f64,
}

/// Body of `PUT /daily-logs/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogPatch {
    pub date: Option<String>,
    #[validate(range(min = 0, max = 10, message = "Knee pain must be between 0 and 10"))]
    pub knee_pain: Option<i32>,
    #[validate(range(min = 0, max = 10, message = "Leg freshness must be between 0 and 10"))]
    pub leg_freshness: Option<i32>,
    #[validate(range(min = 0.0, max = 24.0, message = "Sleep hours must be between 0 and 24"))]
    pub sleep_hours: Option<f64>,
    #[validate(range(
        min = 0,
        max = 10,
        message = "Training intensity must be between 0 and 10"
    ))]
    pub training_intensity: Option<i32>,
    #[validate(range(
        min = 0.0,
        max = 100.0,
        message = "ACL injury score must be between 0 and 100"
    ))]
    pub acl_injury_score: Option<f64>,
    #[validate(range(min = 0, max = 10, message = "Stiffness level must be between 0 and 10"))]
    pub stiffness_level: Option<i32>,
    #[validate(range(min = 0.0, message = "Calorie intake cannot be negative"))]
    pub calorie_intake: Option<f64>,
}

/// Query of `GET /daily-logs`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogFilter {
    /// Athlete profile ID; omitted means "everyone I can see"
    pub athlete_id: Option<String>,
    /// Inclusive lower bound (`YYYY-MM-DD` or RFC3339)
    pub start_date: Option<String>,
    /// Inclusive upper bound (`YYYY-MM-DD` or RFC3339)
    pub end_date: Option<String>,
    /// 1-indexed page, only used together with `limit`
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 500, message = "Limit must be between 1 and 500"))]
    pub limit: Option<u32>,
}

/// One page of logs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogList {
    pub daily_logs: Vec<DailyLogView>,
    /// Matching logs before pagination
    pub total: usize,
}

fn parse_day(raw: &str, field: &str) -> Result<NaiveDate> {
    parse_calendar_day(raw).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Invalid '{}': expected YYYY-MM-DD or an RFC3339 timestamp",
            field
        ))
    })
}

fn conflict_for_day() -> AppError {
    AppError::Conflict("Daily log already exists for this date".to_string())
}

fn not_found() -> AppError {
    AppError::NotFound("Daily log not found".to_string())
}

/// Daily log operations.
#[derive(Clone)]
pub struct DailyLogService {
    db: Database,
    access: AccessPolicy,
}

impl DailyLogService {
    pub fn new(db: Database, access: AccessPolicy) -> Self {
        Self { db, access }
    }

    /// Admit a new log.
    ///
    /// Fails with `Conflict` if the athlete already has a log for that day,
    /// including when two requests race for the same day.
    pub async fn create(&self, caller: &User, input: NewDailyLog) -> Result<DailyLogView> {
        let date = match input.date.as_deref() {
            Some(raw) => parse_day(raw, "date")?,
            None => today_utc(),
        };

        let profile = self
            .db
            .get_profile(&input.athlete_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Athlete not found".to_string()))?;

        self.access
            .require_athlete_access(&caller.id, &profile.id, "create logs")
            .await?;

        let now = chrono::Utc::now();
        let log = DailyLog {
            id: uuid::Uuid::new_v4().to_string(),
            athlete_id: profile.id,
            date,
            knee_pain: input.knee_pain,
            leg_freshness: input.leg_freshness,
            sleep_hours: input.sleep_hours,
            training_intensity: input.training_intensity,
            acl_injury_score: input.acl_injury_score,
            stiffness_level: input.stiffness_level,
            calorie_intake: input.calorie_intake,
            created_at: now,
            updated_at: now,
        };

        let day_key = keys::daily_log(&log.athlete_id, log.date);
        if !self.db.claim_key(&day_key, &log.id).await? {
            tracing::info!(
                athlete_id = %log.athlete_id,
                date = %log.date,
                "Duplicate daily log rejected"
            );
            return Err(conflict_for_day());
        }

        if let Err(e) = self.db.upsert_daily_log(&log).await {
            self.db.release_key(&day_key).await?;
            return Err(e);
        }

        // Purges delete the profile before sweeping its logs, so either the
        // sweep sees this log or this check sees the profile gone.
        if self.db.get_profile(&log.athlete_id).await?.is_none() {
            tracing::info!(
                log_id = %log.id,
                athlete_id = %log.athlete_id,
                "Athlete deleted while log was being created"
            );
            self.delete_record(&log).await?;
            return Err(AppError::NotFound("Athlete not found".to_string()));
        }

        tracing::info!(
            log_id = %log.id,
            athlete_id = %log.athlete_id,
            date = %log.date,
            created_by = %caller.id,
            "Daily log created"
        );

        self.view(log).await
    }

    /// List logs visible to `caller`, most recent day first.
    pub async fn list(&self, caller: &User, filter: DailyLogFilter) -> Result<DailyLogList> {
        let start = filter
            .start_date
            .as_deref()
            .map(|raw| parse_day(raw, "startDate"))
            .transpose()?;
        let end = filter
            .end_date
            .as_deref()
            .map(|raw| parse_day(raw, "endDate"))
            .transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(AppError::BadRequest(
                    "startDate must not be after endDate".to_string(),
                ));
            }
        }

        let athlete_ids: Vec<String> = match filter.athlete_id {
            Some(athlete_id) => {
                self.access
                    .require_athlete_access(&caller.id, &athlete_id, "view logs")
                    .await?;
                vec![athlete_id]
            }
            None => self
                .access
                .visible_profiles(caller)
                .await?
                .into_iter()
                .map(|p| p.id)
                .collect(),
        };

        let per_athlete: Vec<Vec<DailyLog>> = stream::iter(athlete_ids)
            .map(|athlete_id| async move { self.db.daily_logs_for_athlete(&athlete_id).await })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .try_collect()
            .await?;

        let mut logs: Vec<DailyLog> = per_athlete
            .into_iter()
            .flatten()
            .filter(|log| start.map_or(true, |s| log.date >= s))
            .filter(|log| end.map_or(true, |e| log.date <= e))
            .collect();
        sort_most_recent_first(&mut logs);

        let total = logs.len();
        if let Some(limit) = filter.limit {
            let page = filter.page.unwrap_or(1).max(1);
            let skip = (page as usize - 1).saturating_mul(limit as usize);
            logs = logs.into_iter().skip(skip).take(limit as usize).collect();
        }

        let mut athletes: HashMap<String, Option<LogAthlete>> = HashMap::new();
        let mut daily_logs = Vec::with_capacity(logs.len());
        for log in logs {
            if !athletes.contains_key(&log.athlete_id) {
                let athlete = self.log_athlete(&log.athlete_id).await?;
                athletes.insert(log.athlete_id.clone(), athlete);
            }
            let athlete = athletes.get(&log.athlete_id).cloned().flatten();
            daily_logs.push(DailyLogView { log, athlete });
        }

        Ok(DailyLogList { daily_logs, total })
    }

    pub async fn get(&self, caller: &User, log_id: &str) -> Result<DailyLogView> {
        let log = self.db.get_daily_log(log_id).await?.ok_or_else(not_found)?;
        self.access
            .require_athlete_access(&caller.id, &log.athlete_id, "view this log")
            .await?;
        self.view(log).await
    }

    /// Apply a partial update. Moving a log to another day re-claims the
    /// day key, so it cannot collide with an existing log.
    pub async fn update(
        &self,
        caller: &User,
        log_id: &str,
        patch: DailyLogPatch,
    ) -> Result<DailyLogView> {
        let mut log = self.db.get_daily_log(log_id).await?.ok_or_else(not_found)?;
        self.access
            .require_athlete_access(&caller.id, &log.athlete_id, "update this log")
            .await?;

        let new_date = patch
            .date
            .as_deref()
            .map(|raw| parse_day(raw, "date"))
            .transpose()?
            .filter(|d| *d != log.date);

        if let Some(v) = patch.knee_pain {
            log.knee_pain = v;
        }
        if let Some(v) = patch.leg_freshness {
            log.leg_freshness = v;
        }
        if let Some(v) = patch.sleep_hours {
            log.sleep_hours = v;
        }
        if let Some(v) = patch.training_intensity {
            log.training_intensity = v;
        }
        if let Some(v) = patch.acl_injury_score {
            log.acl_injury_score = v;
        }
        if let Some(v) = patch.stiffness_level {
            log.stiffness_level = v;
        }
        if let Some(v) = patch.calorie_intake {
            log.calorie_intake = v;
        }
        log.updated_at = chrono::Utc::now();

        match new_date {
            None => self.db.upsert_daily_log(&log).await?,
            Some(new_date) => {
                let old_key = keys::daily_log(&log.athlete_id, log.date);
                let new_key = keys::daily_log(&log.athlete_id, new_date);
                if !self.db.claim_key(&new_key, &log.id).await? {
                    return Err(conflict_for_day());
                }
                log.date = new_date;
                if let Err(e) = self.db.upsert_daily_log(&log).await {
                    self.db.release_key(&new_key).await?;
                    return Err(e);
                }
                self.db.release_key(&old_key).await?;
            }
        }

        tracing::info!(log_id, updated_by = %caller.id, "Daily log updated");
        self.view(log).await
    }

    pub async fn delete(&self, caller: &User, log_id: &str) -> Result<()> {
        let log = self.db.get_daily_log(log_id).await?.ok_or_else(not_found)?;
        self.access
            .require_athlete_access(&caller.id, &log.athlete_id, "delete this log")
            .await?;

        self.delete_record(&log).await?;
        tracing::info!(log_id, deleted_by = %caller.id, "Daily log deleted");
        Ok(())
    }

    /// Averages over the athlete's seven most recent logs.
    pub async fn weekly_summary(&self, caller: &User, athlete_id: &str) -> Result<WeeklySummary> {
        self.access
            .require_athlete_access(&caller.id, athlete_id, "view logs")
            .await?;

        let mut logs = self.db.daily_logs_for_athlete(athlete_id).await?;
        sort_most_recent_first(&mut logs);
        Ok(WeeklySummary::from_recent_logs(&logs))
    }

    /// Delete every log of an athlete profile. Returns the count.
    ///
    /// Call after the profile itself is gone so that no create can slip
    /// a log in behind the sweep.
    pub async fn purge_athlete(&self, athlete_profile_id: &str) -> Result<usize> {
        let logs = self.db.daily_logs_for_athlete(athlete_profile_id).await?;
        for log in &logs {
            self.delete_record(log).await?;
        }
        Ok(logs.len())
    }

    async fn delete_record(&self, log: &DailyLog) -> Result<()> {
        self.db.delete_daily_log(&log.id).await?;
        self.db
            .release_key(&keys::daily_log(&log.athlete_id, log.date))
            .await
    }

    async fn log_athlete(&self, athlete_profile_id: &str) -> Result<Option<LogAthlete>> {
        let Some(profile) = self.db.get_profile(athlete_profile_id).await? else {
            return Ok(None);
        };
        Ok(self
            .db
            .get_user(&profile.user_id)
            .await?
            .map(|user| LogAthlete {
                id: profile.id,
                user: UserSummary::from(&user),
            }))
    }

    async fn view(&self, log: DailyLog) -> Result<DailyLogView> {
        let athlete = self.log_athlete(&log.athlete_id).await?;
        Ok(DailyLogView { log, athlete })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_log_defaults_missing_metrics_to_zero() {
        let input: NewDailyLog = serde_json::from_str(r#"{"athleteId": "p1"}"#).unwrap();
        assert_eq!(input.knee_pain, 0);
        assert_eq!(input.calorie_intake, 0.0);
        assert!(input.date.is_none());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_new_log_rejects_out_of_range_metrics() {
        let input: NewDailyLog = serde_json::from_str(
            r#"{"athleteId": "p1", "kneePain": 11, "sleepHours": 25, "calorieIntake": -1}"#,
        )
        .unwrap();
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("knee_pain"));
        assert!(fields.contains_key("sleep_hours"));
        assert!(fields.contains_key("calorie_intake"));
    }

    #[test]
    fn test_acl_score_accepts_percent_scale() {
        let input: NewDailyLog =
            serde_json::from_str(r#"{"athleteId": "p1", "aclInjuryScore": 85.5}"#).unwrap();
        assert!(input.validate().is_ok());

        let input: NewDailyLog =
            serde_json::from_str(r#"{"athleteId": "p1", "aclInjuryScore": 100.5}"#).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_patch_validates_only_present_fields() {
        let patch: DailyLogPatch = serde_json::from_str(r#"{"kneePain": 4}"#).unwrap();
        assert!(patch.validate().is_ok());

        let patch: DailyLogPatch = serde_json::from_str(r#"{"stiffnessLevel": 12}"#).unwrap();
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_parse_day_error_names_field() {
        let err = parse_day("not-a-date", "startDate").unwrap_err();
        assert!(err.to_string().contains("startDate"));
    }
}
