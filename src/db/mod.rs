//! Database layer (Firestore, or in-process tables for tests and local runs).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::config::{Config, StorageBackend};
use crate::error::AppError;
use crate::models::{AthleteProfile, CoachAthleteRelationship, DailyLog, SportsCategory, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const ATHLETE_PROFILES: &str = "athlete_profiles";
    pub const SPORTS: &str = "sports";
    pub const COACH_ATHLETE: &str = "coach_athlete_relationships";
    pub const DAILY_LOGS: &str = "daily_logs";
    /// Create-if-absent claims backing every uniqueness invariant
    pub const UNIQUE_KEYS: &str = "unique_keys";
}

/// Builders for unique key names.
///
/// Every uniqueness rule goes through [`Database::claim_key`], so the
/// storage layer rejects the second writer atomically.
pub mod keys {
    use chrono::NaiveDate;

    pub fn email(normalized_email: &str) -> String {
        format!("email:{}", normalized_email)
    }

    pub fn coach_athlete(coach_id: &str, athlete_id: &str) -> String {
        format!("coach-athlete:{}:{}", coach_id, athlete_id)
    }

    pub fn daily_log(athlete_profile_id: &str, date: NaiveDate) -> String {
        format!("daily-log:{}:{}", athlete_profile_id, date.format("%Y-%m-%d"))
    }

    pub fn sport(name: &str) -> String {
        format!("sport:{}", name.trim().to_lowercase())
    }
}

/// A claimed unique key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueKey {
    /// ID of the record holding the key
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

/// Storage handle shared by all services.
#[derive(Clone)]
pub enum Database {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

macro_rules! dispatch {
    ($self:ident, $db:ident => $call:expr) => {
        match $self {
            Database::Firestore($db) => $call,
            Database::Memory($db) => $call,
        }
    };
}

impl Database {
    /// Connect to the backend selected in the configuration.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        match config.storage {
            StorageBackend::Memory => {
                tracing::warn!("Using in-process storage; data will not survive a restart");
                Ok(Database::Memory(MemoryDb::new()))
            }
            StorageBackend::Firestore => {
                let project_id = config.gcp_project_id.as_deref().ok_or_else(|| {
                    AppError::Database("GCP project ID not configured".to_string())
                })?;
                Ok(Database::Firestore(FirestoreDb::new(project_id).await?))
            }
        }
    }

    /// Fresh, empty in-process database.
    pub fn in_memory() -> Self {
        Database::Memory(MemoryDb::new())
    }

    // ─── Unique Keys ─────────────────────────────────────────────

    /// Atomically claim `key` for `owner_id`.
    ///
    /// Returns `false` if the key is already held.
    pub async fn claim_key(&self, key: &str, owner_id: &str) -> Result<bool, AppError> {
        dispatch!(self, db => db.claim_key(key, owner_id).await)
    }

    /// Release a previously claimed key. Releasing a free key is a no-op.
    pub async fn release_key(&self, key: &str) -> Result<(), AppError> {
        dispatch!(self, db => db.release_key(key).await)
    }

    // ─── Users ───────────────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        dispatch!(self, db => db.get_user(user_id).await)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        dispatch!(self, db => db.find_user_by_email(email).await)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        dispatch!(self, db => db.list_users().await)
    }

    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        dispatch!(self, db => db.upsert_user(user).await)
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        dispatch!(self, db => db.delete_user(user_id).await)
    }

    // ─── Athlete Profiles ────────────────────────────────────────

    pub async fn get_profile(&self, profile_id: &str) -> Result<Option<AthleteProfile>, AppError> {
        dispatch!(self, db => db.get_profile(profile_id).await)
    }

    pub async fn get_profile_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<AthleteProfile>, AppError> {
        dispatch!(self, db => db.get_profile_for_user(user_id).await)
    }

    pub async fn profiles_for_sport(&self, sport_id: &str) -> Result<Vec<AthleteProfile>, AppError> {
        dispatch!(self, db => db.profiles_for_sport(sport_id).await)
    }

    pub async fn upsert_profile(&self, profile: &AthleteProfile) -> Result<(), AppError> {
        dispatch!(self, db => db.upsert_profile(profile).await)
    }

    pub async fn delete_profile(&self, profile_id: &str) -> Result<(), AppError> {
        dispatch!(self, db => db.delete_profile(profile_id).await)
    }

    // ─── Sports ──────────────────────────────────────────────────

    pub async fn get_sport(&self, sport_id: &str) -> Result<Option<SportsCategory>, AppError> {
        dispatch!(self, db => db.get_sport(sport_id).await)
    }

    pub async fn list_sports(&self) -> Result<Vec<SportsCategory>, AppError> {
        dispatch!(self, db => db.list_sports().await)
    }

    pub async fn upsert_sport(&self, sport: &SportsCategory) -> Result<(), AppError> {
        dispatch!(self, db => db.upsert_sport(sport).await)
    }

    pub async fn delete_sport(&self, sport_id: &str) -> Result<(), AppError> {
        dispatch!(self, db => db.delete_sport(sport_id).await)
    }

    // ─── Coach–Athlete Relationships ─────────────────────────────

    pub async fn get_relationship(
        &self,
        relationship_id: &str,
    ) -> Result<Option<CoachAthleteRelationship>, AppError> {
        dispatch!(self, db => db.get_relationship(relationship_id).await)
    }

    pub async fn find_relationship(
        &self,
        coach_id: &str,
        athlete_id: &str,
    ) -> Result<Option<CoachAthleteRelationship>, AppError> {
        dispatch!(self, db => db.find_relationship(coach_id, athlete_id).await)
    }

    pub async fn relationships_for_coach(
        &self,
        coach_id: &str,
    ) -> Result<Vec<CoachAthleteRelationship>, AppError> {
        dispatch!(self, db => db.relationships_for_coach(coach_id).await)
    }

    pub async fn relationships_for_athlete(
        &self,
        athlete_id: &str,
    ) -> Result<Vec<CoachAthleteRelationship>, AppError> {
        dispatch!(self, db => db.relationships_for_athlete(athlete_id).await)
    }

    pub async fn list_relationships(&self) -> Result<Vec<CoachAthleteRelationship>, AppError> {
        dispatch!(self, db => db.list_relationships().await)
    }

    pub async fn upsert_relationship(
        &self,
        relationship: &CoachAthleteRelationship,
    ) -> Result<(), AppError> {
        dispatch!(self, db => db.upsert_relationship(relationship).await)
    }

    pub async fn delete_relationship(&self, relationship_id: &str) -> Result<(), AppError> {
        dispatch!(self, db => db.delete_relationship(relationship_id).await)
    }

    // ─── Daily Logs ──────────────────────────────────────────────

    pub async fn get_daily_log(&self, log_id: &str) -> Result<Option<DailyLog>, AppError> {
        dispatch!(self, db => db.get_daily_log(log_id).await)
    }

    /// All logs of one athlete profile, in no particular order.
    pub async fn daily_logs_for_athlete(
        &self,
        athlete_profile_id: &str,
    ) -> Result<Vec<DailyLog>, AppError> {
        dispatch!(self, db => db.daily_logs_for_athlete(athlete_profile_id).await)
    }

    pub async fn upsert_daily_log(&self, log: &DailyLog) -> Result<(), AppError> {
        dispatch!(self, db => db.upsert_daily_log(log).await)
    }

    pub async fn delete_daily_log(&self, log_id: &str) -> Result<(), AppError> {
        dispatch!(self, db => db.delete_daily_log(log_id).await)
    }
}
