// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process storage backend built on `DashMap`.
//!
//! Mirrors the Firestore backend operation for operation. Unique key
//! claims go through `DashMap::entry`, which holds the shard lock for the
//! whole check-and-insert.

use crate::db::UniqueKey;
use crate::error::AppError;
use crate::models::{AthleteProfile, CoachAthleteRelationship, DailyLog, SportsCategory, User};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Default)]
struct Tables {
    users: DashMap<String, User>,
    profiles: DashMap<String, AthleteProfile>,
    sports: DashMap<String, SportsCategory>,
    relationships: DashMap<String, CoachAthleteRelationship>,
    daily_logs: DashMap<String, DailyLog>,
    unique_keys: DashMap<String, UniqueKey>,
}

/// In-process database. Cloning shares the same tables.
#[derive(Clone, Default)]
pub struct MemoryDb {
    tables: Arc<Tables>,
}

fn values_where<V: Clone>(map: &DashMap<String, V>, pred: impl Fn(&V) -> bool) -> Vec<V> {
    map.iter()
        .filter(|entry| pred(entry.value()))
        .map(|entry| entry.value().clone())
        .collect()
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Unique Keys ─────────────────────────────────────────────

    pub async fn claim_key(&self, key: &str, owner_id: &str) -> Result<bool, AppError> {
        match self.tables.unique_keys.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(UniqueKey {
                    owner_id: owner_id.to_string(),
                    created_at: chrono::Utc::now(),
                });
                Ok(true)
            }
        }
    }

    pub async fn release_key(&self, key: &str) -> Result<(), AppError> {
        self.tables.unique_keys.remove(key);
        Ok(())
    }

    // ─── Users ───────────────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.tables.users.get(user_id).map(|u| u.clone()))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(values_where(&self.tables.users, |u| u.email == email)
            .into_iter()
            .next())
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(values_where(&self.tables.users, |_| true))
    }

    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.tables.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        self.tables.users.remove(user_id);
        Ok(())
    }

    // ─── Athlete Profiles ────────────────────────────────────────

    pub async fn get_profile(&self, profile_id: &str) -> Result<Option<AthleteProfile>, AppError> {
        Ok(self.tables.profiles.get(profile_id).map(|p| p.clone()))
    }

    pub async fn get_profile_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<AthleteProfile>, AppError> {
        Ok(values_where(&self.tables.profiles, |p| p.user_id == user_id)
            .into_iter()
            .next())
    }

    pub async fn profiles_for_sport(&self, sport_id: &str) -> Result<Vec<AthleteProfile>, AppError> {
        Ok(values_where(&self.tables.profiles, |p| {
            p.sport_id.as_deref() == Some(sport_id)
        }))
    }

    pub async fn upsert_profile(&self, profile: &AthleteProfile) -> Result<(), AppError> {
        self.tables
            .profiles
            .insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    pub async fn delete_profile(&self, profile_id: &str) -> Result<(), AppError> {
        self.tables.profiles.remove(profile_id);
        Ok(())
    }

    // ─── Sports ──────────────────────────────────────────────────

    pub async fn get_sport(&self, sport_id: &str) -> Result<Option<SportsCategory>, AppError> {
        Ok(self.tables.sports.get(sport_id).map(|s| s.clone()))
    }

    pub async fn list_sports(&self) -> Result<Vec<SportsCategory>, AppError> {
        Ok(values_where(&self.tables.sports, |_| true))
    }

    pub async fn upsert_sport(&self, sport: &SportsCategory) -> Result<(), AppError> {
        self.tables.sports.insert(sport.id.clone(), sport.clone());
        Ok(())
    }

    pub async fn delete_sport(&self, sport_id: &str) -> Result<(), AppError> {
        self.tables.sports.remove(sport_id);
        Ok(())
    }

    // ─── Coach–Athlete Relationships ─────────────────────────────

    pub async fn get_relationship(
        &self,
        relationship_id: &str,
    ) -> Result<Option<CoachAthleteRelationship>, AppError> {
        Ok(self
            .tables
            .relationships
            .get(relationship_id)
            .map(|r| r.clone()))
    }

    pub async fn find_relationship(
        &self,
        coach_id: &str,
        athlete_id: &str,
    ) -> Result<Option<CoachAthleteRelationship>, AppError> {
        Ok(values_where(&self.tables.relationships, |r| {
            r.coach_id == coach_id && r.athlete_id == athlete_id
        })
        .into_iter()
        .next())
    }

    pub async fn relationships_for_coach(
        &self,
        coach_id: &str,
    ) -> Result<Vec<CoachAthleteRelationship>, AppError> {
        Ok(values_where(&self.tables.relationships, |r| {
            r.coach_id == coach_id
        }))
    }

    pub async fn relationships_for_athlete(
        &self,
        athlete_id: &str,
    ) -> Result<Vec<CoachAthleteRelationship>, AppError> {
        Ok(values_where(&self.tables.relationships, |r| {
            r.athlete_id == athlete_id
        }))
    }

    pub async fn list_relationships(&self) -> Result<Vec<CoachAthleteRelationship>, AppError> {
        Ok(values_where(&self.tables.relationships, |_| true))
    }

    pub async fn upsert_relationship(
        &self,
        relationship: &CoachAthleteRelationship,
    ) -> Result<(), AppError> {
        self.tables
            .relationships
            .insert(relationship.id.clone(), relationship.clone());
        Ok(())
    }

    pub async fn delete_relationship(&self, relationship_id: &str) -> Result<(), AppError> {
        self.tables.relationships.remove(relationship_id);
        Ok(())
    }

    // ─── Daily Logs ──────────────────────────────────────────────

    pub async fn get_daily_log(&self, log_id: &str) -> Result<Option<DailyLog>, AppError> {
        Ok(self.tables.daily_logs.get(log_id).map(|l| l.clone()))
    }

    pub async fn daily_logs_for_athlete(
        &self,
        athlete_profile_id: &str,
    ) -> Result<Vec<DailyLog>, AppError> {
        Ok(values_where(&self.tables.daily_logs, |l| {
            l.athlete_id == athlete_profile_id
        }))
    }

    pub async fn upsert_daily_log(&self, log: &DailyLog) -> Result<(), AppError> {
        self.tables.daily_logs.insert(log.id.clone(), log.clone());
        Ok(())
    }

    pub async fn delete_daily_log(&self, log_id: &str) -> Result<(), AppError> {
        self.tables.daily_logs.remove(log_id);
        Ok(())
    }
}
