// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sports catalog.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::{keys, Database};
use crate::error::{AppError, Result};
use crate::models::athlete::{AthleteSummary, ProfileSubset};
use crate::models::sport::SportRef;
use crate::models::user::UserSummary;
use crate::models::{SportsCategory, User};
use crate::services::access::require_coach;

/// Body of `POST /sport` and `PUT /sport/:id`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SportRequest {
    #[validate(length(min = 1, max = 100, message = "Sport name is required"))]
    pub name: String,
}

/// A sport with the athletes tagged with it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SportDetail {
    #[serde(flatten)]
    pub sport: SportsCategory,
    pub athletes: Vec<AthleteSummary>,
}

fn not_found() -> AppError {
    AppError::NotFound("Sport not found".to_string())
}

fn clean_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Sport name is required".to_string()));
    }
    Ok(name.to_string())
}

#[derive(Clone)]
pub struct SportService {
    db: Database,
}

impl SportService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All sports, by name.
    pub async fn list(&self) -> Result<Vec<SportsCategory>> {
        let mut sports = self.db.list_sports().await?;
        sports.sort_by_cached_key(|s| s.name.to_lowercase());
        Ok(sports)
    }

    pub async fn get(&self, sport_id: &str) -> Result<SportDetail> {
        let sport = self.db.get_sport(sport_id).await?.ok_or_else(not_found)?;

        let mut athletes = Vec::new();
        for profile in self.db.profiles_for_sport(&sport.id).await? {
            let Some(user) = self.db.get_user(&profile.user_id).await? else {
                continue;
            };
            athletes.push(AthleteSummary {
                user: UserSummary::from(&user),
                athlete_profile: Some(ProfileSubset {
                    id: profile.id,
                    age: profile.age,
                    height: profile.height,
                    weight: profile.weight,
                    sport: Some(SportRef::from(&sport)),
                }),
            });
        }
        athletes.sort_by(|a, b| a.user.full_name.cmp(&b.user.full_name));

        Ok(SportDetail { sport, athletes })
    }

    pub async fn create(&self, caller: &User, req: SportRequest) -> Result<SportsCategory> {
        require_coach(caller, "manage sports")?;

        let sport = SportsCategory {
            id: uuid::Uuid::new_v4().to_string(),
            name: clean_name(&req.name)?,
            created_at: chrono::Utc::now(),
        };

        let name_key = keys::sport(&sport.name);
        if !self.db.claim_key(&name_key, &sport.id).await? {
            return Err(AppError::Conflict("Sport already exists".to_string()));
        }
        if let Err(e) = self.db.upsert_sport(&sport).await {
            self.db.release_key(&name_key).await?;
            return Err(e);
        }

        tracing::info!(sport_id = %sport.id, name = %sport.name, "Sport created");
        Ok(sport)
    }

    /// Rename a sport. Names stay unique ignoring case.
    pub async fn update(
        &self,
        caller: &User,
        sport_id: &str,
        req: SportRequest,
    ) -> Result<SportsCategory> {
        require_coach(caller, "manage sports")?;

        let mut sport = self.db.get_sport(sport_id).await?.ok_or_else(not_found)?;
        let name = clean_name(&req.name)?;

        let old_key = keys::sport(&sport.name);
        let new_key = keys::sport(&name);
        sport.name = name;

        if old_key == new_key {
            self.db.upsert_sport(&sport).await?;
        } else {
            if !self.db.claim_key(&new_key, &sport.id).await? {
                return Err(AppError::Conflict("Sport already exists".to_string()));
            }
            if let Err(e) = self.db.upsert_sport(&sport).await {
                self.db.release_key(&new_key).await?;
                return Err(e);
            }
            self.db.release_key(&old_key).await?;
        }

        tracing::info!(sport_id, name = %sport.name, "Sport updated");
        Ok(sport)
    }

    /// Delete a sport. Refused while any athlete profile references it.
    pub async fn delete(&self, caller: &User, sport_id: &str) -> Result<()> {
        require_coach(caller, "manage sports")?;

        let sport = self.db.get_sport(sport_id).await?.ok_or_else(not_found)?;

        let referencing = self.db.profiles_for_sport(&sport.id).await?.len();
        if referencing > 0 {
            return Err(AppError::BadRequest(format!(
                "Cannot delete sport '{}': {} athlete(s) are still assigned to it",
                sport.name, referencing
            )));
        }

        self.db.delete_sport(&sport.id).await?;
        self.db.release_key(&keys::sport(&sport.name)).await?;

        tracing::info!(sport_id, name = %sport.name, "Sport deleted");
        Ok(())
    }
}
