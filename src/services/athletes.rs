// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Athlete profile listing and removal.

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::athlete::AthleteListing;
use crate::models::relationship::sort_newest_first;
use crate::models::user::UserSummary;
use crate::models::{Role, User};
use crate::services::access::AccessPolicy;
use crate::services::users::{PurgeCounts, UserService};

#[derive(Clone)]
pub struct AthleteService {
    db: Database,
    access: AccessPolicy,
    users: UserService,
}

impl AthleteService {
    pub fn new(db: Database, access: AccessPolicy, users: UserService) -> Self {
        Self { db, access, users }
    }

    /// Profiles the caller may see, joined with the owning user.
    ///
    /// Coaches get their assigned athletes, newest assignment first, each
    /// with its `assignedDate`. Athletes get their own profile.
    pub async fn list_athletes(&self, caller: &User) -> Result<Vec<AthleteListing>> {
        match caller.role {
            Role::Coach => {
                let mut relationships = self.db.relationships_for_coach(&caller.id).await?;
                sort_newest_first(&mut relationships);

                let mut listings = Vec::with_capacity(relationships.len());
                for rel in relationships {
                    let Some(user) = self.db.get_user(&rel.athlete_id).await? else {
                        continue;
                    };
                    let Some(profile) = self.db.get_profile_for_user(&user.id).await? else {
                        continue;
                    };
                    listings.push(AthleteListing {
                        profile,
                        user: UserSummary::from(&user),
                        assigned_date: Some(rel.assigned_date),
                    });
                }
                Ok(listings)
            }
            Role::Athlete => Ok(self
                .db
                .get_profile_for_user(&caller.id)
                .await?
                .map(|profile| AthleteListing {
                    profile,
                    user: UserSummary::from(caller),
                    assigned_date: None,
                })
                .into_iter()
                .collect()),
            Role::Unknown => Ok(Vec::new()),
        }
    }

    /// Delete an athlete profile together with its owning account.
    pub async fn delete_athlete(&self, caller: &User, profile_id: &str) -> Result<PurgeCounts> {
        let profile = self
            .db
            .get_profile(profile_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Athlete not found".to_string()))?;

        self.access
            .require_athlete_access(&caller.id, &profile.id, "delete this athlete")
            .await?;

        let counts = match self.db.get_user(&profile.user_id).await? {
            Some(user) => self.users.purge_account(&user).await?,
            None => {
                // Orphaned profile; only its logs hang off it
                let daily_logs = self.users.purge_profile(&profile.id).await?;
                PurgeCounts {
                    profiles: 1,
                    daily_logs,
                    ..Default::default()
                }
            }
        };

        tracing::info!(
            profile_id,
            deleted_by = %caller.id,
            daily_logs = counts.daily_logs,
            "Athlete deleted"
        );
        Ok(counts)
    }
}
