// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coach–athlete relationship management.

use crate::db::{keys, Database};
use crate::error::{AppError, Result};
use crate::models::athlete::{AthleteSummary, ProfileSubset};
use crate::models::relationship::{sort_newest_first, RelationshipView};
use crate::models::sport::SportRef;
use crate::models::user::UserSummary;
use crate::models::{CoachAthleteRelationship, Role, User};
use crate::services::access::require_coach;

/// Assigns athletes to coaches and lists those assignments.
#[derive(Clone)]
pub struct RelationshipService {
    db: Database,
}

impl RelationshipService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Assign `athlete_id` to a coach.
    ///
    /// The coach defaults to the caller. A coach may only assign athletes
    /// to themself.
    pub async fn assign(
        &self,
        caller: &User,
        athlete_id: &str,
        coach_id: Option<&str>,
    ) -> Result<RelationshipView> {
        require_coach(caller, "assign athletes")?;

        let coach_id = coach_id.unwrap_or(caller.id.as_str());
        if coach_id != caller.id {
            return Err(AppError::Forbidden(
                "You can only assign athletes to yourself".to_string(),
            ));
        }

        let athlete = self
            .db
            .get_user(athlete_id)
            .await?
            .filter(|u| u.role == Role::Athlete)
            .ok_or_else(|| {
                AppError::NotFound("Athlete not found or user is not an athlete".to_string())
            })?;

        let relationship = CoachAthleteRelationship {
            id: uuid::Uuid::new_v4().to_string(),
            coach_id: caller.id.clone(),
            athlete_id: athlete.id.clone(),
            assigned_date: chrono::Utc::now(),
        };

        let pair_key = keys::coach_athlete(&relationship.coach_id, &relationship.athlete_id);
        if !self.db.claim_key(&pair_key, &relationship.id).await? {
            tracing::info!(
                coach_id = %relationship.coach_id,
                athlete_id = %relationship.athlete_id,
                "Duplicate assignment rejected"
            );
            return Err(AppError::Conflict(
                "Athlete is already assigned to this coach".to_string(),
            ));
        }

        if let Err(e) = self.db.upsert_relationship(&relationship).await {
            self.db.release_key(&pair_key).await?;
            return Err(e);
        }

        tracing::info!(
            relationship_id = %relationship.id,
            coach_id = %relationship.coach_id,
            athlete_id = %relationship.athlete_id,
            "Athlete assigned to coach"
        );

        let athlete_summary = self.athlete_summary(&athlete).await?;
        let mut view = RelationshipView::bare(relationship);
        view.coach = Some(UserSummary::from(caller));
        view.athlete = Some(athlete_summary);
        Ok(view)
    }

    /// Athletes assigned to `coach_id`, newest assignment first.
    pub async fn list_for_coach(&self, coach_id: &str) -> Result<Vec<RelationshipView>> {
        let mut relationships = self.db.relationships_for_coach(coach_id).await?;
        sort_newest_first(&mut relationships);

        let mut views = Vec::with_capacity(relationships.len());
        for rel in relationships {
            let athlete = match self.db.get_user(&rel.athlete_id).await? {
                Some(user) => Some(self.athlete_summary(&user).await?),
                None => None,
            };
            let mut view = RelationshipView::bare(rel);
            view.athlete = athlete;
            views.push(view);
        }
        Ok(views)
    }

    /// Coaches `athlete_id` is assigned to, newest assignment first.
    pub async fn list_for_athlete(&self, athlete_id: &str) -> Result<Vec<RelationshipView>> {
        let mut relationships = self.db.relationships_for_athlete(athlete_id).await?;
        sort_newest_first(&mut relationships);

        let mut views = Vec::with_capacity(relationships.len());
        for rel in relationships {
            let coach = self
                .db
                .get_user(&rel.coach_id)
                .await?
                .as_ref()
                .map(UserSummary::from);
            let mut view = RelationshipView::bare(rel);
            view.coach = coach;
            views.push(view);
        }
        Ok(views)
    }

    /// Every relationship with both sides joined. Coaches only.
    pub async fn list_all(&self, caller: &User) -> Result<Vec<RelationshipView>> {
        require_coach(caller, "list all relationships")?;

        let mut relationships = self.db.list_relationships().await?;
        sort_newest_first(&mut relationships);

        let mut views = Vec::with_capacity(relationships.len());
        for rel in relationships {
            let coach = self
                .db
                .get_user(&rel.coach_id)
                .await?
                .as_ref()
                .map(UserSummary::from);
            let athlete = self
                .db
                .get_user(&rel.athlete_id)
                .await?
                .as_ref()
                .map(|u| AthleteSummary {
                    user: UserSummary::from(u),
                    athlete_profile: None,
                });
            let mut view = RelationshipView::bare(rel);
            view.coach = coach;
            view.athlete = athlete;
            views.push(view);
        }
        Ok(views)
    }

    /// Delete a relationship. Only its coach may do this.
    pub async fn remove(&self, relationship_id: &str, requester_id: &str) -> Result<()> {
        let relationship = self
            .db
            .get_relationship(relationship_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Coach-athlete relationship not found".to_string())
            })?;

        if relationship.coach_id != requester_id {
            return Err(AppError::Forbidden(
                "You can only remove athletes from your own coaching".to_string(),
            ));
        }

        self.delete_record(&relationship).await?;

        tracing::info!(
            relationship_id,
            coach_id = %relationship.coach_id,
            athlete_id = %relationship.athlete_id,
            "Athlete removed from coach"
        );
        Ok(())
    }

    /// Delete every relationship `user_id` takes part in, on either side.
    ///
    /// Returns the number of relationships deleted.
    pub async fn purge_user(&self, user_id: &str) -> Result<usize> {
        let mut relationships = self.db.relationships_for_coach(user_id).await?;
        relationships.extend(self.db.relationships_for_athlete(user_id).await?);

        for rel in &relationships {
            self.delete_record(rel).await?;
        }
        Ok(relationships.len())
    }

    async fn delete_record(&self, relationship: &CoachAthleteRelationship) -> Result<()> {
        self.db.delete_relationship(&relationship.id).await?;
        self.db
            .release_key(&keys::coach_athlete(
                &relationship.coach_id,
                &relationship.athlete_id,
            ))
            .await
    }

    async fn athlete_summary(&self, athlete: &User) -> Result<AthleteSummary> {
        let athlete_profile = match self.db.get_profile_for_user(&athlete.id).await? {
            Some(profile) => {
                let sport = match profile.sport_id.as_deref() {
                    Some(sport_id) => self.db.get_sport(sport_id).await?.as_ref().map(SportRef::from),
                    None => None,
                };
                Some(ProfileSubset {
                    id: profile.id,
                    age: profile.age,
                    height: profile.height,
                    weight: profile.weight,
                    sport,
                })
            }
            None => None,
        };

        Ok(AthleteSummary {
            user: UserSummary::from(athlete),
            athlete_profile,
        })
    }
}
