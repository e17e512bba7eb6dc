// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role-scoped access policy for athlete data.
//!
//! Every operation that reads or writes an athlete profile or its daily
//! logs asks [`AccessPolicy::has_athlete_access`] first. The policy
//! fails closed: unknown callers, unknown targets and unmodeled roles are
//! all denied.

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{AthleteProfile, Role, User};

/// Facts the access decision is made from.
#[derive(Debug, Clone, Copy)]
pub enum AccessFacts<'a> {
    /// Requesting user does not exist.
    UnknownRequester,
    /// Requester is an athlete; carries their own profile ID, if any.
    Athlete { own_profile_id: Option<&'a str> },
    /// Requester is a coach; whether a relationship with the target's
    /// owning user exists.
    Coach { assigned: bool },
    /// Requester holds a role this service does not model.
    Other,
}

/// Pure access decision for `target_profile_id`.
pub fn decide(facts: AccessFacts<'_>, target_profile_id: &str) -> bool {
    match facts {
        AccessFacts::Athlete { own_profile_id } => own_profile_id == Some(target_profile_id),
        AccessFacts::Coach { assigned } => assigned,
        AccessFacts::UnknownRequester | AccessFacts::Other => false,
    }
}

/// Access policy backed by the identity and relationship stores.
#[derive(Clone)]
pub struct AccessPolicy {
    db: Database,
}

impl AccessPolicy {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Load the authenticated caller.
    ///
    /// A valid token for a user that no longer exists is treated as
    /// unauthenticated; one for a deactivated account is refused.
    pub async fn caller(&self, user_id: &str) -> Result<User> {
        let user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;
        if !user.is_active {
            tracing::debug!(user_id, "Request from deactivated account");
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }
        Ok(user)
    }

    /// Whether `requesting_user_id` may read or write athlete profile
    /// `athlete_profile_id` and its logs.
    pub async fn has_athlete_access(
        &self,
        requesting_user_id: &str,
        athlete_profile_id: &str,
    ) -> Result<bool> {
        let requester = self.db.get_user(requesting_user_id).await?;

        let allowed = match requester.as_ref().map(|u| u.role) {
            None => decide(AccessFacts::UnknownRequester, athlete_profile_id),
            Some(Role::Athlete) => {
                let own = self.db.get_profile_for_user(requesting_user_id).await?;
                decide(
                    AccessFacts::Athlete {
                        own_profile_id: own.as_ref().map(|p| p.id.as_str()),
                    },
                    athlete_profile_id,
                )
            }
            Some(Role::Coach) => {
                let assigned = match self.db.get_profile(athlete_profile_id).await? {
                    Some(target) => self
                        .db
                        .find_relationship(requesting_user_id, &target.user_id)
                        .await?
                        .is_some(),
                    None => false,
                };
                decide(AccessFacts::Coach { assigned }, athlete_profile_id)
            }
            Some(Role::Unknown) => decide(AccessFacts::Other, athlete_profile_id),
        };

        if !allowed {
            tracing::debug!(
                requester = requesting_user_id,
                athlete_profile_id,
                "Athlete access denied"
            );
        }

        Ok(allowed)
    }

    /// Like [`has_athlete_access`](Self::has_athlete_access) but maps a
    /// denial to `Forbidden`.
    pub async fn require_athlete_access(
        &self,
        requesting_user_id: &str,
        athlete_profile_id: &str,
        action: &str,
    ) -> Result<()> {
        if self
            .has_athlete_access(requesting_user_id, athlete_profile_id)
            .await?
        {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "You don't have permission to {} for this athlete",
                action
            )))
        }
    }

    /// Whether `requester` may manage the account `target_user_id`.
    ///
    /// Allowed for the account owner, and for a coach with access to the
    /// target's athlete profile.
    pub async fn can_manage_user(&self, requester: &User, target_user_id: &str) -> Result<bool> {
        if requester.id == target_user_id {
            return Ok(true);
        }
        if !requester.role.is_coach() {
            return Ok(false);
        }
        match self.db.get_profile_for_user(target_user_id).await? {
            Some(profile) => self.has_athlete_access(&requester.id, &profile.id).await,
            None => Ok(false),
        }
    }

    /// Athlete profiles visible to `caller` when no athlete is named.
    ///
    /// Athletes see their own profile; coaches see every athlete assigned
    /// to them; anyone else sees nothing.
    pub async fn visible_profiles(&self, caller: &User) -> Result<Vec<AthleteProfile>> {
        match caller.role {
            Role::Athlete => Ok(self
                .db
                .get_profile_for_user(&caller.id)
                .await?
                .into_iter()
                .collect()),
            Role::Coach => {
                let mut profiles = Vec::new();
                for rel in self.db.relationships_for_coach(&caller.id).await? {
                    if let Some(profile) = self.db.get_profile_for_user(&rel.athlete_id).await? {
                        profiles.push(profile);
                    }
                }
                Ok(profiles)
            }
            Role::Unknown => Ok(Vec::new()),
        }
    }
}

/// Reject callers that are not coaches.
pub fn require_coach(caller: &User, action: &str) -> Result<()> {
    if caller.role.is_coach() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("Only coaches can {}", action)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_athlete_only_sees_own_profile() {
        let facts = AccessFacts::Athlete {
            own_profile_id: Some("p1"),
        };
        assert!(decide(facts, "p1"));
        assert!(!decide(facts, "p2"));
    }

    #[test]
    fn test_athlete_without_profile_is_denied() {
        let facts = AccessFacts::Athlete {
            own_profile_id: None,
        };
        assert!(!decide(facts, "p1"));
    }

    #[test]
    fn test_coach_needs_assignment() {
        assert!(decide(AccessFacts::Coach { assigned: true }, "p1"));
        assert!(!decide(AccessFacts::Coach { assigned: false }, "p1"));
    }

    #[test]
    fn test_fail_closed_for_unknown_and_other() {
        assert!(!decide(AccessFacts::UnknownRequester, "p1"));
        assert!(!decide(AccessFacts::Other, "p1"));
    }
}
