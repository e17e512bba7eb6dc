//! Coach–athlete assignment model.

use crate::models::athlete::AthleteSummary;
use crate::models::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Join record assigning an athlete user to a coach user.
///
/// Both ids are user ids. At most one record exists per pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoachAthleteRelationship {
    pub id: String,
    pub coach_id: String,
    pub athlete_id: String,
    pub assigned_date: DateTime<Utc>,
}

/// Relationship joined with whichever side(s) the caller asked for.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipView {
    pub id: String,
    pub coach_id: String,
    pub athlete_id: String,
    pub assigned_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub athlete: Option<AthleteSummary>,
}

impl RelationshipView {
    pub fn bare(rel: CoachAthleteRelationship) -> Self {
        Self {
            id: rel.id,
            coach_id: rel.coach_id,
            athlete_id: rel.athlete_id,
            assigned_date: rel.assigned_date,
            coach: None,
            athlete: None,
        }
    }
}

/// Sort newest assignment first.
///
/// Ties fall back to id so the order is stable across backends.
pub fn sort_newest_first(relationships: &mut [CoachAthleteRelationship]) {
    relationships.sort_by(|a, b| {
        b.assigned_date
            .cmp(&a.assigned_date)
            .then_with(|| a.id.cmp(&b.id))
    });
}
