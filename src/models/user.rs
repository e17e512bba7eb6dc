//! User model for storage and API.

use crate::models::athlete::AthleteProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Account role. Fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Coach,
    /// `ATHELETE` is the legacy spelling still sent by older clients.
    #[serde(alias = "ATHELETE")]
    Athlete,
    /// Any role string this service does not model. Never granted access.
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn is_coach(self) -> bool {
        self == Role::Coach
    }

    pub fn is_athlete(self) -> bool {
        self == Role::Athlete
    }
}

fn default_active() -> bool {
    true
}

/// User account stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID (also used as document ID)
    pub id: String,
    pub full_name: String,
    /// Lowercased, trimmed email address
    pub email: String,
    /// Argon2 PHC hash
    pub password_hash: String,
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity fields embedded in joined responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub full_name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// User as returned by the API (never includes the password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub athlete_profile: Option<AthleteProfile>,
}

impl UserResponse {
    pub fn new(user: User, athlete_profile: Option<AthleteProfile>) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            athlete_profile,
        }
    }
}

/// Normalize an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `deserialize_with` helper so request emails are normalized before
/// they are validated.
pub fn deserialize_email<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|raw| normalize_email(&raw))
}

/// Optional variant of [`deserialize_email`]. Pair with `#[serde(default)]`.
pub fn deserialize_optional_email<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|raw| raw.map(|e| normalize_email(&e)))
}
