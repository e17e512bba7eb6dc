//! Athlete profile model.

use crate::models::sport::SportRef;
use crate::models::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coach-assigned injury risk bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// Biometric profile, one per athlete user.
///
/// Stored in the `athlete_profiles` collection keyed by `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AthleteProfile {
    pub id: String,
    /// Owning user (1:1)
    pub user_id: String,
    pub age: u32,
    pub gender: String,
    /// Height in centimetres
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    /// Always derived from height and weight, see [`compute_bmi`]
    pub bmi: f64,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub risk_score: f64,
    #[serde(default)]
    pub sport_id: Option<String>,
    #[serde(default)]
    pub training_type: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub limitations: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AthleteProfile {
    /// Set height/weight and keep `bmi` in step with them.
    pub fn set_body_measurements(&mut self, height_cm: f64, weight_kg: f64) {
        self.height = height_cm;
        self.weight = weight_kg;
        self.bmi = compute_bmi(weight_kg, height_cm);
    }
}

/// BMI from weight (kg) and height (cm), rounded to two decimals.
///
/// Returns 0 for a non-positive height.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    if height_cm <= 0.0 {
        return 0.0;
    }
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    (bmi * 100.0).round() / 100.0
}

/// Profile subset embedded in a coach's athlete listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSubset {
    pub id: String,
    pub age: u32,
    pub height: f64,
    pub weight: f64,
    pub sport: Option<SportRef>,
}

/// Athlete identity plus the optional profile subset.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AthleteSummary {
    #[serde(flatten)]
    pub user: UserSummary,
    pub athlete_profile: Option<ProfileSubset>,
}

/// Profile joined with its user, as listed under `/athlete`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteListing {
    #[serde(flatten)]
    pub profile: AthleteProfile,
    pub user: UserSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_date: Option<DateTime<Utc>>,
}
