// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Accounts: registration, login, profile edits and deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::db::{keys, Database};
use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::athlete::RiskLevel;
use crate::models::user::{
    deserialize_email, deserialize_optional_email, normalize_email, UserResponse,
};
use crate::models::{AthleteProfile, Role, User};
use crate::services::access::{require_coach, AccessPolicy};
use crate::services::daily_logs::DailyLogService;
use crate::services::password::{hash_password, verify_password};
use crate::services::relationships::RelationshipService;

/// Body of `POST /users/register`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Full name is required"))]
    pub full_name: String,
    #[serde(deserialize_with = "deserialize_email")]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: Role,
    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120"))]
    pub age: Option<u32>,
    #[validate(length(min = 1, message = "Gender cannot be empty"))]
    pub gender: Option<String>,
    #[validate(range(min = 50.0, max = 300.0, message = "Height must be between 50 and 300 cm"))]
    pub height: Option<f64>,
    #[validate(range(min = 20.0, max = 500.0, message = "Weight must be between 20 and 500 kg"))]
    pub weight: Option<f64>,
    pub sport_id: Option<String>,
    pub training_type: Option<String>,
    pub experience_level: Option<String>,
    pub limitations: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub athlete_id: Option<String>,
}

/// Body of `POST /users/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(deserialize_with = "deserialize_email")]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

/// Body of `PATCH /users/change-password`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_password_confirmation", skip_on_field_errors = false))]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
    pub confirm_password: String,
}

fn validate_password_confirmation(
    req: &ChangePasswordRequest,
) -> std::result::Result<(), ValidationError> {
    if req.new_password != req.confirm_password {
        let mut err = ValidationError::new("password_mismatch");
        err.message = Some("Passwords do not match".into());
        return Err(err);
    }
    Ok(())
}

/// Body of `PATCH /users/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditUserRequest {
    #[validate(length(min = 1, max = 100, message = "Full name cannot be empty"))]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_email")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120"))]
    pub age: Option<u32>,
    #[validate(length(min = 1, message = "Gender cannot be empty"))]
    pub gender: Option<String>,
    #[validate(range(min = 50.0, max = 300.0, message = "Height must be between 50 and 300 cm"))]
    pub height: Option<f64>,
    #[validate(range(min = 20.0, max = 500.0, message = "Weight must be between 20 and 500 kg"))]
    pub weight: Option<f64>,
    pub sport_id: Option<String>,
    pub training_type: Option<String>,
    pub experience_level: Option<String>,
    pub limitations: Option<String>,
    /// Coach-only
    pub risk_level: Option<RiskLevel>,
    /// Coach-only
    #[validate(range(min = 0.0, max = 100.0, message = "Risk score must be between 0 and 100"))]
    pub risk_score: Option<f64>,
}

impl EditUserRequest {
    fn touches_profile(&self) -> bool {
        self.age.is_some()
            || self.gender.is_some()
            || self.height.is_some()
            || self.weight.is_some()
            || self.sport_id.is_some()
            || self.training_type.is_some()
            || self.experience_level.is_some()
            || self.limitations.is_some()
            || self.risk_level.is_some()
            || self.risk_score.is_some()
    }
}

/// Row of the coach-facing user directory.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListItem {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// What a cascading account deletion removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeCounts {
    pub profiles: usize,
    pub daily_logs: usize,
    pub relationships: usize,
}

/// Account operations.
#[derive(Clone)]
pub struct UserService {
    db: Database,
    access: AccessPolicy,
    relationships: RelationshipService,
    daily_logs: DailyLogService,
    jwt_signing_key: Vec<u8>,
    jwt_ttl_hours: i64,
}

impl UserService {
    pub fn new(
        db: Database,
        access: AccessPolicy,
        relationships: RelationshipService,
        daily_logs: DailyLogService,
        jwt_signing_key: Vec<u8>,
        jwt_ttl_hours: i64,
    ) -> Self {
        Self {
            db,
            access,
            relationships,
            daily_logs,
            jwt_signing_key,
            jwt_ttl_hours,
        }
    }

    /// Create an account, plus an athlete profile for athletes.
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse> {
        if req.role == Role::Unknown {
            return Err(AppError::BadRequest(
                "Role must be COACH or ATHLETE".to_string(),
            ));
        }

        let athlete_fields = if req.role.is_athlete() {
            match (req.age, req.gender.as_deref(), req.height, req.weight) {
                (Some(age), Some(gender), Some(height), Some(weight)) => {
                    Some((age, gender.to_string(), height, weight))
                }
                _ => {
                    return Err(AppError::BadRequest(
                        "Athletes must provide age, gender, height and weight".to_string(),
                    ))
                }
            }
        } else {
            None
        };

        if let Some(sport_id) = req.sport_id.as_deref() {
            self.require_sport(sport_id).await?;
        }

        let password_hash = hash_password(&req.password)?;
        let email = normalize_email(&req.email);
        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            full_name: req.full_name.trim().to_string(),
            email,
            password_hash,
            role: req.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let email_key = keys::email(&user.email);
        if !self.db.claim_key(&email_key, &user.id).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        if let Err(e) = self.db.upsert_user(&user).await {
            self.db.release_key(&email_key).await?;
            return Err(e);
        }

        let mut athlete_id = None;
        if let Some((age, gender, height, weight)) = athlete_fields {
            let mut profile = AthleteProfile {
                id: uuid::Uuid::new_v4().to_string(),
                user_id: user.id.clone(),
                age,
                gender,
                height: 0.0,
                weight: 0.0,
                bmi: 0.0,
                risk_level: RiskLevel::default(),
                risk_score: 0.0,
                sport_id: req.sport_id,
                training_type: req.training_type,
                experience_level: req.experience_level,
                limitations: req.limitations,
                created_at: now,
                updated_at: now,
            };
            profile.set_body_measurements(height, weight);

            if let Err(e) = self.db.upsert_profile(&profile).await {
                self.db.delete_user(&user.id).await?;
                self.db.release_key(&email_key).await?;
                return Err(e);
            }
            athlete_id = Some(profile.id);
        }

        tracing::info!(user_id = %user.id, role = ?user.role, "User registered");

        Ok(RegisterResponse {
            id: user.id,
            athlete_id,
        })
    }

    /// Exchange credentials for a session token.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse> {
        let email = normalize_email(&req.email);
        let Some(user) = self.db.find_user_by_email(&email).await? else {
            tracing::debug!("Login for unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(&req.password, &user.password_hash) {
            tracing::debug!(user_id = %user.id, "Login with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }

        let token = create_jwt(&user.id, &self.jwt_signing_key, self.jwt_ttl_hours)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            token,
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
        })
    }

    pub async fn me(&self, caller: &User) -> Result<UserResponse> {
        let profile = self.db.get_profile_for_user(&caller.id).await?;
        Ok(UserResponse::new(caller.clone(), profile))
    }

    pub async fn change_password(&self, caller: &User, req: ChangePasswordRequest) -> Result<()> {
        if !verify_password(&req.current_password, &caller.password_hash) {
            return Err(AppError::InvalidCredentials);
        }
        if req.new_password == req.current_password {
            return Err(AppError::BadRequest(
                "New password must be different from the current password".to_string(),
            ));
        }

        let mut user = caller.clone();
        user.password_hash = hash_password(&req.new_password)?;
        user.updated_at = Utc::now();
        self.db.upsert_user(&user).await?;

        tracing::info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// Directory of all accounts, oldest first. Coaches only.
    pub async fn list_users(&self, caller: &User) -> Result<Vec<UserListItem>> {
        require_coach(caller, "list users")?;

        let mut users = self.db.list_users().await?;
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        Ok(users
            .into_iter()
            .map(|u| UserListItem {
                id: u.id,
                full_name: u.full_name,
                email: u.email,
                role: u.role,
                created_at: u.created_at,
            })
            .collect())
    }

    pub async fn get_user(&self, caller: &User, user_id: &str) -> Result<UserResponse> {
        let user = self.managed_user(caller, user_id, "view this user").await?;
        let profile = self.db.get_profile_for_user(&user.id).await?;
        Ok(UserResponse::new(user, profile))
    }

    pub async fn edit_user(
        &self,
        caller: &User,
        user_id: &str,
        req: EditUserRequest,
    ) -> Result<UserResponse> {
        let mut user = self.managed_user(caller, user_id, "edit this user").await?;

        if (req.risk_level.is_some() || req.risk_score.is_some()) && !caller.role.is_coach() {
            return Err(AppError::Forbidden(
                "Only coaches can set risk assessments".to_string(),
            ));
        }
        if let Some(sport_id) = req.sport_id.as_deref() {
            self.require_sport(sport_id).await?;
        }

        let mut profile = self.db.get_profile_for_user(&user.id).await?;
        if req.touches_profile() && profile.is_none() {
            return Err(AppError::BadRequest(
                "User has no athlete profile".to_string(),
            ));
        }

        let now = Utc::now();
        if let Some(profile) = profile.as_mut() {
            if let Some(age) = req.age {
                profile.age = age;
            }
            if let Some(gender) = req.gender {
                profile.gender = gender;
            }
            let height = req.height.unwrap_or(profile.height);
            let weight = req.weight.unwrap_or(profile.weight);
            profile.set_body_measurements(height, weight);
            if let Some(sport_id) = req.sport_id {
                profile.sport_id = Some(sport_id);
            }
            if let Some(v) = req.training_type {
                profile.training_type = Some(v);
            }
            if let Some(v) = req.experience_level {
                profile.experience_level = Some(v);
            }
            if let Some(v) = req.limitations {
                profile.limitations = Some(v);
            }
            if let Some(v) = req.risk_level {
                profile.risk_level = v;
            }
            if let Some(v) = req.risk_score {
                profile.risk_score = v;
            }
            profile.updated_at = now;
        }

        if let Some(name) = req.full_name {
            user.full_name = name.trim().to_string();
        }
        user.updated_at = now;

        let new_email = req
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| *e != user.email);

        match new_email {
            None => self.db.upsert_user(&user).await?,
            Some(new_email) => {
                let old_key = keys::email(&user.email);
                let new_key = keys::email(&new_email);
                if !self.db.claim_key(&new_key, &user.id).await? {
                    return Err(AppError::Conflict("Email already registered".to_string()));
                }
                user.email = new_email;
                if let Err(e) = self.db.upsert_user(&user).await {
                    self.db.release_key(&new_key).await?;
                    return Err(e);
                }
                self.db.release_key(&old_key).await?;
            }
        }

        if let Some(profile) = profile.as_ref() {
            self.db.upsert_profile(profile).await?;
        }

        tracing::info!(user_id = %user.id, edited_by = %caller.id, "User updated");
        Ok(UserResponse::new(user, profile))
    }

    pub async fn delete_user(&self, caller: &User, user_id: &str) -> Result<PurgeCounts> {
        let user = self.managed_user(caller, user_id, "delete this user").await?;
        let counts = self.purge_account(&user).await?;
        tracing::info!(
            user_id = %user.id,
            deleted_by = %caller.id,
            daily_logs = counts.daily_logs,
            relationships = counts.relationships,
            "User deleted"
        );
        Ok(counts)
    }

    /// Delete an account and everything hanging off it: the athlete
    /// profile, its daily logs, relationships on either side, and the
    /// unique keys they held.
    pub async fn purge_account(&self, user: &User) -> Result<PurgeCounts> {
        let mut counts = PurgeCounts::default();

        if let Some(profile) = self.db.get_profile_for_user(&user.id).await? {
            counts.daily_logs = self.purge_profile(&profile.id).await?;
            counts.profiles = 1;
        }

        counts.relationships = self.relationships.purge_user(&user.id).await?;

        self.db.delete_user(&user.id).await?;
        self.db.release_key(&keys::email(&user.email)).await?;

        Ok(counts)
    }

    /// Delete an athlete profile, then sweep its daily logs.
    pub async fn purge_profile(&self, profile_id: &str) -> Result<usize> {
        self.db.delete_profile(profile_id).await?;
        self.daily_logs.purge_athlete(profile_id).await
    }

    async fn managed_user(&self, caller: &User, user_id: &str, action: &str) -> Result<User> {
        let user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !self.access.can_manage_user(caller, &user.id).await? {
            return Err(AppError::Forbidden(format!(
                "You don't have permission to {}",
                action
            )));
        }
        Ok(user)
    }

    async fn require_sport(&self, sport_id: &str) -> Result<()> {
        match self.db.get_sport(sport_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::BadRequest(format!("Unknown sport '{}'", sport_id))),
        }
    }
}
