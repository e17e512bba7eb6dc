// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users and athlete profiles
//! - Sports categories
//! - Coach–athlete relationships
//! - Daily logs
//! - Unique keys (create-if-absent documents backing uniqueness rules)

use crate::db::{collections, UniqueKey};
use crate::error::AppError;
use crate::models::{AthleteProfile, CoachAthleteRelationship, DailyLog, SportsCategory, User};
use firestore::errors::FirestoreError;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Unique keys can contain characters Firestore does not allow in
/// document IDs (`/` in sport names, for one).
fn key_document_id(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Generic Helpers ─────────────────────────────────────────

    async fn get_doc<T>(&self, collection: &str, doc_id: &str) -> Result<Option<T>, AppError>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn set_doc<T>(&self, collection: &str, doc_id: &str, object: &T) -> Result<(), AppError>
    where
        T: serde::Serialize + serde::de::DeserializeOwned + Sync + Send,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(doc_id)
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete_doc(&self, collection: &str, doc_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(doc_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn list_all<T>(&self, collection: &str) -> Result<Vec<T>, AppError>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Query documents whose `field` equals `value`.
    async fn list_where_eq<T>(
        &self,
        collection: &str,
        field: &'static str,
        value: &str,
    ) -> Result<Vec<T>, AppError>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        let value = value.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.for_all([q.field(field).eq(value.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Unique Keys ─────────────────────────────────────────────

    /// Claim a unique key by creating its document.
    ///
    /// Firestore rejects the create with AlreadyExists when another writer
    /// got there first, so exactly one concurrent claimant wins.
    pub async fn claim_key(&self, key: &str, owner_id: &str) -> Result<bool, AppError> {
        let record = UniqueKey {
            owner_id: owner_id.to_string(),
            created_at: chrono::Utc::now(),
        };

        let result: Result<UniqueKey, FirestoreError> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::UNIQUE_KEYS)
            .document_id(key_document_id(key))
            .object(&record)
            .execute()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(FirestoreError::DataConflictError(_)) => {
                tracing::debug!(key, "Unique key already claimed");
                Ok(false)
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    pub async fn release_key(&self, key: &str) -> Result<(), AppError> {
        self.delete_doc(collections::UNIQUE_KEYS, &key_document_id(key))
            .await
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_doc(collections::USERS, user_id).await
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users: Vec<User> = self
            .list_where_eq(collections::USERS, "email", email)
            .await?;
        Ok(users.into_iter().next())
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.list_all(collections::USERS).await
    }

    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.set_doc(collections::USERS, &user.id, user).await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::USERS, user_id).await
    }

    // ─── Athlete Profile Operations ──────────────────────────────

    pub async fn get_profile(&self, profile_id: &str) -> Result<Option<AthleteProfile>, AppError> {
        self.get_doc(collections::ATHLETE_PROFILES, profile_id).await
    }

    pub async fn get_profile_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<AthleteProfile>, AppError> {
        let profiles: Vec<AthleteProfile> = self
            .list_where_eq(collections::ATHLETE_PROFILES, "userId", user_id)
            .await?;
        Ok(profiles.into_iter().next())
    }

    pub async fn profiles_for_sport(&self, sport_id: &str) -> Result<Vec<AthleteProfile>, AppError> {
        self.list_where_eq(collections::ATHLETE_PROFILES, "sportId", sport_id)
            .await
    }

    pub async fn upsert_profile(&self, profile: &AthleteProfile) -> Result<(), AppError> {
        self.set_doc(collections::ATHLETE_PROFILES, &profile.id, profile)
            .await
    }

    pub async fn delete_profile(&self, profile_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::ATHLETE_PROFILES, profile_id)
            .await
    }

    // ─── Sports Operations ───────────────────────────────────────

    pub async fn get_sport(&self, sport_id: &str) -> Result<Option<SportsCategory>, AppError> {
        self.get_doc(collections::SPORTS, sport_id).await
    }

    pub async fn list_sports(&self) -> Result<Vec<SportsCategory>, AppError> {
        self.list_all(collections::SPORTS).await
    }

    pub async fn upsert_sport(&self, sport: &SportsCategory) -> Result<(), AppError> {
        self.set_doc(collections::SPORTS, &sport.id, sport).await
    }

    pub async fn delete_sport(&self, sport_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::SPORTS, sport_id).await
    }

    // ─── Relationship Operations ─────────────────────────────────

    pub async fn get_relationship(
        &self,
        relationship_id: &str,
    ) -> Result<Option<CoachAthleteRelationship>, AppError> {
        self.get_doc(collections::COACH_ATHLETE, relationship_id)
            .await
    }

    pub async fn find_relationship(
        &self,
        coach_id: &str,
        athlete_id: &str,
    ) -> Result<Option<CoachAthleteRelationship>, AppError> {
        let coach_id = coach_id.to_string();
        let athlete_id = athlete_id.to_string();

        let found: Vec<CoachAthleteRelationship> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::COACH_ATHLETE)
            .filter(move |q| {
                q.for_all([
                    q.field("coachId").eq(coach_id.clone()),
                    q.field("athleteId").eq(athlete_id.clone()),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(found.into_iter().next())
    }

    pub async fn relationships_for_coach(
        &self,
        coach_id: &str,
    ) -> Result<Vec<CoachAthleteRelationship>, AppError> {
        self.list_where_eq(collections::COACH_ATHLETE, "coachId", coach_id)
            .await
    }

    pub async fn relationships_for_athlete(
        &self,
        athlete_id: &str,
    ) -> Result<Vec<CoachAthleteRelationship>, AppError> {
        self.list_where_eq(collections::COACH_ATHLETE, "athleteId", athlete_id)
            .await
    }

    pub async fn list_relationships(&self) -> Result<Vec<CoachAthleteRelationship>, AppError> {
        self.list_all(collections::COACH_ATHLETE).await
    }

    pub async fn upsert_relationship(
        &self,
        relationship: &CoachAthleteRelationship,
    ) -> Result<(), AppError> {
        self.set_doc(collections::COACH_ATHLETE, &relationship.id, relationship)
            .await
    }

    pub async fn delete_relationship(&self, relationship_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::COACH_ATHLETE, relationship_id)
            .await
    }

    // ─── Daily Log Operations ────────────────────────────────────

    pub async fn get_daily_log(&self, log_id: &str) -> Result<Option<DailyLog>, AppError> {
        self.get_doc(collections::DAILY_LOGS, log_id).await
    }

    /// All logs for one athlete profile.
    ///
    /// Date filtering and ordering happen in the service so no composite
    /// index is needed.
    pub async fn daily_logs_for_athlete(
        &self,
        athlete_profile_id: &str,
    ) -> Result<Vec<DailyLog>, AppError> {
        self.list_where_eq(collections::DAILY_LOGS, "athleteId", athlete_profile_id)
            .await
    }

    pub async fn upsert_daily_log(&self, log: &DailyLog) -> Result<(), AppError> {
        self.set_doc(collections::DAILY_LOGS, &log.id, log).await
    }

    pub async fn delete_daily_log(&self, log_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::DAILY_LOGS, log_id).await
    }
}
