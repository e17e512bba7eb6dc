//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development.

use std::env;

/// Minimum accepted length of the JWT signing key, in bytes.
const MIN_SIGNING_KEY_LEN: usize = 32;

/// Longest accepted session token lifetime: one year.
pub const MAX_JWT_TTL_HOURS: i64 = 24 * 366;

/// Which storage backend the service runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Google Cloud Firestore (or the Firestore emulator).
    Firestore,
    /// In-process tables; data is lost on restart.
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(StorageBackend::Firestore),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::Invalid(
                "STORAGE_BACKEND",
                format!("unknown backend '{}'", s),
            )),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Storage backend selection
    pub storage: StorageBackend,
    /// GCP project ID (required for Firestore)
    pub gcp_project_id: Option<String>,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Session token lifetime in hours
    pub jwt_ttl_hours: i64,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            storage: StorageBackend::Memory,
            gcp_project_id: None,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!!".to_vec(),
            jwt_ttl_hours: 24,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let gcp_project_id = env::var("GCP_PROJECT_ID")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let storage = match env::var("STORAGE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) if gcp_project_id.is_some() => StorageBackend::Firestore,
            Err(_) => StorageBackend::Memory,
        };

        if storage == StorageBackend::Firestore && gcp_project_id.is_none() {
            return Err(ConfigError::Missing("GCP_PROJECT_ID"));
        }

        let jwt_signing_key = env::var("JWT_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
            .into_bytes();
        if jwt_signing_key.len() < MIN_SIGNING_KEY_LEN {
            return Err(ConfigError::Invalid(
                "JWT_SIGNING_KEY",
                format!("must be at least {} bytes", MIN_SIGNING_KEY_LEN),
            ));
        }

        let jwt_ttl_hours = match env::var("JWT_TTL_HOURS") {
            Ok(raw) => parse_ttl_hours(&raw)?,
            Err(_) => 24,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            storage,
            gcp_project_id,
            jwt_signing_key,
            jwt_ttl_hours,
        })
    }
}

fn parse_ttl_hours(raw: &str) -> Result<i64, ConfigError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|h| (1..=MAX_JWT_TTL_HOURS).contains(h))
        .ok_or_else(|| {
            ConfigError::Invalid(
                "JWT_TTL_HOURS",
                format!("must be an integer between 1 and {}", MAX_JWT_TTL_HOURS),
            )
        })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!!");
        env::set_var("STORAGE_BACKEND", "memory");
        env::set_var("JWT_TTL_HOURS", "12");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.jwt_ttl_hours, 12);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_ttl_hours_bounds() {
        assert_eq!(parse_ttl_hours(" 48 ").unwrap(), 48);
        assert_eq!(parse_ttl_hours("8784").unwrap(), MAX_JWT_TTL_HOURS);
        assert!(parse_ttl_hours("0").is_err());
        assert!(parse_ttl_hours("-3").is_err());
        assert!(parse_ttl_hours("8785").is_err());
        assert!(parse_ttl_hours(&(i64::MAX / 2).to_string()).is_err());
        assert!(parse_ttl_hours("soon").is_err());
    }

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!(
            "Firestore".parse::<StorageBackend>().unwrap(),
            StorageBackend::Firestore
        );
        assert_eq!(
            " memory ".parse::<StorageBackend>().unwrap(),
            StorageBackend::Memory
        );
        assert!("postgres".parse::<StorageBackend>().is_err());
    }
}
