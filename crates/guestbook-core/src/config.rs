//! Configuration module
//!
//! This module provides configuration structures for the API and services,
//! including database, storage, approval token and retention settings.
//! Values come from the environment (optionally a `.env` file) with constant
//! defaults; `validate` enforces the cross-field rules.

use std::env;
use std::time::Duration;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const APPROVAL_TOKEN_MAX_AGE_HOURS: u64 = 7 * 24;
const REJECTED_RETENTION_DAYS: u32 = 7;
/// Upper bound for any retention window, configured or requested.
pub const MAX_RETENTION_DAYS: u32 = 36_500;
const CLEANUP_INTERVAL_SECS: u64 = 3600;
const STORAGE_QUOTA_BYTES: u64 = 1024 * 1024 * 1024;
const MIN_ADMIN_API_KEY_LEN: usize = 32;

/// Documented fallback for `APPROVAL_TOKEN_SECRET`. Refused in production.
pub const INSECURE_DEFAULT_TOKEN_SECRET: &str = "guestbook-insecure-default-secret-change-me";

/// Secret and lifetime for signed approval tokens.
#[derive(Clone)]
pub struct ApprovalTokenConfig {
    pub secret: String,
    pub max_age: Duration,
}

impl ApprovalTokenConfig {
    pub fn new(secret: impl Into<String>, max_age: Duration) -> Self {
        Self {
            secret: secret.into(),
            max_age,
        }
    }

    pub fn uses_insecure_default(&self) -> bool {
        self.secret == INSECURE_DEFAULT_TOKEN_SECRET
    }
}

impl std::fmt::Debug for ApprovalTokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalTokenConfig")
            .field("secret", &"<redacted>")
            .field("max_age", &self.max_age)
            .finish()
    }
}

impl Default for ApprovalTokenConfig {
    fn default() -> Self {
        Self {
            secret: INSECURE_DEFAULT_TOKEN_SECRET.to_string(),
            max_age: Duration::from_secs(APPROVAL_TOKEN_MAX_AGE_HOURS * 3600),
        }
    }
}

/// Retention policy for rejected content.
#[derive(Clone, Copy, Debug)]
pub struct RetentionConfig {
    pub rejected_retention_days: u32,
    /// Seconds between scheduled cleanup runs. 0 = disabled.
    pub cleanup_interval_secs: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            rejected_retention_days: REJECTED_RETENTION_DAYS,
            cleanup_interval_secs: CLEANUP_INTERVAL_SECS,
        }
    }
}

/// Server and database settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
}

/// Guestbook backend configuration
#[derive(Clone, Debug)]
pub struct GuestbookConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub storage_quota_bytes: u64,
    // Moderation
    pub approval_token: ApprovalTokenConfig,
    pub retention: RetentionConfig,
    pub admin_api_key: String,
    pub public_base_url: String,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<GuestbookConfig>);

impl Config {
    fn inner(&self) -> &GuestbookConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source (used by `from_env` and tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = GuestbookConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn storage_quota_bytes(&self) -> u64 {
        self.inner().storage_quota_bytes
    }

    pub fn approval_token(&self) -> &ApprovalTokenConfig {
        &self.inner().approval_token
    }

    pub fn retention(&self) -> RetentionConfig {
        self.inner().retention
    }

    pub fn admin_api_key(&self) -> &str {
        &self.inner().admin_api_key
    }

    pub fn public_base_url(&self) -> &str {
        &self.inner().public_base_url
    }
}

fn is_production(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

impl GuestbookConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let base = BaseConfig {
            server_port,
            cors_origins,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment,
        };

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(s) => s.parse()?,
            None => StorageBackend::Local,
        };

        let max_age_hours = lookup("APPROVAL_TOKEN_MAX_AGE_HOURS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(APPROVAL_TOKEN_MAX_AGE_HOURS);
        let approval_token = ApprovalTokenConfig {
            secret: lookup("APPROVAL_TOKEN_SECRET")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| INSECURE_DEFAULT_TOKEN_SECRET.to_string()),
            max_age: max_age_hours
                .checked_mul(3600)
                .map(Duration::from_secs)
                .ok_or_else(|| anyhow::anyhow!("APPROVAL_TOKEN_MAX_AGE_HOURS is too large"))?,
        };

        let retention = RetentionConfig {
            rejected_retention_days: lookup("REJECTED_RETENTION_DAYS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(REJECTED_RETENTION_DAYS),
            cleanup_interval_secs: lookup("CLEANUP_INTERVAL_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CLEANUP_INTERVAL_SECS),
        };

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", base.server_port));

        let config = GuestbookConfig {
            base,
            database_url: lookup("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            storage_backend,
            s3_bucket: lookup("S3_BUCKET"),
            s3_region: lookup("S3_REGION"),
            s3_endpoint: lookup("S3_ENDPOINT"),
            aws_region: lookup("AWS_REGION"),
            local_storage_path: lookup("LOCAL_STORAGE_PATH"),
            storage_quota_bytes: lookup("STORAGE_QUOTA_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(STORAGE_QUOTA_BYTES),
            approval_token,
            retention,
            admin_api_key: lookup("ADMIN_API_KEY")
                .ok_or_else(|| anyhow::anyhow!("ADMIN_API_KEY must be set for admin routes"))?,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let production = is_production(&self.base.environment);

        if production && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.admin_api_key.len() < MIN_ADMIN_API_KEY_LEN {
            return Err(anyhow::anyhow!(
                "ADMIN_API_KEY must be at least {} characters long",
                MIN_ADMIN_API_KEY_LEN
            ));
        }

        if production && self.approval_token.uses_insecure_default() {
            return Err(anyhow::anyhow!(
                "APPROVAL_TOKEN_SECRET must be set in production"
            ));
        }

        if self.approval_token.max_age.is_zero() {
            return Err(anyhow::anyhow!(
                "APPROVAL_TOKEN_MAX_AGE_HOURS must be greater than zero"
            ));
        }

        if self.retention.rejected_retention_days > MAX_RETENTION_DAYS {
            return Err(anyhow::anyhow!(
                "REJECTED_RETENTION_DAYS must be at most {}",
                MAX_RETENTION_DAYS
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
