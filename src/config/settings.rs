//! Application settings loaded from environment variables.

use std::env;
use std::path::PathBuf;

use super::constants::{
    DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_NAME, DEFAULT_APP_ENV, DEFAULT_DATABASE_URL,
    DEFAULT_EMAIL_FROM, DEFAULT_FRONTEND_URL, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_JWT_REFRESH_EXPIRATION_DAYS, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PUBLIC_BASE_URL,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_UPLOAD_DIR, MIN_JWT_SECRET_LENGTH,
};

const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";
const DEV_JWT_REFRESH_SECRET: &str = "dev-refresh-secret-minimum-32-chars";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub app_env: String,
    pub database_url: String,
    /// Rate limiting and the Redis health probe are disabled without it
    pub redis_url: Option<String>,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    jwt_refresh_secret: String,
    pub jwt_refresh_expiration_days: i64,
    pub server_host: String,
    pub server_port: u16,
    pub frontend_url: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub public_base_url: String,
    pub email_from: String,
    pub admin_email: String,
    admin_password: Option<String>,
    pub admin_name: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("app_env", &self.app_env)
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("jwt_refresh_secret", &"[REDACTED]")
            .field("jwt_refresh_expiration_days", &self.jwt_refresh_expiration_days)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("frontend_url", &self.frontend_url)
            .field("upload_dir", &self.upload_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("public_base_url", &self.public_base_url)
            .field("email_from", &self.email_from)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if a JWT secret is not set in a release build or is too short.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = secret_from_env("JWT_SECRET", DEV_JWT_SECRET);
        let jwt_refresh_secret = secret_from_env("JWT_REFRESH_SECRET", DEV_JWT_REFRESH_SECRET);

        Self {
            app_env: env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_APP_ENV.to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            jwt_secret,
            jwt_expiration_hours: parse_or("JWT_EXPIRATION_HOURS", DEFAULT_JWT_EXPIRATION_HOURS),
            jwt_refresh_secret,
            jwt_refresh_expiration_days: parse_or(
                "JWT_REFRESH_EXPIRATION_DAYS",
                DEFAULT_JWT_REFRESH_EXPIRATION_DAYS,
            ),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_or("SERVER_PORT", DEFAULT_SERVER_PORT),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.to_string()),
            email_from: env::var("EMAIL_FROM").unwrap_or_else(|_| DEFAULT_EMAIL_FROM.to_string()),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string()),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            admin_name: env::var("ADMIN_NAME").unwrap_or_else(|_| DEFAULT_ADMIN_NAME.to_string()),
        }
    }

    /// Configuration for tests and the in-memory server: development
    /// secrets, no Redis, uploads under the system temp directory.
    pub fn for_tests() -> Self {
        Self {
            app_env: "test".to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            jwt_refresh_secret: DEV_JWT_REFRESH_SECRET.to_string(),
            jwt_refresh_expiration_days: DEFAULT_JWT_REFRESH_EXPIRATION_DAYS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            upload_dir: env::temp_dir().join("pg-nexus-uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            email_from: DEFAULT_EMAIL_FROM.to_string(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: None,
            admin_name: DEFAULT_ADMIN_NAME.to_string(),
        }
    }

    /// Get JWT secret bytes for access token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get JWT secret bytes for refresh and single-use tokens.
    pub fn jwt_refresh_secret_bytes(&self) -> &[u8] {
        self.jwt_refresh_secret.as_bytes()
    }

    /// Password for the seeded admin account, if configured.
    pub fn admin_password(&self) -> Option<&str> {
        self.admin_password.as_deref()
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}

fn secret_from_env(key: &str, dev_default: &str) -> String {
    let secret = env::var(key).unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            // Development mode: use default but warn
            tracing::warn!("{} not set, using insecure default for development", key);
            dev_default.to_string()
        } else {
            panic!("{} environment variable must be set in production", key);
        }
    });

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        panic!(
            "{} must be at least {} characters long",
            key, MIN_JWT_SECRET_LENGTH
        );
    }
    secret
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
