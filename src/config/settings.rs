//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use super::constants::{
    DEFAULT_ARGON2_ITERATIONS, DEFAULT_ARGON2_MEMORY_KIB, DEFAULT_ARGON2_PARALLELISM,
    DEFAULT_DATABASE_URL, DEFAULT_HASH_TIMEOUT_MS, DEFAULT_REQUEST_TIMEOUT_MS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SESSION_EXPIRATION_HOURS,
    DEFAULT_STORE_TIMEOUT_MS, MIN_JWT_SECRET_LENGTH,
};
use crate::domain::PasswordPolicy;
use crate::errors::{AppError, AppResult};

/// Secret used by debug builds when `JWT_SECRET` is unset.
const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub session_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub store_timeout: Duration,
    pub hash_timeout: Duration,
    pub request_timeout: Duration,
    pub password_policy: PasswordPolicy,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("session_expiration_hours", &self.session_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("store_timeout", &self.store_timeout)
            .field("hash_timeout", &self.hash_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("password_policy", &self.password_policy)
            .finish()
    }
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    ///
    /// # Errors
    /// Fails if `JWT_SECRET` is missing in a release build, is shorter than
    /// the minimum length, or the Argon2 parameters are rejected.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            None => return Err(AppError::config("JWT_SECRET must be set in production")),
        };

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::config(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        let password_policy = PasswordPolicy {
            memory_kib: parse_or(&lookup, "ARGON2_MEMORY_KIB", DEFAULT_ARGON2_MEMORY_KIB),
            iterations: parse_or(&lookup, "ARGON2_ITERATIONS", DEFAULT_ARGON2_ITERATIONS),
            parallelism: parse_or(&lookup, "ARGON2_PARALLELISM", DEFAULT_ARGON2_PARALLELISM),
        };
        password_policy
            .validate()
            .map_err(|e| AppError::config(e.to_string()))?;

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            session_expiration_hours: parse_or(
                &lookup,
                "SESSION_EXPIRATION_HOURS",
                DEFAULT_SESSION_EXPIRATION_HOURS,
            ),
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", DEFAULT_SERVER_PORT),
            store_timeout: Duration::from_millis(parse_or(
                &lookup,
                "STORE_TIMEOUT_MS",
                DEFAULT_STORE_TIMEOUT_MS,
            )),
            hash_timeout: Duration::from_millis(parse_or(
                &lookup,
                "HASH_TIMEOUT_MS",
                DEFAULT_HASH_TIMEOUT_MS,
            )),
            request_timeout: Duration::from_millis(parse_or(
                &lookup,
                "REQUEST_TIMEOUT_MS",
                DEFAULT_REQUEST_TIMEOUT_MS,
            )),
            password_policy,
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

/// Parse `key` from the lookup, falling back to `default` when unset or malformed.
///
/// A value that is present but does not parse is logged before falling back.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = %raw, fallback = %default, "unparsable setting, using default");
            default
        }
    }
}
