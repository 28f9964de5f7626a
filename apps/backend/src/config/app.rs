//! Process configuration loaded from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;
use crate::state::SecurityConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Development,
    Production,
    Test,
}

impl FromStr for RuntimeEnv {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(AppError::config(format!("unknown APP_ENV: {other:?}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub env: RuntimeEnv,
    pub security: SecurityConfig,
    /// `None` selects the in-memory principal store.
    pub database_url: Option<String>,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let env = match var("APP_ENV") {
            Some(raw) => raw.parse()?,
            None => RuntimeEnv::Development,
        };

        let host = var("THAPPY_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("THAPPY_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| AppError::config(format!("invalid THAPPY_PORT {raw:?}: {e}")))?,
            None => 8080,
        };

        let secret = var("JWT_SECRET")
            .ok_or_else(|| AppError::config("JWT_SECRET must be set".to_string()))?;

        let token_ttl = match var("JWT_TOKEN_TTL") {
            Some(raw) => parse_duration(&raw)
                .map_err(|e| AppError::config(format!("invalid JWT_TOKEN_TTL: {e}")))?,
            None => SecurityConfig::DEFAULT_TOKEN_TTL,
        };

        let lookup_timeout = match var("PRINCIPAL_LOOKUP_TIMEOUT") {
            Some(raw) => parse_duration(&raw)
                .map_err(|e| AppError::config(format!("invalid PRINCIPAL_LOOKUP_TIMEOUT: {e}")))?,
            None => SecurityConfig::DEFAULT_PRINCIPAL_LOOKUP_TIMEOUT,
        };

        let security = SecurityConfig::new(secret.into_bytes())
            .with_token_ttl(token_ttl)
            .with_principal_lookup_timeout(lookup_timeout);

        if env == RuntimeEnv::Production {
            security.validate_for_production()?;
        }

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|raw| raw.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            env,
            security,
            database_url: var("DATABASE_URL"),
            cors_allowed_origins,
        })
    }
}

/// Parse a humantime duration (`500ms`, `15m`, `24h`, `1h 30m`) or a bare
/// number of seconds.
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let s = raw.trim();
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return s
            .parse()
            .map(Duration::from_secs)
            .map_err(|e| format!("duration {raw:?} is out of range: {e}"));
    }
    humantime::parse_duration(s).map_err(|e| format!("invalid duration {raw:?}: {e}"))
}
