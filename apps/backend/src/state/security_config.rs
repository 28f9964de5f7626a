use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::error::AppError;

/// Well-known development default that must never reach production.
pub const PLACEHOLDER_SECRET: &str = "your-secret-key-change-in-production";

/// Minimum secret length accepted in production (bytes).
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Token signing secret. Cheap to clone, never printed.
#[derive(Clone)]
pub struct SecretKey(Arc<[u8]>);

impl SecretKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Arc::from(bytes.into()))
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey([REDACTED; {} bytes])", self.0.len())
    }
}

/// Session token settings, fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// HMAC secret for signing and verifying tokens
    pub secret: SecretKey,
    /// How long an issued token stays valid
    pub token_ttl: Duration,
    /// Upper bound on a single principal store lookup
    pub principal_lookup_timeout: Duration,
}

impl SecurityConfig {
    pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);
    pub const DEFAULT_PRINCIPAL_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

    /// Create a SecurityConfig with the given secret and default TTL/timeout.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: SecretKey::new(secret),
            token_ttl: Self::DEFAULT_TOKEN_TTL,
            principal_lookup_timeout: Self::DEFAULT_PRINCIPAL_LOOKUP_TIMEOUT,
        }
    }

    /// A config with a freshly generated secret. Tokens do not survive a
    /// restart, so this is for tests and local development only.
    pub fn ephemeral() -> Self {
        let secret = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        Self::new(secret.into_bytes())
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_principal_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.principal_lookup_timeout = timeout;
        self
    }

    /// Reject secrets that are unsafe for a production deployment.
    pub fn validate_for_production(&self) -> Result<(), AppError> {
        if self.secret.expose() == PLACEHOLDER_SECRET.as_bytes() {
            return Err(AppError::config(
                "JWT_SECRET must be changed from the placeholder default in production".to_string(),
            ));
        }
        if self.secret.expose().len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(AppError::config(format!(
                "JWT_SECRET must be at least {MIN_PRODUCTION_SECRET_LEN} bytes in production"
            )));
        }
        if self.token_ttl.is_zero() {
            return Err(AppError::config("JWT_TOKEN_TTL must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_never_prints_secret() {
        let config = SecurityConfig::new("super-secret-value".as_bytes());
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret-value"));
        assert!(printed.contains("REDACTED"));
    }

    #[test]
    fn test_defaults() {
        let config = SecurityConfig::new(b"k".to_vec());
        assert_eq!(config.token_ttl, Duration::from_secs(86_400));
        assert_eq!(config.principal_lookup_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_production_rejects_placeholder() {
        let config = SecurityConfig::new(PLACEHOLDER_SECRET.as_bytes());
        assert!(matches!(
            config.validate_for_production(),
            Err(AppError::Config { .. })
        ));
    }

    #[test]
    fn test_production_rejects_short_secret() {
        let config = SecurityConfig::new(b"short".to_vec());
        assert!(config.validate_for_production().is_err());
    }

    #[test]
    fn test_production_accepts_strong_secret() {
        assert!(SecurityConfig::ephemeral().validate_for_production().is_ok());
    }

    #[test]
    fn test_ephemeral_secrets_differ() {
        let a = SecurityConfig::ephemeral();
        let b = SecurityConfig::ephemeral();
        assert_ne!(a.secret.expose(), b.secret.expose());
    }
}
