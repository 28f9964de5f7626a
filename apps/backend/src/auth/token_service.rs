use std::time::Duration;

use time::OffsetDateTime;
use tracing::debug;

use super::claims::Claims;
use super::codec;
use super::error::AuthError;
use super::principal::PrincipalId;
use crate::state::security_config::{SecretKey, SecurityConfig};

/// Issues and verifies session tokens with a fixed secret and TTL.
///
/// Holds only immutable configuration, so clones can be shared freely across
/// workers without synchronization.
#[derive(Debug, Clone)]
pub struct TokenService {
    secret: SecretKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            secret: security.secret.clone(),
            ttl: security.token_ttl,
        }
    }

    /// Mint a token for `principal_id`, valid for the configured TTL from now.
    pub fn issue(&self, principal_id: &str) -> Result<String, AuthError> {
        self.issue_at(principal_id, OffsetDateTime::now_utc())
    }

    /// Mint a token as if the current time were `now`.
    pub fn issue_at(&self, principal_id: &str, now: OffsetDateTime) -> Result<String, AuthError> {
        if principal_id.trim().is_empty() {
            return Err(AuthError::InvalidPrincipal);
        }

        let ttl = time::Duration::try_from(self.ttl)
            .map_err(|e| AuthError::Encoding(format!("token ttl out of range: {e}")))?;
        let expires_at = now
            .checked_add(ttl)
            .ok_or_else(|| AuthError::Encoding("token expiry out of range".to_string()))?;

        let claims = Claims {
            principal_id: principal_id.to_string(),
            issued_at: now,
            expires_at,
        };

        let token = codec::encode(&claims, self.secret.expose())?;
        debug!(principal_id, expires_at = %expires_at, "session token issued");
        Ok(token)
    }

    /// Verify `token` and return the principal it was issued to.
    ///
    /// Errors:
    /// - `TokenExpired` when signature and format are fine but `exp` has passed
    /// - `InvalidSignature` / `MalformedToken` for anything tampered or garbage
    pub fn verify(&self, token: &str) -> Result<PrincipalId, AuthError> {
        self.verify_at(token, OffsetDateTime::now_utc())
    }

    /// Verify `token` as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: OffsetDateTime) -> Result<PrincipalId, AuthError> {
        let claims = codec::decode(token, self.secret.expose(), now)?;
        Ok(PrincipalId::new(claims.principal_id))
    }
}
