//! Claim set carried inside session tokens.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Claims signed into every session token.
///
/// Timestamps are RFC 3339 with sub-second precision, so TTLs shorter than a
/// second behave as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal identifier (users.id)
    #[serde(rename = "user_id")]
    pub principal_id: String,
    #[serde(rename = "iat", with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,
    /// Token is invalid strictly after this instant.
    #[serde(rename = "exp", with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl Claims {
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now > self.expires_at
    }
}
