//! Typed principal identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::AuthError;

/// Opaque, non-empty principal identifier (the `users.id` column).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrincipalId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Account role. Closed set; stored as lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Therapist,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Therapist => "therapist",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0:?}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "therapist" => Ok(Role::Therapist),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// What the principal store knows about an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalRecord {
    pub id: PrincipalId,
    pub role: Role,
    pub active: bool,
}

impl PrincipalRecord {
    pub fn active(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: PrincipalId::new(id),
            role,
            active: true,
        }
    }
}

/// Request-scoped carrier inserted into request extensions once a request
/// has been authenticated. Presence means signature, expiry and account
/// status were all checked on this request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedPrincipal {
    pub id: PrincipalId,
    pub role: Role,
}

impl AuthenticatedPrincipal {
    /// Exact match only; there is no role hierarchy.
    pub fn require_role(&self, required: Role) -> Result<(), AuthError> {
        if self.role == required {
            Ok(())
        } else {
            Err(AuthError::RoleMismatch {
                required,
                actual: self.role,
            })
        }
    }
}

impl From<PrincipalRecord> for AuthenticatedPrincipal {
    fn from(record: PrincipalRecord) -> Self {
        Self {
            id: record.id,
            role: record.role,
        }
    }
}
