use thiserror::Error;

use super::principal::Role;

/// Failure taxonomy for token handling and principal resolution.
///
/// HTTP-agnostic; `crate::error::AppError` decides what a client sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Wrong segment count, undecodable base64, or undeserializable header/claims.
    #[error("malformed token")]
    MalformedToken,
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token expired")]
    TokenExpired,
    #[error("principal id must not be empty")]
    InvalidPrincipal,
    #[error("principal not found")]
    PrincipalNotFound,
    #[error("principal is inactive")]
    PrincipalInactive,
    #[error("role {required} required, principal has role {actual}")]
    RoleMismatch { required: Role, actual: Role },
    /// Store error or timeout. Fails the request closed; never retried.
    #[error("principal lookup failed: {0}")]
    PrincipalLookup(String),
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

impl AuthError {
    /// True for failures that mean "these credentials are no good", as opposed
    /// to operational failures while checking them.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            AuthError::MalformedToken
                | AuthError::InvalidSignature
                | AuthError::TokenExpired
                | AuthError::PrincipalNotFound
                | AuthError::PrincipalInactive
        )
    }
}
