//! Error codes for the Thappy API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and appear verbatim in responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication (401)
    /// No usable bearer credential on a route that requires one
    UnauthorizedMissingBearer,
    /// Malformed token or bad signature; deliberately not told apart
    UnauthorizedInvalidToken,
    /// Well-formed, correctly signed, but past its expiry
    UnauthorizedExpiredToken,
    /// Token is valid but the account is gone or deactivated
    UnauthorizedPrincipalNotFound,

    // Authorization (403)
    /// Authenticated, but the role does not satisfy the route
    ForbiddenRole,

    // Request Validation
    /// Principal id was empty when issuing a token
    InvalidPrincipal,

    // System Errors
    /// Principal store failed or timed out
    PrincipalLookupFailed,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Canonical string as it appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidToken => "UNAUTHORIZED_INVALID_TOKEN",
            Self::UnauthorizedExpiredToken => "UNAUTHORIZED_EXPIRED_TOKEN",
            Self::UnauthorizedPrincipalNotFound => "UNAUTHORIZED_PRINCIPAL_NOT_FOUND",

            Self::ForbiddenRole => "FORBIDDEN_ROLE",

            Self::InvalidPrincipal => "INVALID_PRINCIPAL",

            Self::PrincipalLookupFailed => "PRINCIPAL_LOOKUP_FAILED",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Every code, for exhaustiveness checks in tests.
    pub const ALL: [ErrorCode; 9] = [
        Self::UnauthorizedMissingBearer,
        Self::UnauthorizedInvalidToken,
        Self::UnauthorizedExpiredToken,
        Self::UnauthorizedPrincipalNotFound,
        Self::ForbiddenRole,
        Self::InvalidPrincipal,
        Self::PrincipalLookupFailed,
        Self::Internal,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
