//! Security event logging.
//!
//! Raw tokens and secrets never reach a log line. Tokens are identified by
//! a short blake3 fingerprint so repeated attempts can be correlated.

use tracing::{debug, error, info, warn};

use crate::auth::{AuthError, PrincipalId, Role};
use crate::trace_ctx;

const FINGERPRINT_HEX_LEN: usize = 16;

/// Stable, non-reversible identifier for a presented token.
pub fn token_fingerprint(token: &str) -> String {
    let hash = blake3::hash(token.as_bytes());
    hash.to_hex()[..FINGERPRINT_HEX_LEN].to_string()
}

/// A presented token failed verification.
///
/// Signature mismatches are the interesting case (forgery or a rotated key);
/// malformed and expired tokens are routine client noise.
pub fn token_rejected(err: &AuthError, token: &str) {
    let trace_id = trace_ctx::trace_id();
    let token_fp = token_fingerprint(token);

    match err {
        AuthError::InvalidSignature => warn!(
            event = "SECURITY_TOKEN_INVALID_SIGNATURE",
            %trace_id,
            %token_fp,
            "Token signature mismatch"
        ),
        AuthError::TokenExpired => info!(
            event = "SECURITY_TOKEN_EXPIRED",
            %trace_id,
            %token_fp,
            "Expired token presented"
        ),
        other => debug!(
            event = "SECURITY_TOKEN_REJECTED",
            %trace_id,
            %token_fp,
            reason = %other,
            "Token rejected"
        ),
    }
}

/// A validly signed token named an account that is gone or deactivated.
pub fn principal_rejected(principal_id: &PrincipalId, reason: &AuthError) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_PRINCIPAL_REJECTED",
        %trace_id,
        %principal_id,
        reason = %reason,
        "Principal rejected"
    );
}

pub fn principal_lookup_failed(principal_id: &PrincipalId, detail: &str) {
    let trace_id = trace_ctx::trace_id();

    error!(
        event = "PRINCIPAL_LOOKUP_FAILED",
        %trace_id,
        %principal_id,
        detail,
        "Principal lookup failed"
    );
}

pub fn role_denied(principal_id: &PrincipalId, required: Role, actual: Role) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_ROLE_DENIED",
        %trace_id,
        %principal_id,
        required = %required,
        actual = %actual,
        "Role requirement not met"
    );
}
