//! Token wire format: `header.claims.signature`.
//!
//! Each segment is unpadded base64url. The header is the JWT header
//! `{"typ":"JWT","alg":"HS256"}`, the claims are [`Claims`] as JSON, and the
//! signature is HMAC-SHA256 over `header.claims` keyed by the process secret.
//! Encoding is deterministic: the same claims and secret always produce the
//! same bytes.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use jsonwebtoken::{Algorithm, Header};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use time::OffsetDateTime;

use super::claims::Claims;
use super::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

const SEPARATOR: char = '.';
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Serialize and sign `claims` with `secret`.
pub fn encode(claims: &Claims, secret: &[u8]) -> Result<String, AuthError> {
    let header = serde_json::to_vec(&Header::new(ALGORITHM))
        .map_err(|e| AuthError::Encoding(format!("failed to serialize header: {e}")))?;
    let payload = serde_json::to_vec(claims)
        .map_err(|e| AuthError::Encoding(format!("failed to serialize claims: {e}")))?;

    let mut token = String::with_capacity(256);
    URL_SAFE_NO_PAD.encode_string(header, &mut token);
    token.push(SEPARATOR);
    URL_SAFE_NO_PAD.encode_string(payload, &mut token);

    let signature = sign(token.as_bytes(), secret)?;
    token.push(SEPARATOR);
    URL_SAFE_NO_PAD.encode_string(signature, &mut token);

    Ok(token)
}

/// Verify `token` against `secret` and return its claims.
///
/// The signature is checked before anything inside the token is parsed, and
/// compared in constant time. Expiry is evaluated against `now`.
pub fn decode(token: &str, secret: &[u8], now: OffsetDateTime) -> Result<Claims, AuthError> {
    let segments: Vec<&str> = token.split(SEPARATOR).collect();
    let [header_b64, claims_b64, signature_b64] = segments.as_slice() else {
        return Err(AuthError::MalformedToken);
    };

    let signed_len = header_b64.len() + 1 + claims_b64.len();
    let expected = sign(token[..signed_len].as_bytes(), secret)?;
    let supplied = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AuthError::MalformedToken)?;

    if !bool::from(expected.as_slice().ct_eq(supplied.as_slice())) {
        return Err(AuthError::InvalidSignature);
    }

    let header: Header = decode_segment(header_b64)?;
    if header.alg != ALGORITHM {
        return Err(AuthError::MalformedToken);
    }

    let claims: Claims = decode_segment(claims_b64)?;
    if claims.principal_id.is_empty() {
        return Err(AuthError::MalformedToken);
    }

    if claims.is_expired_at(now) {
        return Err(AuthError::TokenExpired);
    }

    Ok(claims)
}

fn sign(message: &[u8], secret: &[u8]) -> Result<Vec<u8>, AuthError> {
    // HMAC accepts keys of any length; the error arm is unreachable in practice.
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AuthError::Encoding(format!("invalid hmac key: {e}")))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| AuthError::MalformedToken)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::MalformedToken)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use time::Duration;

    use super::*;

    const SECRET: &[u8] = b"test_secret_key_for_testing_purposes_only";

    fn claims() -> Claims {
        Claims {
            principal_id: "u-42".to_string(),
            issued_at: datetime!(2024-05-01 12:00:00 UTC),
            expires_at: datetime!(2024-05-02 12:00:00 UTC),
        }
    }

    fn within_ttl() -> OffsetDateTime {
        datetime!(2024-05-01 13:00:00 UTC)
    }

    fn forge(header: &str, claims: &str, secret: &[u8]) -> String {
        let mut token = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(claims)
        );
        let signature = sign(token.as_bytes(), secret).unwrap();
        token.push('.');
        token.push_str(&URL_SAFE_NO_PAD.encode(signature));
        token
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let token = encode(&claims(), SECRET).unwrap();
        let decoded = decode(&token, SECRET, within_ttl()).unwrap();
        assert_eq!(decoded, claims());
    }

    #[test]
    fn test_encoding_is_deterministic_and_url_safe() {
        let a = encode(&claims(), SECRET).unwrap();
        let b = encode(&claims(), SECRET).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.split('.').count(), 3);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'));
    }

    #[test]
    fn test_header_segment_is_jwt_hs256() {
        let token = encode(&claims(), SECRET).unwrap();
        let header_b64 = token.split('.').next().unwrap();
        let header = URL_SAFE_NO_PAD.decode(header_b64).unwrap();
        assert_eq!(header, br#"{"typ":"JWT","alg":"HS256"}"#);
    }

    #[test]
    fn test_wrong_segment_count_is_malformed() {
        for token in ["", "abc", "a.b", "a.b.c.d", "..."] {
            assert_eq!(
                decode(token, SECRET, within_ttl()),
                Err(AuthError::MalformedToken),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_empty_segments_are_rejected() {
        // ".." has three segments; the empty signature cannot match.
        assert_eq!(
            decode("..", SECRET, within_ttl()),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_undecodable_signature_is_malformed() {
        let token = encode(&claims(), SECRET).unwrap();
        let (signed, _) = token.rsplit_once('.').unwrap();
        let tampered = format!("{signed}.not*base64");
        assert_eq!(
            decode(&tampered, SECRET, within_ttl()),
            Err(AuthError::MalformedToken)
        );
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let token = encode(&claims(), b"secret-A").unwrap();
        assert_eq!(
            decode(&token, b"secret-B", within_ttl()),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_swapped_claims_is_invalid_signature() {
        let token = encode(&claims(), SECRET).unwrap();
        let mut other = claims();
        other.principal_id = "u-43".to_string();
        let other_token = encode(&other, SECRET).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other_token.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert_eq!(
            decode(&spliced, SECRET, within_ttl()),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_signed_garbage_claims_is_malformed() {
        let token = forge(r#"{"typ":"JWT","alg":"HS256"}"#, "not json", SECRET);
        assert_eq!(
            decode(&token, SECRET, within_ttl()),
            Err(AuthError::MalformedToken)
        );
    }

    #[test]
    fn test_signed_empty_principal_is_malformed() {
        let token = forge(
            r#"{"typ":"JWT","alg":"HS256"}"#,
            r#"{"user_id":"","iat":"2024-05-01T12:00:00Z","exp":"2024-05-02T12:00:00Z"}"#,
            SECRET,
        );
        assert_eq!(
            decode(&token, SECRET, within_ttl()),
            Err(AuthError::MalformedToken)
        );
    }

    #[test]
    fn test_unexpected_algorithm_is_malformed() {
        let token = forge(
            r#"{"typ":"JWT","alg":"HS512"}"#,
            r#"{"user_id":"u-42","iat":"2024-05-01T12:00:00Z","exp":"2024-05-02T12:00:00Z"}"#,
            SECRET,
        );
        assert_eq!(
            decode(&token, SECRET, within_ttl()),
            Err(AuthError::MalformedToken)
        );
    }

    #[test]
    fn test_expiry_boundary() {
        let token = encode(&claims(), SECRET).unwrap();
        let exp = claims().expires_at;

        assert!(decode(&token, SECRET, exp).is_ok());
        assert_eq!(
            decode(&token, SECRET, exp + Duration::milliseconds(1)),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn test_expired_with_wrong_secret_reports_signature() {
        // Signature is checked first, so an attacker learns nothing about expiry.
        let token = encode(&claims(), SECRET).unwrap();
        let long_after = claims().expires_at + Duration::days(30);
        assert_eq!(
            decode(&token, b"another-secret", long_after),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_matches_jsonwebtoken_encoding() {
        let ours = encode(&claims(), SECRET).unwrap();
        let theirs = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims(),
            &jsonwebtoken::EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(ours, theirs);
    }
}
