//! Bearer credential extraction from the `Authorization` header.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

const SCHEME: &str = "bearer";

/// Parse an `Authorization` value of the form `<scheme> <credential>`.
///
/// The scheme must be `bearer` (any case), separated from a non-empty
/// credential by exactly one space. Anything else yields `None`, which the
/// middleware treats the same as a missing header.
pub fn parse_bearer(value: &str) -> Option<&str> {
    let mut parts = value.split(' ');
    let scheme = parts.next()?;
    let credential = parts.next()?;

    if parts.next().is_some() || !scheme.eq_ignore_ascii_case(SCHEME) || credential.is_empty() {
        return None;
    }

    Some(credential)
}

/// Pull the bearer credential off a request's headers, if there is one.
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    parse_bearer(value).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use actix_web::http::header::{HeaderName, HeaderValue};

    use super::*;

    #[test]
    fn test_accepts_bearer_any_case() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(parse_bearer("bearer abc"), Some("abc"));
        assert_eq!(parse_bearer("BEARER abc"), Some("abc"));
    }

    #[test]
    fn test_rejects_other_shapes() {
        let rejected = [
            "",
            "Bearer",
            "Bearer ",
            "Token abc",
            "Basic abc123",
            "abc123",
            "Bearer  abc",
            "Bearer abc def",
            " Bearer abc",
            "Bearer\tabc",
        ];
        for value in rejected {
            assert_eq!(parse_bearer(value), None, "value {value:?}");
        }
    }

    #[test]
    fn test_wrong_scheme_same_as_missing_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert_eq!(extract_bearer(&headers), None);
    }

    #[test]
    fn test_extracts_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_static("Bearer t0k3n"),
        );
        assert_eq!(extract_bearer(&headers).as_deref(), Some("t0k3n"));
    }

    #[test]
    fn test_non_utf8_header_is_no_credential() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );
        assert_eq!(extract_bearer(&headers), None);
    }
}
