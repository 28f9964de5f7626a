//! Problem Details assertions
//!
//! Validates the stable error contract without depending on backend types:
//! status, `application/problem+json`, `x-trace-id` parity with the body, the
//! authentication headers each status class must (or must not) carry, and
//! the `code`/`detail` fields.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::{CONTENT_TYPE, RETRY_AFTER, WWW_AUTHENTICATE};
use actix_web::test;
use serde::Deserialize;

/// Mirror of the backend's ProblemDetails body.
#[derive(Debug, Deserialize)]
struct ProblemDetailsLike {
    #[serde(rename = "type")]
    type_: String,
    title: String,
    status: u16,
    detail: String,
    code: String,
    trace_id: String,
}

/// Assert that a response conforms to the error contract.
///
/// Header rules:
/// - 401: `WWW-Authenticate: Bearer`, no `Retry-After`
/// - 503: non-empty `Retry-After`, no `WWW-Authenticate`
/// - 403 and 4xx validation errors: neither header
pub async fn assert_problem_details<B: MessageBody>(
    resp: ServiceResponse<B>,
    expected_status: u16,
    expected_code: &str,
    expected_detail: &str,
) {
    assert_eq!(resp.status().as_u16(), expected_status);

    let headers = resp.headers().clone();

    let trace_id = headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header should be present and valid UTF-8")
        .to_string();
    assert!(!trace_id.is_empty(), "x-trace-id header should not be empty");

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "Content-Type must be application/problem+json (got {content_type})"
    );

    match expected_status {
        401 => {
            let www_auth = headers
                .get(WWW_AUTHENTICATE)
                .expect("401 responses must have WWW-Authenticate per RFC 7235");
            assert_eq!(www_auth.to_str().unwrap(), "Bearer");
            assert!(
                headers.get(RETRY_AFTER).is_none(),
                "401 responses must not have Retry-After"
            );
        }
        503 => {
            let retry_after = headers
                .get(RETRY_AFTER)
                .expect("503 responses must have Retry-After per RFC 7231");
            assert!(!retry_after.to_str().unwrap().is_empty());
            assert!(
                headers.get(WWW_AUTHENTICATE).is_none(),
                "503 responses must not have WWW-Authenticate"
            );
        }
        _ => {
            assert!(
                headers.get(WWW_AUTHENTICATE).is_none(),
                "{expected_status} responses must not have WWW-Authenticate"
            );
            assert!(
                headers.get(RETRY_AFTER).is_none(),
                "{expected_status} responses must not have Retry-After"
            );
        }
    }

    let body = test::read_body(resp).await;
    let body_str = std::str::from_utf8(&body).expect("Response body should be valid UTF-8");
    let problem: ProblemDetailsLike = serde_json::from_str(body_str)
        .unwrap_or_else(|_| panic!("Failed to parse body as ProblemDetails. Raw body: {body_str}"));

    assert_eq!(problem.status, expected_status);
    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.detail, expected_detail);
    assert!(!problem.title.is_empty(), "title should not be empty");
    assert!(
        problem.type_.starts_with("https://thappy.app/errors/"),
        "type should follow the expected URL format (got {})",
        problem.type_
    );
    assert_eq!(
        problem.trace_id, trace_id,
        "trace_id in body should match x-trace-id header"
    );
}
