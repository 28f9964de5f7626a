mod common;

use actix_web::test;
use common::{build_app, TestHarness};
use serde_json::Value;

#[actix_web::test]
async fn test_health_endpoint_needs_no_auth() {
    let harness = TestHarness::new();
    let app = test::init_service(build_app(harness.state.clone())).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert!(body["app_version"].is_string());
}
