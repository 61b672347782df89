#![allow(dead_code)]

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::test;
use serde_json::Value;

// Logging is auto-installed for every test binary that pulls in `common`.
#[ctor::ctor]
fn init_logging() {
    session_test_support::logging::init();
}

/// Proptest config with `PROPTEST_CASES` honoured; defaults low for CI.
pub fn proptest_config() -> proptest::prelude::ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(32)
        .max(1);

    proptest::prelude::ProptestConfig {
        failure_persistence: None,
        cases,
        ..proptest::prelude::ProptestConfig::default()
    }
}

/// Check a response is an RFC 7807 problem with the given status and code.
pub async fn assert_problem(resp: ServiceResponse<BoxBody>, expected_status: u16, expected_code: &str) {
    assert_eq!(resp.status().as_u16(), expected_status);

    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.starts_with("application/problem+json"),
        "Content-Type must be application/problem+json (got {content_type})"
    );

    let body = test::read_body(resp).await;
    let problem: Value = serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "Failed to parse error body as ProblemDetails. Raw body: {}",
            String::from_utf8_lossy(&body)
        )
    });

    for key in ["type", "title", "status", "detail", "code"] {
        assert!(problem.get(key).is_some(), "{key} field should be present");
    }
    assert_eq!(problem["code"], expected_code);
    assert_eq!(problem["status"], expected_status);
}
