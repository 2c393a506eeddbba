//! End-to-end probing against a local HTTP server.
//!
//! These run the production transport (reqwest with redirects disabled)
//! against wiremock. The target policy permits loopback so the validator
//! accepts the mock server's 127.0.0.1 address; everything else stays at
//! production defaults.

use probewatch_core::{ProbeTarget, RedirectLimit, TargetPolicy};
use probewatch_probe::{ContentMatcher, EndpointProber, SafeRequester};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn requester() -> SafeRequester {
    SafeRequester::new(TargetPolicy::loopback_allowed()).unwrap()
}

#[tokio::test]
async fn probe_reports_status_and_latency() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let prober = EndpointProber::new(requester());
    let target = ProbeTarget::new(format!("{}/health", server.uri()));
    let result = prober.probe(&target, TIMEOUT).await;

    assert_eq!(result.status_code, 200);
    assert!(result.error.is_none());
    assert!(result.latency > Duration::ZERO);
}

#[tokio::test]
async fn server_errors_are_observations_not_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let prober = EndpointProber::new(requester());
    let result = prober.probe(&ProbeTarget::new(server.uri()), TIMEOUT).await;

    assert_eq!(result.status_code, 503);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn configured_method_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let prober = EndpointProber::new(requester());
    let target = ProbeTarget::new(format!("{}/health", server.uri())).with_method("head");
    let result = prober.probe(&target, TIMEOUT).await;

    assert_eq!(result.status_code, 200);
}

#[tokio::test]
async fn redirect_chain_is_followed_to_the_final_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/interim"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/interim"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/final"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let prober = EndpointProber::new(requester());
    let target = ProbeTarget::new(format!("{}/old", server.uri()));
    let result = prober.probe(&target, TIMEOUT).await;

    assert_eq!(result.status_code, 200);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn redirect_loop_stops_at_the_limit() {
    let server = MockServer::start().await;
    // A self-redirect: with limit 2, the initial request plus two follows
    // means exactly three hits before the requester gives up.
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
        .expect(3)
        .mount(&server)
        .await;

    let requester = requester().with_max_redirects(RedirectLimit::new(2).unwrap());
    let prober = EndpointProber::new(requester);
    let target = ProbeTarget::new(format!("{}/loop", server.uri()));
    let result = prober.probe(&target, TIMEOUT).await;

    assert_eq!(result.status_code, 0);
    assert!(result.error.unwrap().contains("redirect"));
    server.verify().await;
}

#[tokio::test]
async fn redirect_to_private_address_is_never_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jump"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "http://10.255.255.1/steal"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let prober = EndpointProber::new(requester());
    let target = ProbeTarget::new(format!("{}/jump", server.uri()));
    let result = prober.probe(&target, TIMEOUT).await;

    assert_eq!(result.status_code, 0);
    let error = result.error.unwrap();
    assert!(error.contains("SSRF validation failed"), "{error}");
    assert!(error.contains("10.255.255.1"), "{error}");
}

#[tokio::test]
async fn content_pattern_matches_response_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("service OK, build 4711"))
        .mount(&server)
        .await;

    let matcher = ContentMatcher::new(requester());
    let url = format!("{}/status", server.uri());

    let hit = matcher.matches(&url, r"build \d+", TIMEOUT).await;
    assert!(hit.matched);
    assert!(hit.error.is_none());

    let miss = matcher.matches(&url, "MAINTENANCE", TIMEOUT).await;
    assert!(!miss.matched);
    assert!(miss.error.unwrap().contains("not found"));
}

#[tokio::test]
async fn content_check_requires_status_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("OK"))
        .mount(&server)
        .await;

    let matcher = ContentMatcher::new(requester());
    let result = matcher.matches(&server.uri(), "OK", TIMEOUT).await;

    assert!(!result.matched);
    assert!(result.error.unwrap().contains("500"));
}

#[tokio::test]
async fn strict_policy_rejects_the_mock_server_itself() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let prober = EndpointProber::new(SafeRequester::new(TargetPolicy::strict()).unwrap());
    let result = prober.probe(&ProbeTarget::new(server.uri()), TIMEOUT).await;

    assert_eq!(result.status_code, 0);
    assert!(result.error.unwrap().contains("SSRF validation failed"));
}
