//! Endpoint probing: timed request, status and latency capture.

use crate::requester::SafeRequester;
use probewatch_core::{ProbeResult, ProbeTarget};
use reqwest::Method;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Runs health probes through a [`SafeRequester`].
///
/// `probe` never fails: mechanism errors become a `ProbeResult` with
/// `status_code == 0` and a populated `error`, so a scheduler can fan out
/// over an arbitrary target list without per-target error plumbing.
#[derive(Clone)]
pub struct EndpointProber {
    requester: SafeRequester,
}

impl EndpointProber {
    pub fn new(requester: SafeRequester) -> Self {
        Self { requester }
    }

    /// Probe one target with the given per-hop timeout.
    ///
    /// A response with any HTTP status — 4xx and 5xx included — is a
    /// successful observation of the target; only failures of the probing
    /// mechanism itself (validation rejection, DNS, refused connection,
    /// timeout, redirect limit) produce `status_code == 0`.
    pub async fn probe(&self, target: &ProbeTarget, timeout: Duration) -> ProbeResult {
        let method = match Method::from_bytes(target.method.as_bytes()) {
            Ok(method) => method,
            Err(_) => {
                // Probing with a substitute method would report the health
                // of a request nobody configured.
                warn!(url = %target.url, method = %target.method, "invalid HTTP method");
                return ProbeResult {
                    status_code: 0,
                    latency: Duration::ZERO,
                    error: Some(format!("invalid HTTP method \"{}\"", target.method)),
                };
            }
        };
        let start = Instant::now();

        match self
            .requester
            .execute(method, &target.url, &[], timeout)
            .await
        {
            Ok(response) => {
                let latency = start.elapsed();
                debug!(url = %target.url, status = response.status, ?latency, "probe completed");
                ProbeResult {
                    status_code: response.status,
                    latency,
                    error: None,
                }
            }
            Err(err) => {
                let latency = start.elapsed();
                warn!(url = %target.url, %err, "probe failed");
                ProbeResult {
                    status_code: 0,
                    latency,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::transport::{HttpResponse, HttpTransport};
    use async_trait::async_trait;
    use probewatch_core::{RedirectLimit, StaticResolver, TargetPolicy, UrlValidator};
    use std::collections::HashMap;
    use std::sync::Arc;
    use url::Url;

    struct FixedTransport(Result<u16, &'static str>);

    #[async_trait]
    impl HttpTransport for FixedTransport {
        async fn send(
            &self,
            _method: &Method,
            _url: &Url,
            _headers: &[(String, String)],
            timeout: Duration,
        ) -> Result<HttpResponse, TransportError> {
            match self.0 {
                Ok(status) => Ok(HttpResponse {
                    status,
                    headers: HashMap::new(),
                    body: Vec::new(),
                }),
                Err("timeout") => Err(TransportError::Timeout(timeout)),
                Err(msg) => Err(TransportError::Connect(msg.to_string())),
            }
        }
    }

    fn prober(transport: FixedTransport) -> EndpointProber {
        let resolver =
            StaticResolver::new().insert("example.com", vec!["93.184.216.34".parse().unwrap()]);
        EndpointProber::new(SafeRequester::with_parts(
            UrlValidator::with_resolver(Arc::new(resolver), TargetPolicy::default()),
            Arc::new(transport),
            RedirectLimit::default(),
        ))
    }

    #[tokio::test]
    async fn healthy_target_reports_status_and_latency() {
        let p = prober(FixedTransport(Ok(200)));
        let result = p
            .probe(&ProbeTarget::new("https://example.com/"), Duration::from_secs(5))
            .await;
        assert_eq!(result.status_code, 200);
        assert!(result.error.is_none());
        assert!(result.latency > Duration::ZERO);
    }

    #[tokio::test]
    async fn error_status_is_an_observation_not_a_failure() {
        let p = prober(FixedTransport(Ok(503)));
        let result = p
            .probe(&ProbeTarget::new("https://example.com/"), Duration::from_secs(5))
            .await;
        assert_eq!(result.status_code, 503);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn mechanism_failure_yields_status_zero() {
        let p = prober(FixedTransport(Err("connection refused")));
        let result = p
            .probe(&ProbeTarget::new("https://example.com/"), Duration::from_secs(5))
            .await;
        assert_eq!(result.status_code, 0);
        assert!(result.error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn unsafe_target_yields_ssrf_error() {
        let p = prober(FixedTransport(Ok(200)));
        let result = p
            .probe(&ProbeTarget::new("http://169.254.169.254/"), Duration::from_secs(5))
            .await;
        assert_eq!(result.status_code, 0);
        let err = result.error.unwrap();
        assert!(err.contains("SSRF validation failed"), "{err}");
        assert!(err.contains("unsafe IP"), "{err}");
    }

    #[tokio::test]
    async fn invalid_method_is_a_mechanism_failure_not_a_get() {
        let p = prober(FixedTransport(Ok(200)));
        let target = ProbeTarget::new("https://example.com/").with_method("B@D");
        let result = p.probe(&target, Duration::from_secs(5)).await;
        assert_eq!(result.status_code, 0);
        let err = result.error.unwrap();
        assert!(err.contains("invalid HTTP method"), "{err}");
        assert!(err.contains("B@D"), "{err}");
    }

    #[tokio::test]
    async fn timeout_is_reported_in_the_error() {
        let p = prober(FixedTransport(Err("timeout")));
        let result = p
            .probe(&ProbeTarget::new("https://example.com/"), Duration::from_secs(2))
            .await;
        assert_eq!(result.status_code, 0);
        assert!(result.error.unwrap().contains("timed out"));
    }
}
