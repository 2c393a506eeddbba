//! Guarded request execution with bounded, validated redirect following.

use crate::error::RequestError;
use crate::transport::{HttpResponse, HttpTransport, ReqwestTransport};
use probewatch_core::{RedirectLimit, TargetPolicy, UrlValidator};
use reqwest::Method;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Executes HTTP requests against validated targets only.
///
/// The invariant this type exists for: no request is ever issued to a URL
/// that was not validated immediately beforehand. Automatic redirect
/// following stays disabled at the transport; each Location target is
/// resolved against the current URL and pushed back through the validator
/// before the next hop connects.
#[derive(Clone)]
pub struct SafeRequester {
    validator: UrlValidator,
    transport: Arc<dyn HttpTransport>,
    max_redirects: RedirectLimit,
}

impl SafeRequester {
    /// Production requester: system resolver, reqwest transport, default
    /// redirect limit of 5.
    pub fn new(policy: TargetPolicy) -> Result<Self, RequestError> {
        Ok(Self {
            validator: UrlValidator::new(policy),
            transport: Arc::new(ReqwestTransport::new()?),
            max_redirects: RedirectLimit::default(),
        })
    }

    /// Requester assembled from explicit parts. The tests use this to plug
    /// in static resolvers and scripted transports.
    pub fn with_parts(
        validator: UrlValidator,
        transport: Arc<dyn HttpTransport>,
        max_redirects: RedirectLimit,
    ) -> Self {
        Self {
            validator,
            transport,
            max_redirects,
        }
    }

    pub fn with_max_redirects(mut self, max_redirects: RedirectLimit) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn validator(&self) -> &UrlValidator {
        &self.validator
    }

    /// Perform one request, following at most `max_redirects` redirects.
    ///
    /// Every hop is validated before its network call; a validation failure
    /// anywhere in the chain aborts the whole request without touching the
    /// rejected address. The timeout applies per hop, not to the chain as
    /// a whole.
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        headers: &[(String, String)],
        timeout: std::time::Duration,
    ) -> Result<HttpResponse, RequestError> {
        let mut current = Url::parse(url).map_err(|e| {
            RequestError::Validation(probewatch_core::ValidateError::InvalidUrl {
                reason: e.to_string(),
            })
        })?;
        let mut hops: u32 = 0;

        loop {
            let target = self.validator.validate_url(&current).await?;
            let response = self
                .transport
                .send(&method, target.url(), headers, timeout)
                .await?;

            let Some(location) = response.redirect_location() else {
                return Ok(response);
            };

            if hops >= self.max_redirects.count() {
                return Err(RequestError::TooManyRedirects {
                    limit: self.max_redirects.count(),
                });
            }

            // Handles absolute and relative Location values alike. The
            // joined URL is unvalidated until the next loop iteration.
            let next = current
                .join(location)
                .map_err(|e| RequestError::BadRedirect(format!("{location}: {e}")))?;

            hops += 1;
            debug!(hop = hops, from = %current, to = %next, "following redirect");
            current = next;
        }
    }
}
