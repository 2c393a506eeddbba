//! Probe configuration.
//!
//! A flat, serde-friendly block that a monitor daemon can embed in its own
//! config file, plus constructors that turn it into wired-up components.

use crate::cert::CertificateInspector;
use crate::content::ContentMatcher;
use crate::error::RequestError;
use crate::prober::EndpointProber;
use crate::requester::SafeRequester;
use probewatch_core::{RedirectLimit, RedirectLimitError, TargetPolicy, UrlValidator};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// A configuration value that cannot be turned into working components.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    RedirectLimit(#[from] RedirectLimitError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] RequestError),
}

/// Tunables for outbound probing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    /// Per-request timeout in seconds, applied to every hop of a redirect
    /// chain individually.
    pub timeout_secs: u64,
    /// TCP connect and TLS handshake timeout for certificate inspection.
    pub connect_timeout_secs: u64,
    /// Maximum redirects to follow before giving up.
    pub max_redirects: u32,
    /// Permit targets that resolve to loopback. Off in production; test
    /// harnesses and local development turn it on.
    pub allow_loopback: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            connect_timeout_secs: 5,
            max_redirects: RedirectLimit::default().count(),
            allow_loopback: false,
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn policy(&self) -> TargetPolicy {
        if self.allow_loopback {
            TargetPolicy::loopback_allowed()
        } else {
            TargetPolicy::strict()
        }
    }

    pub fn redirect_limit(&self) -> Result<RedirectLimit, RedirectLimitError> {
        RedirectLimit::new(self.max_redirects)
    }

    fn requester(&self) -> Result<SafeRequester, ConfigError> {
        Ok(SafeRequester::new(self.policy())?.with_max_redirects(self.redirect_limit()?))
    }

    pub fn build_prober(&self) -> Result<EndpointProber, ConfigError> {
        Ok(EndpointProber::new(self.requester()?))
    }

    pub fn build_matcher(&self) -> Result<ContentMatcher, ConfigError> {
        Ok(ContentMatcher::new(self.requester()?))
    }

    pub fn build_inspector(&self) -> CertificateInspector {
        CertificateInspector::with_validator(UrlValidator::new(self.policy()))
            .with_connect_timeout(self.connect_timeout())
    }
}
