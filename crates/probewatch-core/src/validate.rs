//! SSRF-safe URL validation.
//!
//! A [`ValidatedTarget`] can only be produced by [`UrlValidator::validate`],
//! so any code holding one knows that every address the hostname resolved
//! to was classified as safe *at that moment*. The verdict is deliberately
//! not cacheable across redirect hops: a hostname can round-robin between
//! safe and unsafe answers between lookups, so the requester re-validates
//! every hop just before connecting.

use crate::classify::{IpClass, classify};
use crate::error::ValidateError;
use crate::policy::TargetPolicy;
use crate::resolver::{Resolver, SystemResolver};
use crate::types::ResolvedAddress;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use url::{Host, Url};

/// A URL whose scheme, host and resolved addresses have all passed
/// validation. The inner URL is private so the type cannot be constructed
/// around the checks.
#[derive(Debug, Clone)]
pub struct ValidatedTarget {
    url: Url,
    addrs: Vec<ResolvedAddress>,
}

impl ValidatedTarget {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Every address the host resolved to, with classifications. All of
    /// them are non-rejected classes by construction.
    pub fn addresses(&self) -> &[ResolvedAddress] {
        &self.addrs
    }
}

impl fmt::Display for ValidatedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Validates probe URLs before any network I/O is performed against them.
#[derive(Clone)]
pub struct UrlValidator {
    resolver: Arc<dyn Resolver>,
    policy: TargetPolicy,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new(TargetPolicy::default())
    }
}

impl UrlValidator {
    /// Validator backed by the system resolver.
    pub fn new(policy: TargetPolicy) -> Self {
        Self {
            resolver: Arc::new(SystemResolver),
            policy,
        }
    }

    /// Validator with a custom resolver, for tests and hermetic embedders.
    pub fn with_resolver(resolver: Arc<dyn Resolver>, policy: TargetPolicy) -> Self {
        Self { resolver, policy }
    }

    pub fn policy(&self) -> TargetPolicy {
        self.policy
    }

    /// Validate a URL string: parse, check scheme and host, resolve the
    /// host across all address families, classify every answer. Fails if
    /// even one resolved address is unsafe — an attacker controlling DNS
    /// picks which answer a retry uses, so one bad answer taints the host.
    pub async fn validate(&self, url: &str) -> Result<ValidatedTarget, ValidateError> {
        let parsed = Url::parse(url).map_err(|e| ValidateError::InvalidUrl {
            reason: e.to_string(),
        })?;
        self.validate_url(&parsed).await
    }

    /// Validate an already-parsed URL. Used by the requester for redirect
    /// hops, where the Location header has been joined onto the previous
    /// URL and must be re-checked from scratch.
    pub async fn validate_url(&self, url: &Url) -> Result<ValidatedTarget, ValidateError> {
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ValidateError::InvalidScheme {
                    scheme: other.to_string(),
                });
            }
        }

        let host = url.host().ok_or(ValidateError::MissingHost)?;
        let host_str = host.to_string();
        let port = url.port_or_known_default().unwrap_or(80);

        let ips = match host {
            // IP-literal hosts skip DNS entirely.
            Host::Ipv4(ip) => vec![std::net::IpAddr::V4(ip)],
            Host::Ipv6(ip) => vec![std::net::IpAddr::V6(ip)],
            Host::Domain(name) => self.resolver.resolve(name, port).await.map_err(|e| {
                ValidateError::Resolution {
                    host: name.to_string(),
                    reason: e.to_string(),
                }
            })?,
        };

        if ips.is_empty() {
            return Err(ValidateError::Resolution {
                host: host_str,
                reason: "no address records".to_string(),
            });
        }

        let mut addrs = Vec::with_capacity(ips.len());
        for ip in ips {
            let class = classify(ip);
            if !self.is_acceptable(class) {
                warn!(host = %host_str, %ip, %class, "rejecting unsafe probe target");
                return Err(ValidateError::UnsafeTarget {
                    host: host_str,
                    ip,
                    class,
                });
            }
            addrs.push(ResolvedAddress::new(ip, class));
        }

        debug!(url = %url, addresses = addrs.len(), "target validated");
        Ok(ValidatedTarget {
            url: url.clone(),
            addrs,
        })
    }

    fn is_acceptable(&self, class: IpClass) -> bool {
        class.is_public() || (class == IpClass::Loopback && self.policy.allow_loopback)
    }
}
