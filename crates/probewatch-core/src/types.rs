//! Plain data exchanged with the scheduler/storage collaborators.
//!
//! Everything here is created fresh per probe call, handed to the caller by
//! value, and serializable to JSON for storage and dashboards. No type in
//! this module holds shared mutable state.

use crate::classify::IpClass;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// One configured monitor target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeTarget {
    /// URL to probe. Must be http or https.
    pub url: String,
    /// HTTP method, uppercase. Defaults to GET.
    #[serde(default = "default_method")]
    pub method: String,
    /// Optional regex to run against the response body of a content check.
    #[serde(default)]
    pub content_pattern: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl ProbeTarget {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: default_method(),
            content_pattern: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into().to_uppercase();
        self
    }

    pub fn with_content_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.content_pattern = Some(pattern.into());
        self
    }
}

/// Address family of a DNS answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressFamily {
    V4,
    V6,
}

/// One DNS answer with its derived classification. Produced per validation
/// call and discarded with it; never cached across hops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    pub ip: IpAddr,
    pub family: AddressFamily,
    pub class: IpClass,
}

impl ResolvedAddress {
    pub fn new(ip: IpAddr, class: IpClass) -> Self {
        let family = match ip {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        };
        Self { ip, family, class }
    }
}

/// Outcome of one HTTP probe.
///
/// `status_code == 0` means the probing mechanism itself failed (validation
/// rejection, DNS failure, refused connection, timeout, redirect limit) and
/// `error` says why. Any real HTTP status, 4xx and 5xx included, is a valid
/// observation with `error == None` — downstream alerting relies on that
/// distinction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub status_code: u16,
    pub latency: Duration,
    pub error: Option<String>,
}

/// Outcome of a TLS certificate inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateStatus {
    /// Days until `notAfter`, floored; negative once expired. `None` when
    /// the inspection failed.
    pub days_to_expiry: Option<i64>,
    pub error: Option<String>,
}

/// Outcome of a content pattern check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMatchResult {
    pub matched: bool,
    pub error: Option<String>,
}
