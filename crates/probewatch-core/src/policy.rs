//! Validation policy knobs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Policy applied by [`crate::UrlValidator`].
///
/// The only exemption offered is for the loopback class, so test suites and
/// single-host deployments can probe services on 127.0.0.1. Private,
/// link-local and the other unsafe classes are never exemptable.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TargetPolicy {
    /// Accept targets resolving to loopback addresses. Defaults to `false`.
    #[serde(default)]
    pub allow_loopback: bool,
}

impl TargetPolicy {
    /// The default public-probing policy: loopback rejected.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Policy that accepts loopback targets.
    pub fn loopback_allowed() -> Self {
        Self {
            allow_loopback: true,
        }
    }
}

/// Validated redirect-hop limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RedirectLimit(u32);

impl RedirectLimit {
    /// Maximum allowed value.
    pub const MAX: u32 = 20;

    /// Create a validated limit. Zero is allowed and disables redirect
    /// following entirely.
    pub fn new(value: u32) -> Result<Self, RedirectLimitError> {
        if value > Self::MAX {
            return Err(RedirectLimitError::TooLarge {
                value,
                max: Self::MAX,
            });
        }
        Ok(RedirectLimit(value))
    }

    /// Get the hop count.
    pub fn count(&self) -> u32 {
        self.0
    }
}

impl Default for RedirectLimit {
    fn default() -> Self {
        RedirectLimit(5)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RedirectLimitError {
    #[error("redirect limit too large: {value} (max: {max})")]
    TooLarge { value: u32, max: u32 },
}
