//! Validation error types.

use crate::classify::IpClass;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use thiserror::Error;

/// Errors raised while validating a probe target, always before any HTTP
/// request is issued for the hop in question.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidateError {
    #[error("invalid URL: {reason}")]
    InvalidUrl { reason: String },

    #[error("unsupported URL scheme: {scheme}")]
    InvalidScheme { scheme: String },

    #[error("URL has no host")]
    MissingHost,

    #[error("DNS resolution failed for {host}: {reason}")]
    Resolution { host: String, reason: String },

    #[error("unsafe IP {ip} ({class}) resolved for {host}")]
    UnsafeTarget {
        host: String,
        ip: IpAddr,
        class: IpClass,
    },
}
