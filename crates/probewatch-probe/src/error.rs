//! Network-layer error types.
//!
//! All of these stay inside the crate's public entry points: `probe`,
//! `inspect` and `matches` fold them into their result values so a single
//! misbehaving target can never crash a monitoring fleet.

use probewatch_core::ValidateError;
use std::time::Duration;
use thiserror::Error;

/// Failure inside a single HTTP exchange, redirects excluded.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Other(String),
}

/// Failure of a guarded request, covering validation and the redirect loop.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("SSRF validation failed: {0}")]
    Validation(#[from] ValidateError),

    #[error("too many redirects (limit {limit})")]
    TooManyRedirects { limit: u32 },

    #[error("invalid redirect target: {0}")]
    BadRedirect(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failure while inspecting a TLS peer certificate. Isolated from the HTTP
/// probe path.
#[derive(Debug, Error)]
pub enum CertError {
    #[error("SSRF validation failed: {0}")]
    Validation(#[from] ValidateError),

    #[error("connect timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("TLS handshake failed: {0}")]
    Handshake(String),

    #[error("peer presented no certificate")]
    NoPeerCertificate,

    #[error("certificate parse failed: {0}")]
    Parse(String),
}
