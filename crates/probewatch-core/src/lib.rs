//! # Probewatch Core
//!
//! Address classification and SSRF-safe URL validation for the probewatch
//! probing client, plus the plain data model exchanged with scheduler and
//! storage collaborators.
//!
//! The validation layer performs no HTTP I/O of its own: it parses, resolves
//! and classifies, and hands a [`ValidatedTarget`] to the network layer in
//! `probewatch-probe`. Validation verdicts are never cached — the requester
//! calls back into [`UrlValidator`] for every redirect hop.

pub mod classify;
pub mod error;
pub mod policy;
pub mod resolver;
pub mod types;
pub mod validate;

pub use classify::{IpClass, classify};
pub use error::ValidateError;
pub use policy::{RedirectLimit, RedirectLimitError, TargetPolicy};
pub use resolver::{Resolver, StaticResolver, SystemResolver};
pub use types::{
    AddressFamily, CertificateStatus, ContentMatchResult, ProbeResult, ProbeTarget,
    ResolvedAddress,
};
pub use validate::{UrlValidator, ValidatedTarget};
