//! SSRF-safe outbound probing for uptime monitors.
//!
//! Everything in this crate funnels through [`SafeRequester`]: URLs are
//! resolved and classified by `probewatch-core` before any connection is
//! made, automatic redirect following is disabled at the HTTP client, and
//! each redirect hop is re-validated from scratch.
//!
//! The three caller-facing components:
//!
//! * [`EndpointProber`] performs one HTTP request and reports status code
//!   and latency. Mechanism failures come back with `status_code == 0`.
//! * [`CertificateInspector`] opens a TLS connection and reports days until
//!   the peer certificate expires, including for expired or untrusted
//!   certificates.
//! * [`ContentMatcher`] fetches a body and runs a regex against it.
//!
//! All three never panic and never return `Err` to the probe loop; failures
//! are folded into their result types so one broken target cannot take down
//! a monitoring cycle.

pub mod cert;
pub mod config;
pub mod content;
pub mod error;
pub mod prober;
pub mod requester;
pub mod transport;

pub use cert::CertificateInspector;
pub use config::{ConfigError, ProbeConfig};
pub use content::ContentMatcher;
pub use error::{CertError, RequestError, TransportError};
pub use prober::EndpointProber;
pub use requester::SafeRequester;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
