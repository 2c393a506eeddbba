//! TLS certificate expiry inspection.
//!
//! Opens a raw TLS connection — independent of the HTTP probe path — and
//! reads the peer's leaf certificate to compute days until `notAfter`.
//!
//! Two deliberate choices here:
//!
//! * The TCP connection goes to the address that was just validated, not
//!   back through a second DNS lookup, closing the validate/connect TOCTOU
//!   gap (SNI still carries the hostname so virtual hosts present the right
//!   certificate).
//! * The verifier accepts any presented chain. Inspection answers "when
//!   does this certificate expire", which must keep working for expired or
//!   privately-signed certificates; trust enforcement stays on the HTTP
//!   probe path.

use crate::error::CertError;
use probewatch_core::{CertificateStatus, TargetPolicy, UrlValidator};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tracing::{debug, warn};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Reads peer certificates and reports days to expiry.
#[derive(Clone)]
pub struct CertificateInspector {
    validator: UrlValidator,
    connector: TlsConnector,
    connect_timeout: Duration,
}

impl CertificateInspector {
    pub fn new(policy: TargetPolicy) -> Self {
        Self::with_validator(UrlValidator::new(policy))
    }

    pub fn with_validator(validator: UrlValidator) -> Self {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = ClientConfig::builder_with_provider(provider.clone())
            .with_safe_default_protocol_versions()
            .expect("ring provider supports the default protocol versions")
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(ExpiryOnlyVerifier { provider }))
            .with_no_client_auth();

        Self {
            validator,
            connector: TlsConnector::from(Arc::new(config)),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Inspect the certificate presented by `url`'s host.
    ///
    /// Never fails: validation, connection, handshake and parse errors all
    /// come back as a `CertificateStatus` with `days_to_expiry: None` and a
    /// populated `error`.
    pub async fn inspect(&self, url: &str) -> CertificateStatus {
        match self.peer_expiry(url).await {
            Ok(days) => {
                debug!(url, days, "certificate inspected");
                CertificateStatus {
                    days_to_expiry: Some(days),
                    error: None,
                }
            }
            Err(err) => {
                warn!(url, %err, "certificate inspection failed");
                CertificateStatus {
                    days_to_expiry: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    async fn peer_expiry(&self, url: &str) -> Result<i64, CertError> {
        let target = self.validator.validate(url).await?;

        let host = target
            .url()
            .host_str()
            .ok_or_else(|| CertError::Connect("missing host".to_string()))?
            .trim_matches(['[', ']'])
            .to_string();
        // TLS always goes to 443 unless an https URL names another port.
        let port = if target.url().scheme() == "https" {
            target.url().port().unwrap_or(443)
        } else {
            443
        };

        // Connect to the validated address directly rather than
        // re-resolving the hostname.
        let addr = SocketAddr::new(target.addresses()[0].ip, port);
        let tcp = timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| CertError::Timeout(self.connect_timeout))?
            .map_err(|e| CertError::Connect(e.to_string()))?;

        let server_name = ServerName::try_from(host)
            .map_err(|e| CertError::Handshake(format!("invalid server name: {e}")))?;
        let tls = timeout(self.connect_timeout, self.connector.connect(server_name, tcp))
            .await
            .map_err(|_| CertError::Timeout(self.connect_timeout))?
            .map_err(|e| CertError::Handshake(e.to_string()))?;

        let (_, session) = tls.get_ref();
        let leaf = session
            .peer_certificates()
            .and_then(|certs| certs.first())
            .ok_or(CertError::NoPeerCertificate)?;

        days_to_expiry(leaf.as_ref())
    }
}

/// Parse a DER certificate and compute floored days until `notAfter`.
/// Negative once the certificate has expired, including within the first
/// day past expiry: a certificate that lapsed an hour ago is -1 days out,
/// never 0. `whole_days` truncates toward zero, so floor over seconds.
fn days_to_expiry(der: &[u8]) -> Result<i64, CertError> {
    let (_, cert) = x509_parser::parse_x509_certificate(der)
        .map_err(|e| CertError::Parse(e.to_string()))?;
    let not_after = cert.validity().not_after.to_datetime();
    let now = time::OffsetDateTime::now_utc();
    Ok((not_after - now).whole_seconds().div_euclid(86_400))
}

/// Accepts any peer chain; signature checks still run so the handshake is
/// real, but chain trust and validity windows are not enforced.
#[derive(Debug)]
struct ExpiryOnlyVerifier {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for ExpiryOnlyVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
