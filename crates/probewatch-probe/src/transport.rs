//! HTTP transport seam.
//!
//! The requester talks to the network through [`HttpTransport`] so tests can
//! substitute scripted responses and count exactly how many requests were
//! issued. The production implementation wraps reqwest with automatic
//! redirect following disabled — redirect handling belongs to the requester,
//! which must re-validate every hop.

use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::Method;
use reqwest::redirect::Policy;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("probewatch/", env!("CARGO_PKG_VERSION"));

/// One HTTP exchange's response, decoupled from the client library.
/// Header names are lowercased.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// A 3xx response with a Location header is a followable redirect;
    /// 3xx without Location is treated as a terminal response.
    pub fn redirect_location(&self) -> Option<&str> {
        if (300..400).contains(&self.status) {
            self.headers.get("location").map(String::as_str)
        } else {
            None
        }
    }
}

/// Issues a single HTTP request without following redirects.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        method: &Method,
        url: &Url,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        method: &Method,
        url: &Url,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .timeout(timeout);
        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(timeout)
            } else if e.is_connect() {
                TransportError::Connect(e.to_string())
            } else {
                TransportError::Other(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let mut header_map = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                header_map.insert(key.as_str().to_lowercase(), value.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(timeout)
                } else {
                    TransportError::Other(format!("failed to read response body: {e}"))
                }
            })?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers: header_map,
            body,
        })
    }
}
