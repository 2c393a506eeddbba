//! Content pattern checks against fetched response bodies.

use crate::requester::SafeRequester;
use probewatch_core::ContentMatchResult;
use regex::Regex;
use reqwest::Method;
use std::time::Duration;
use tracing::debug;

/// Runs a caller-supplied regex against a target's response body.
#[derive(Clone)]
pub struct ContentMatcher {
    requester: SafeRequester,
}

impl ContentMatcher {
    pub fn new(requester: SafeRequester) -> Self {
        Self { requester }
    }

    /// Fetch `url` and test `pattern` against the body.
    ///
    /// Only a 200 response is eligible for matching; any other status, and
    /// any request failure, yields `matched = false` with an explanatory
    /// error instead of propagating. An unmatched pattern is also reported
    /// through `error` so dashboards can show why the check went red.
    pub async fn matches(&self, url: &str, pattern: &str, timeout: Duration) -> ContentMatchResult {
        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(e) => {
                return ContentMatchResult {
                    matched: false,
                    error: Some(format!("invalid pattern: {e}")),
                };
            }
        };

        match self.requester.execute(Method::GET, url, &[], timeout).await {
            Ok(response) if response.status == 200 => {
                let body = String::from_utf8_lossy(&response.body);
                if regex.is_match(&body) {
                    debug!(url, pattern, "content pattern matched");
                    ContentMatchResult {
                        matched: true,
                        error: None,
                    }
                } else {
                    ContentMatchResult {
                        matched: false,
                        error: Some(format!("pattern \"{pattern}\" not found in response body")),
                    }
                }
            }
            Ok(response) => ContentMatchResult {
                matched: false,
                error: Some(format!("expected status 200, got {}", response.status)),
            },
            Err(err) => ContentMatchResult {
                matched: false,
                error: Some(err.to_string()),
            },
        }
    }
}
