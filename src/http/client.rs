use std::fmt;
use std::time::{Duration, Instant};

use reqwest::Url;
use tracing::debug;

use super::request::ApiRequest;
use super::response::HttpResponse;
use crate::error::HarnessError;

/// An HTTP client bound to one base address and, once authenticated, one
/// bearer credential that is attached to every request.
pub struct Session {
    client: reqwest::Client,
    base_url: Url,
    bearer_token: Option<String>,
}

impl Session {
    /// Session without credentials, used for the login round-trip.
    pub fn anonymous(base_url: &str, timeout: Duration) -> Result<Self, HarnessError> {
        let base_url = parse_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            base_url,
            bearer_token: None,
        })
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }

    pub async fn execute(&self, request: &ApiRequest) -> Result<HttpResponse, HarnessError> {
        let url = self.resolve(request)?;
        debug!(method = %request.method, %url, "sending request");

        let mut req_builder = self.client.request(request.method.into(), url);
        if let Some(token) = &self.bearer_token {
            req_builder = req_builder.bearer_auth(token);
        }
        if request.method.allows_body()
            && let Some(body) = &request.body
        {
            req_builder = req_builder.json(body);
        }

        let started = Instant::now();
        let response = req_builder.send().await?;
        let elapsed = started.elapsed().as_millis();

        let status = response.status();
        let bytes = response.bytes().await?;
        let size_bytes = bytes.len();
        let body = String::from_utf8_lossy(&bytes).into_owned();
        debug!(status = status.as_u16(), duration_ms = elapsed as u64, size_bytes, "response received");

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            duration_ms: elapsed,
            size_bytes,
            body,
        })
    }

    fn resolve(&self, request: &ApiRequest) -> Result<Url, HarnessError> {
        let path = request.path.trim_start_matches('/');
        let mut url = self.base_url.join(path).map_err(|e| HarnessError::InvalidUrl {
            url: format!("{}{}", self.base_url, path),
            reason: e.to_string(),
        })?;

        if !request.query.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                query_pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!(
            base_url = %self.base_url,
            authenticated = self.is_authenticated(),
            "session released"
        );
    }
}

/// Parse the base address, forcing a trailing slash so relative joins keep
/// any path prefix.
fn parse_base_url(raw: &str) -> Result<Url, HarnessError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(HarnessError::InvalidUrl {
            url: raw.to_string(),
            reason: "base URL cannot be empty".to_string(),
        });
    }

    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };

    let url = Url::parse(&with_slash).map_err(|e| HarnessError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(HarnessError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme `{}`", url.scheme()),
        });
    }

    Ok(url)
}
