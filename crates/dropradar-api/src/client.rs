// DropRadar HTTP client
//
// Wraps `reqwest::Client` with base-URL construction, per-request
// deadlines, status classification and schema validation. Endpoint
// methods live in sibling modules (domains, stats, scan) as inherent
// impls.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{ErrorDetail, Validate};
use crate::transport::TransportConfig;

const API_PREFIX: &str = "api/v1";
const BODY_PREVIEW: usize = 200;

/// Raw HTTP client for the DropRadar backend.
///
/// All methods return validated response types. Transport failures,
/// non-2xx statuses and malformed bodies are folded into [`Error`] before
/// the caller sees them.
pub struct DropRadarClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    scan_timeout: Duration,
}

impl DropRadarClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root, e.g.
    /// `https://dropradar-production.up.railway.app`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, transport))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, transport: &TransportConfig) -> Self {
        Self {
            http,
            base_url,
            timeout: transport.timeout,
            scan_timeout: transport.scan_timeout(),
        }
    }

    /// Deadline applied to the scan endpoint.
    pub fn scan_timeout(&self) -> Duration {
        self.scan_timeout
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/v1/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let full = if path.is_empty() {
            format!("{base}/{API_PREFIX}")
        } else {
            format!("{base}/{API_PREFIX}/{path}")
        };
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request with optional query pairs.
    pub(crate) async fn get<T: DeserializeOwned + Validate>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!("GET {}", url);
        let builder = self.http.get(url).query(query);
        let resp = self.send(builder, self.timeout).await?;
        self.parse_response(resp, self.timeout).await
    }

    /// Send a POST request with a JSON body under the given deadline.
    pub(crate) async fn post<T: DeserializeOwned + Validate>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
        timeout: Duration,
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let builder = self.http.post(url).json(body);
        let resp = self.send(builder, timeout).await?;
        self.parse_response(resp, timeout).await
    }

    /// Send a DELETE request.
    pub(crate) async fn delete<T: DeserializeOwned + Validate>(&self, url: Url) -> Result<T, Error> {
        debug!("DELETE {}", url);
        let builder = self.http.delete(url);
        let resp = self.send(builder, self.timeout).await?;
        self.parse_response(resp, self.timeout).await
    }

    /// Default read deadline, for endpoint modules.
    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<reqwest::Response, Error> {
        builder
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(e, timeout))
    }

    /// Classify the status, then deserialize and validate the body.
    ///
    /// 404 maps to `Error::NotFound`, any other non-2xx to `Error::Http`
    /// with the FastAPI `detail` string when one is present.
    async fn parse_response<T: DeserializeOwned + Validate>(
        &self,
        resp: reqwest::Response,
        timeout: Duration,
    ) -> Result<T, Error> {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::from_reqwest(e, timeout))?;
        trace!(status = status.as_u16(), len = body.len(), "response received");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                message: error_message(&body),
            });
        }

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: T = serde_json::from_str(&body).map_err(|e| Error::Schema {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })?;

        parsed.validate().map_err(|message| Error::Schema {
            message,
            body: body.clone(),
        })?;

        Ok(parsed)
    }
}

/// Pull the FastAPI `detail` out of an error body, falling back to a
/// truncated raw preview.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorDetail>(body) {
        Ok(ErrorDetail {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorDetail { detail }) => detail.to_string(),
        Err(_) => preview(body).to_owned(),
    }
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(BODY_PREVIEW);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
