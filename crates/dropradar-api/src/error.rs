use thiserror::Error;

/// Top-level error type for the `dropradar-api` crate.
///
/// Every endpoint call surfaces exactly one of these variants; a raw
/// `reqwest` failure is classified before it leaves the client.
/// `dropradar-core` maps them into operation-tagged diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── HTTP status ─────────────────────────────────────────────────
    /// Non-2xx response other than 404.
    #[error("Backend returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The backend answered 404 for the addressed resource.
    #[error("Not found: {message}")]
    NotFound { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// Response body did not match the pinned contract, with the raw body
    /// kept for debugging.
    #[error("Unexpected response shape: {message}")]
    Schema { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Classify a `reqwest` failure, promoting timeouts to [`Error::Timeout`].
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: std::time::Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                timeout_secs: timeout.as_secs(),
            }
        } else {
            Self::Transport(err)
        }
    }
}
