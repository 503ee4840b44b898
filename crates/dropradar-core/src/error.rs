// ── Core error types ──
//
// User-facing errors from dropradar-core. Consumers never see reqwest
// errors or serde failures directly: `CoreError::from_api` tags each
// transport-layer error with the operation that produced it.

use strum::Display;
use thiserror::Error;

/// The logical operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Operation {
    List,
    Stats,
    Scan,
    Delete,
    ClearAll,
    Notify,
}

/// Why a fetch failed, below the operation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FetchCause {
    /// Network unreachable, DNS, TLS, connection reset.
    Transport,
    /// Non-2xx status.
    Http,
    /// Body did not match the expected shape.
    Schema,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Request errors ───────────────────────────────────────────────
    #[error("{operation} request failed: {message}")]
    Fetch {
        operation: Operation,
        cause: FetchCause,
        /// HTTP status code (if applicable).
        status: Option<u16>,
        message: String,
    },

    #[error("{operation} request timed out after {timeout_secs}s")]
    Timeout {
        operation: Operation,
        timeout_secs: u64,
    },

    #[error("Domain not found: {id}")]
    NotFound { id: String },

    // ── State errors ─────────────────────────────────────────────────
    #[error("A scan is already running")]
    ScanInProgress,

    #[error("Dashboard has been disposed")]
    Disposed,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Tag a transport-layer error with the operation that produced it.
    pub fn from_api(operation: Operation, err: dropradar_api::Error) -> Self {
        use dropradar_api::Error as ApiError;

        match err {
            ApiError::Timeout { timeout_secs } => Self::Timeout {
                operation,
                timeout_secs,
            },
            ApiError::Http { status, message } => Self::Fetch {
                operation,
                cause: FetchCause::Http,
                status: Some(status),
                message: format!("HTTP {status}: {message}"),
            },
            ApiError::NotFound { message } => Self::Fetch {
                operation,
                cause: FetchCause::Http,
                status: Some(404),
                message: format!("HTTP 404: {message}"),
            },
            ApiError::Schema { message, .. } => Self::Fetch {
                operation,
                cause: FetchCause::Schema,
                status: None,
                message,
            },
            ApiError::Transport(e) => Self::Fetch {
                operation,
                cause: FetchCause::Transport,
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
            other @ (ApiError::InvalidUrl(_) | ApiError::ClientBuild(_)) => Self::Fetch {
                operation,
                cause: FetchCause::Transport,
                status: None,
                message: other.to_string(),
            },
        }
    }
}
