//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use dropradar_config::ConfigError;
use dropradar_core::{CoreError, FetchCause};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the DropRadar backend: {reason}")]
    #[diagnostic(
        code(dropradar::connection_failed),
        help(
            "Check that the backend is up and the URL is right.\n\
             Override it with --api-url or DROPRADAR_API_URL."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("{operation} timed out after {seconds}s")]
    #[diagnostic(
        code(dropradar::timeout),
        help("Raise the deadline with --timeout (or --scan-timeout for scans).")
    )]
    Timeout { operation: String, seconds: u64 },

    // ── Backend responses ────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(dropradar::api_error))]
    ApiError { message: String },

    #[error("Backend returned an unexpected response: {message}")]
    #[diagnostic(
        code(dropradar::invalid_response),
        help("The backend may be running an incompatible version.")
    )]
    InvalidResponse { message: String },

    #[error("Domain '{id}' not found")]
    #[diagnostic(
        code(dropradar::not_found),
        help("Run: dropradar domains list to see current ids")
    )]
    NotFound { id: String },

    #[error("A scan is already running")]
    #[diagnostic(
        code(dropradar::scan_in_progress),
        help("Wait for the current scan to finish.")
    )]
    ScanInProgress,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(dropradar::validation))]
    Validation { field: String, reason: String },

    #[error("No bark key configured for profile '{profile}'")]
    #[diagnostic(
        code(dropradar::no_bark_key),
        help(
            "Pass --bark-key, set DROPRADAR_BARK_KEY, or store one with:\n\
             dropradar config set-bark-key"
        )
    )]
    NoBarkKey { profile: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(dropradar::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: dropradar config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(dropradar::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(dropradar::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(dropradar::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(dropradar::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    #[diagnostic(code(dropradar::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ScanInProgress => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::NoBarkKey { .. }
            | Self::ProfileNotFound { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Fetch {
                cause: FetchCause::Transport,
                message,
                ..
            } => CliError::ConnectionFailed { reason: message },

            CoreError::Fetch {
                cause: FetchCause::Schema,
                message,
                operation,
                ..
            } => CliError::InvalidResponse {
                message: format!("{operation}: {message}"),
            },

            CoreError::Fetch {
                cause: FetchCause::Http,
                message,
                operation,
                ..
            } => CliError::ApiError {
                message: format!("{operation} failed: {message}"),
            },

            CoreError::Timeout {
                operation,
                timeout_secs,
            } => CliError::Timeout {
                operation: operation.to_string(),
                seconds: timeout_secs,
            },

            CoreError::NotFound { id } => CliError::NotFound { id },

            CoreError::ScanInProgress => CliError::ScanInProgress,

            CoreError::Config { message } => CliError::Config { message },

            err @ CoreError::Disposed => CliError::Internal(err.to_string()),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => {
                let available = dropradar_config::load_config_or_default()
                    .profiles
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>();
                CliError::ProfileNotFound {
                    name,
                    available: join_or_none(available),
                }
            }
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

/// Comma-joined names, or `(none)`.
pub fn join_or_none(mut names: Vec<String>) -> String {
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}
