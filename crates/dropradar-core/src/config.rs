// ── Dashboard configuration ──
//
// Everything needed to construct a `Dashboard`: where the backend lives,
// how long requests may take, and how stats are sourced.

use std::time::Duration;

use url::Url;

use dropradar_api::{ListQuery, TransportConfig};

use crate::model::{DEFAULT_LOW_SPAM_THRESHOLD, StatsSource};

/// Public backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://dropradar-production.up.railway.app";

/// Configuration for connecting a dashboard to a backend.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend root URL.
    pub api_url: Url,
    /// Read deadline for list/stats/delete calls.
    pub timeout: Duration,
    /// Deadline for scans. Raised to at least 30s by the transport.
    pub scan_timeout: Duration,
    /// Single source of truth for `Stats`.
    pub stats_source: StatsSource,
    /// Exclusive bound for the local low-spam bucket.
    pub low_spam_threshold: u32,
    /// Filters applied to every list fetch.
    pub query: ListQuery,
    /// Background refresh interval in seconds (0 = disabled).
    pub refresh_interval_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: Duration::from_secs(30),
            scan_timeout: Duration::from_secs(300),
            stats_source: StatsSource::Server,
            low_spam_threshold: DEFAULT_LOW_SPAM_THRESHOLD,
            query: ListQuery::default(),
            refresh_interval_secs: 0,
        }
    }
}

impl DashboardConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::new(self.timeout, self.scan_timeout)
    }
}

/// Parsed [`DEFAULT_API_URL`].
pub fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).unwrap_or_else(|_| unreachable!("default API URL is valid"))
}
