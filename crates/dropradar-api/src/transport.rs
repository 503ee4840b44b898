// Shared transport configuration for building reqwest::Client instances.
//
// Read endpoints and the scan endpoint share one client but use different
// per-request deadlines: a scan makes the backend crawl third-party sources
// and routinely takes tens of seconds.

use std::time::Duration;

/// Scan deadlines below this are raised to it.
pub const MIN_SCAN_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("dropradar/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Deadline for list, stats, delete and notification calls.
    pub timeout: Duration,
    /// Deadline for `POST /scan`.
    pub scan_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            scan_timeout: Duration::from_secs(300),
        }
    }
}

impl TransportConfig {
    /// Build a config, clamping the scan deadline to [`MIN_SCAN_TIMEOUT`].
    pub fn new(timeout: Duration, scan_timeout: Duration) -> Self {
        Self {
            timeout,
            scan_timeout: scan_timeout.max(MIN_SCAN_TIMEOUT),
        }
    }

    /// The effective scan deadline.
    pub fn scan_timeout(&self) -> Duration {
        self.scan_timeout.max(MIN_SCAN_TIMEOUT)
    }

    /// Build a `reqwest::Client` from this config.
    ///
    /// No client-wide timeout is set; every request carries its own.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| crate::error::Error::ClientBuild(e.to_string()))
    }
}
