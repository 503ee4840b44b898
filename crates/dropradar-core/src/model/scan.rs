// ── Scan request / result ──

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Backend data source for a scan.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Synthetic data, returns immediately.
    Mock,
    /// DomainsDB listing enriched with OpenPageRank scores.
    #[default]
    DomainsDb,
    /// ExpiredDomains.net (backend needs a session cookie configured).
    ExpiredDomains,
    /// Both real sources merged.
    Mixed,
}

/// Options for a single scan trigger.
#[derive(Debug, Default)]
pub struct ScanOptions {
    /// `None` lets the backend pick its default mode.
    pub mode: Option<ScanMode>,
    /// Bark device key for high-value push notifications.
    pub bark_key: Option<SecretString>,
}

/// Transient scan outcome, shown once and not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub status: String,
    pub domains_found: u64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn mode_wire_names() {
        let names: Vec<String> = ScanMode::iter().map(|m| m.as_ref().to_owned()).collect();
        assert_eq!(
            names.iter().map(String::as_str).collect::<Vec<_>>(),
            ["mock", "domainsdb", "expireddomains", "mixed"]
        );
        assert_eq!("DomainsDB".parse::<ScanMode>().ok(), Some(ScanMode::DomainsDb));
    }
}
