// ── Aggregate statistics ──
//
// Either fetched from the backend or derived locally from the current
// domain list; a dashboard uses exactly one source (see `StatsSource`).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::domain::{Domain, DomainStatus};

/// Default exclusive upper bound for the "low spam" bucket.
pub const DEFAULT_LOW_SPAM_THRESHOLD: u32 = 5;

/// Where the dashboard's `Stats` come from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum StatsSource {
    /// `GET /api/v1/stats`, fetched alongside the list.
    #[default]
    Server,
    /// Computed from the fetched list with a configured threshold.
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total: u64,
    /// Mean authority score rounded to one decimal; 0 for an empty list.
    pub average_authority_score: f64,
    pub available_count: u64,
    /// Rows with `spam_score < threshold`.
    pub low_spam_count: u64,
}

impl Stats {
    /// All-zero stats, as shown after a clear or before the first load.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Derive stats from a domain list. The spam threshold is exclusive.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_domains(domains: &[Domain], low_spam_threshold: u32) -> Self {
        if domains.is_empty() {
            return Self::zero();
        }

        let total = domains.len() as u64;
        let authority_sum: u64 = domains.iter().map(|d| u64::from(d.authority_score)).sum();
        let mean = authority_sum as f64 / total as f64;

        Self {
            total,
            average_authority_score: (mean * 10.0).round() / 10.0,
            available_count: count_where(domains, |d| d.status == DomainStatus::Available),
            low_spam_count: count_where(domains, |d| d.spam_score < low_spam_threshold),
        }
    }
}

fn count_where(domains: &[Domain], pred: impl Fn(&Domain) -> bool) -> u64 {
    domains.iter().filter(|d| pred(d)).map(|_| 1u64).sum()
}
