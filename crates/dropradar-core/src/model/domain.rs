// ── Domain entity ──
//
// One expiring/dropped domain with its SEO metrics. Ids are assigned by
// the backend and never change; a refresh replaces the whole list.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::form_urlencoded;

const REGISTRAR_SEARCH_URL: &str = "https://www.namecheap.com/domains/registration/results/";

/// Authority score at or above which a domain counts as high value.
pub const HIGH_VALUE_MIN_AUTHORITY: u32 = 40;
/// Spam score below which a high-authority domain counts as high value.
pub const HIGH_VALUE_MAX_SPAM: u32 = 10;

// ── DomainId ────────────────────────────────────────────────────────

/// Server-assigned row identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainId(u64);

impl DomainId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DomainId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u64> for DomainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// ── DomainStatus ────────────────────────────────────────────────────

/// Registration status as reported by the backend. Anything the backend
/// sends outside the three known states collapses to `Other`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    Available,
    Auction,
    Pending,
    #[default]
    Other,
}

impl DomainStatus {
    /// Parse a backend status string, never failing.
    pub fn from_backend(raw: &str) -> Self {
        raw.trim().parse().unwrap_or(Self::Other)
    }
}

// ── Domain ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub id: DomainId,
    /// Registrable domain name, e.g. `gemini4.com`.
    pub name: String,
    /// Third-party authority estimate, 0-100.
    pub authority_score: u32,
    pub backlinks: u64,
    /// Third-party spam likelihood, 0-100, lower is better.
    pub spam_score: u32,
    pub status: DomainStatus,
    pub drop_date: Option<NaiveDate>,
    pub tld: Option<String>,
    pub length: Option<u32>,
    pub created_at: Option<NaiveDateTime>,
}

impl Domain {
    /// Registrar search deep-link for this name.
    pub fn registration_url(&self) -> String {
        let encoded: String = form_urlencoded::byte_serialize(self.name.as_bytes()).collect();
        format!("{REGISTRAR_SEARCH_URL}?domain={encoded}")
    }

    /// Whether the backend would flag this domain in a scan notification.
    pub fn is_high_value(&self) -> bool {
        self.authority_score >= HIGH_VALUE_MIN_AUTHORITY && self.spam_score < HIGH_VALUE_MAX_SPAM
    }
}
