// Wire types for the DropRadar backend.
//
// The backend has shipped several incompatible field spellings over time.
// These structs pin one contract (`da_score`, `backlinks`, `spam_score`,
// `drop_date`); bodies using any other spelling fail deserialization and
// surface as `Error::Schema`. Every response also passes a semantic
// `Validate` step before it reaches the caller.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Post-deserialization semantic checks. Returns a human-readable reason
/// on failure.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

// ── Domains ──────────────────────────────────────────────────────────

/// One domain row as returned by `GET /api/v1/domains`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    pub id: u64,
    pub name: String,
    pub da_score: u32,
    pub backlinks: u64,
    pub spam_score: u32,
    pub status: String,
    #[serde(default, with = "lenient_date")]
    pub drop_date: Option<NaiveDate>,
    #[serde(default)]
    pub tld: Option<String>,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Validate for DomainRecord {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err(format!("domain {} has an empty name", self.id));
        }
        if self.da_score > 100 {
            return Err(format!(
                "domain {} has da_score {} outside 0-100",
                self.name, self.da_score
            ));
        }
        if self.spam_score > 100 {
            return Err(format!(
                "domain {} has spam_score {} outside 0-100",
                self.name, self.spam_score
            ));
        }
        Ok(())
    }
}

/// Paged envelope around the domain list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainPage {
    pub domains: Vec<DomainRecord>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

impl Validate for DomainPage {
    fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::with_capacity(self.domains.len());
        for record in &self.domains {
            record.validate()?;
            if !seen.insert(record.id) {
                return Err(format!("duplicate domain id {}", record.id));
            }
        }
        Ok(())
    }
}

/// Server-side filters for the domain list. Unset fields are omitted from
/// the query string and the backend defaults apply (`skip=0`, `limit=100`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_da: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_spam: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ListQuery {
    /// Query-string pairs for the set fields, in a stable order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(skip) = self.skip {
            pairs.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(min_da) = self.min_da {
            pairs.push(("min_da", min_da.to_string()));
        }
        if let Some(max_spam) = self.max_spam {
            pairs.push(("max_spam", max_spam.to_string()));
        }
        if let Some(ref status) = self.status {
            pairs.push(("status", status.clone()));
        }
        pairs
    }
}

// ── Stats ────────────────────────────────────────────────────────────

/// Aggregates from `GET /api/v1/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total: u64,
    pub avg_da: f64,
    pub available: u64,
    pub low_spam: u64,
}

impl Validate for StatsResponse {
    fn validate(&self) -> Result<(), String> {
        if !self.avg_da.is_finite() || !(0.0..=100.0).contains(&self.avg_da) {
            return Err(format!("avg_da {} outside 0-100", self.avg_da));
        }
        if self.available > self.total {
            return Err(format!(
                "available count {} exceeds total {}",
                self.available, self.total
            ));
        }
        if self.low_spam > self.total {
            return Err(format!(
                "low_spam count {} exceeds total {}",
                self.low_spam, self.total
            ));
        }
        Ok(())
    }
}

// ── Scan / mutations / notifications ─────────────────────────────────

/// Body of `POST /api/v1/scan`.
#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct ScanRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bark_key: Option<&'a str>,
}

/// Outcome of `POST /api/v1/scan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub status: String,
    pub domains_found: u64,
    pub message: String,
}

impl Validate for ScanResponse {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// `{message}` acknowledgement returned by the delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub message: String,
}

impl Validate for MessageResponse {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Body of `POST /api/v1/test-notification`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct NotificationRequest<'a> {
    pub bark_key: &'a str,
}

/// Outcome of `POST /api/v1/test-notification`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub status: String,
    pub message: String,
}

impl Validate for NotificationResponse {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// FastAPI error body: `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub detail: serde_json::Value,
}

// ── Date handling ────────────────────────────────────────────────────

/// `drop_date` arrives as `YYYY-MM-DD`, as a full timestamp, or as null.
mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let date_part = raw.get(..10).unwrap_or(&raw);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid drop_date {raw:?}: {e}")))
    }
}
