// ── API-to-domain type conversions ──
//
// Bridges validated `dropradar_api` wire types into canonical
// `dropradar_core::model` types. Field names are normalized and loosely
// typed strings (status, timestamps) are parsed into strong types.

use chrono::{DateTime, NaiveDateTime};

use dropradar_api::{DomainRecord, ScanResponse, StatsResponse};

use crate::model::{Domain, DomainId, DomainStatus, ScanResult, Stats};

/// `created_at` is informational; unparseable values are dropped rather
/// than failing the whole list.
fn parse_created_at(raw: Option<&str>) -> Option<NaiveDateTime> {
    let raw = raw?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

impl From<DomainRecord> for Domain {
    fn from(r: DomainRecord) -> Self {
        Self {
            id: DomainId::from(r.id),
            status: DomainStatus::from_backend(&r.status),
            created_at: parse_created_at(r.created_at.as_deref()),
            name: r.name,
            authority_score: r.da_score,
            backlinks: r.backlinks,
            spam_score: r.spam_score,
            drop_date: r.drop_date,
            tld: r.tld,
            length: r.length,
        }
    }
}

impl From<StatsResponse> for Stats {
    fn from(s: StatsResponse) -> Self {
        Self {
            total: s.total,
            average_authority_score: s.avg_da,
            available_count: s.available,
            low_spam_count: s.low_spam,
        }
    }
}

impl From<ScanResponse> for ScanResult {
    fn from(s: ScanResponse) -> Self {
        Self {
            status: s.status,
            domains_found: s.domains_found,
            message: s.message,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    #[test]
    fn domain_record_maps_to_domain() {
        let record: DomainRecord = serde_json::from_value(json!({
            "id": 3,
            "name": "gpt5.io",
            "da_score": 52,
            "backlinks": 2100,
            "spam_score": 2,
            "status": "Auction",
            "drop_date": "2025-12-04",
            "tld": ".io",
            "length": 4,
            "created_at": "2025-12-01T10:00:00.123456"
        }))
        .unwrap();

        let domain = Domain::from(record);
        assert_eq!(domain.id, DomainId::from(3));
        assert_eq!(domain.authority_score, 52);
        assert_eq!(domain.backlinks, 2100);
        assert_eq!(domain.status, DomainStatus::Auction);
        assert_eq!(domain.drop_date, NaiveDate::from_ymd_opt(2025, 12, 4));
        assert!(domain.created_at.is_some());
    }

    #[test]
    fn created_at_accepts_common_shapes() {
        assert!(parse_created_at(Some("2025-12-01T10:00:00Z")).is_some());
        assert!(parse_created_at(Some("2025-12-01 10:00:00")).is_some());
        assert!(parse_created_at(Some("yesterday")).is_none());
        assert!(parse_created_at(None).is_none());
    }

    #[test]
    fn stats_response_maps_field_names() {
        let stats = Stats::from(StatsResponse {
            total: 4,
            avg_da: 41.5,
            available: 2,
            low_spam: 1,
        });
        assert_eq!(stats.total, 4);
        assert_eq!(stats.available_count, 2);
        assert_eq!(stats.low_spam_count, 1);
    }
}
