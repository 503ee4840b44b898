// ── Dashboard view snapshot ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Domain, DomainId, Stats};

/// Immutable snapshot of what the dashboard shows. Domains and stats are
/// always written together, so a snapshot never mixes two fetches.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardView {
    pub domains: Arc<Vec<Domain>>,
    pub stats: Stats,
    /// `true` once any refresh has been applied.
    pub loaded: bool,
    /// When the current domains were last written.
    pub updated_at: Option<DateTime<Utc>>,
}

impl DashboardView {
    pub fn get(&self, id: DomainId) -> Option<&Domain> {
        self.domains.iter().find(|d| d.id == id)
    }

    pub fn contains(&self, id: DomainId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn high_value(&self) -> impl Iterator<Item = &Domain> {
        self.domains.iter().filter(|d| d.is_high_value())
    }
}
