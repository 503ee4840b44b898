// ── Domain model ──
//
// Canonical types shared by the store and its consumers. Wire shapes live
// in `dropradar_api::models`; `crate::convert` bridges the two.

pub mod domain;
pub mod scan;
pub mod stats;

pub use domain::{Domain, DomainId, DomainStatus};
pub use scan::{ScanMode, ScanOptions, ScanResult};
pub use stats::{DEFAULT_LOW_SPAM_THRESHOLD, Stats, StatsSource};
