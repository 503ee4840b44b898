//! View-model layer between `dropradar-api` and the CLI.
//!
//! - **[`Dashboard`]** owns the current domain list, its aggregate
//!   [`Stats`] and three request-state slots (`load`, `scan`, `mutate`).
//!   It runs refresh, scan, remove and clear-all against a [`Backend`],
//!   keeping the last-issued refresh authoritative even when responses
//!   arrive out of order. [`Dashboard::oneshot()`] wraps a single CLI
//!   invocation.
//!
//! - **[`Backend`]** is the seam to the remote service, implemented for
//!   [`dropradar_api::DropRadarClient`].
//!
//! - **Domain model** ([`model`]) holds the canonical types (`Domain`,
//!   `Stats`, `ScanMode`, ...); [`convert`] bridges the validated wire
//!   types into them.

pub mod backend;
pub mod config;
pub mod convert;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod store;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::Backend;
pub use config::{DEFAULT_API_URL, DashboardConfig, default_api_url};
pub use dashboard::{Dashboard, RefreshOutcome};
pub use error::{CoreError, FetchCause, Operation};
pub use store::{DashboardView, RequestState, Slot};

pub use model::{
    DEFAULT_LOW_SPAM_THRESHOLD, Domain, DomainId, DomainStatus, ScanMode, ScanOptions,
    ScanResult, Stats, StatsSource,
};

pub use dropradar_api::ListQuery;
