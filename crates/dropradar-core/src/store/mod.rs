// ── Dashboard store ──
//
// Holds the view snapshot and the three request-state slots behind
// `watch` channels. Every write to the view goes through one
// `send_if_modified` call, so readers never see domains from one fetch
// next to stats from another.

mod state;
mod view;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::watch;

use crate::model::{Domain, DomainId, Stats};

pub use state::{RequestState, Slot};
pub use view::DashboardView;

/// Reactive storage for one dashboard.
pub(crate) struct DashboardStore {
    view: watch::Sender<DashboardView>,
    load: watch::Sender<RequestState>,
    scan: watch::Sender<RequestState>,
    mutate: watch::Sender<RequestState>,
    /// Generation of the newest refresh allowed to write the view.
    generation: AtomicU64,
}

impl DashboardStore {
    pub(crate) fn new() -> Self {
        let (view, _) = watch::channel(DashboardView::default());
        let (load, _) = watch::channel(RequestState::Idle);
        let (scan, _) = watch::channel(RequestState::Idle);
        let (mutate, _) = watch::channel(RequestState::Idle);

        Self {
            view,
            load,
            scan,
            mutate,
            generation: AtomicU64::new(0),
        }
    }

    fn slot(&self, slot: Slot) -> &watch::Sender<RequestState> {
        match slot {
            Slot::Load => &self.load,
            Slot::Scan => &self.scan,
            Slot::Mutate => &self.mutate,
        }
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub(crate) fn view(&self) -> DashboardView {
        self.view.borrow().clone()
    }

    pub(crate) fn subscribe_view(&self) -> watch::Receiver<DashboardView> {
        self.view.subscribe()
    }

    pub(crate) fn state(&self, slot: Slot) -> RequestState {
        self.slot(slot).borrow().clone()
    }

    pub(crate) fn subscribe_state(&self, slot: Slot) -> watch::Receiver<RequestState> {
        self.slot(slot).subscribe()
    }

    // ── Request state ───────────────────────────────────────────────

    pub(crate) fn set_state(&self, slot: Slot, state: RequestState) {
        self.slot(slot).send_replace(state);
    }

    /// Move a slot to `Pending` unless it already is. Returns `false` when
    /// another operation holds the slot.
    pub(crate) fn try_begin(&self, slot: Slot) -> bool {
        self.slot(slot).send_if_modified(|state| {
            if state.is_pending() {
                false
            } else {
                *state = RequestState::Pending;
                true
            }
        })
    }

    /// Return a `Pending` slot to `Idle`; settled states are kept.
    pub(crate) fn settle_pending(&self, slot: Slot) {
        self.slot(slot).send_if_modified(|state| {
            if state.is_pending() {
                *state = RequestState::Idle;
                true
            } else {
                false
            }
        });
    }

    // ── Refresh generations ─────────────────────────────────────────

    /// Start a new generation. Responses tagged with an older one are
    /// discarded by [`apply_snapshot`](Self::apply_snapshot).
    pub(crate) fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    // ── View writes ─────────────────────────────────────────────────

    /// Replace domains and stats together if `generation` is still the
    /// newest. Returns whether the snapshot was applied.
    pub(crate) fn apply_snapshot(&self, generation: u64, domains: Vec<Domain>, stats: Stats) -> bool {
        let mut payload = Some((domains, stats));
        self.view.send_if_modified(|view| {
            if !self.is_current(generation) {
                return false;
            }
            let Some((domains, stats)) = payload.take() else {
                return false;
            };
            view.domains = Arc::new(domains);
            view.stats = stats;
            view.loaded = true;
            view.updated_at = Some(Utc::now());
            true
        })
    }

    /// Drop one row without touching refresh generations. `restat` recomputes stats from the remaining rows
    /// with the given low-spam threshold; `None` leaves them untouched.
    pub(crate) fn remove_domain(&self, id: DomainId, restat: Option<u32>) -> bool {
        self.view.send_if_modified(|view| {
            if !view.domains.iter().any(|d| d.id == id) {
                return false;
            }
            let remaining: Vec<Domain> = view.domains.iter().filter(|d| d.id != id).cloned().collect();
            if let Some(threshold) = restat {
                view.stats = Stats::from_domains(&remaining, threshold);
            }
            view.domains = Arc::new(remaining);
            view.updated_at = Some(Utc::now());
            true
        })
    }

    /// Empty the list and zero the stats.
    pub(crate) fn clear(&self) {
        self.view.send_modify(|view| {
            view.domains = Arc::new(Vec::new());
            view.stats = Stats::zero();
            view.updated_at = Some(Utc::now());
        });
    }
}
