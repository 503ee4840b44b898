// ── Dashboard view-model ──
//
// Owns the backend handle and the reactive store, and runs every
// operation that changes them: refresh, scan, remove and clear-all.
// Refreshes are tagged with a generation and a cancellation token; only
// the newest generation may write the view.

use std::sync::{Arc, MutexGuard, PoisonError};
use std::time::Duration;

use secrecy::SecretString;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use dropradar_api::DropRadarClient;

use crate::backend::Backend;
use crate::config::DashboardConfig;
use crate::error::{CoreError, Operation};
use crate::model::{Domain, DomainId, ScanOptions, ScanResult, Stats, StatsSource};
use crate::store::{DashboardStore, DashboardView, RequestState, Slot};

/// How a finished `refresh()` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The response replaced domains and stats.
    Applied,
    /// A newer refresh or a confirmed mutation made this response stale;
    /// it was dropped without touching the view.
    Superseded,
}

// ── Dashboard ────────────────────────────────────────────────────

/// The view-model consumers drive.
///
/// Cheaply cloneable via `Arc<DashboardInner>`. Built with
/// [`new`](Self::new) or [`with_backend`](Self::with_backend), optionally
/// [`start`](Self::start)ed for periodic refresh, and torn down with
/// [`dispose`](Self::dispose).
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    backend: Arc<dyn Backend>,
    store: DashboardStore,
    /// Lifecycle token. Cancelled by `dispose()`.
    cancel: CancellationToken,
    /// Token of the refresh currently allowed to finish.
    inflight: std::sync::Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Dashboard {
    /// Build a dashboard talking to `config.api_url` over HTTP.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let client = DropRadarClient::new(config.api_url.clone(), &config.transport()).map_err(
            |e| CoreError::Config {
                message: e.to_string(),
            },
        )?;
        Ok(Self::with_backend(config, Arc::new(client)))
    }

    /// Build a dashboard over any [`Backend`].
    pub fn with_backend(config: DashboardConfig, backend: Arc<dyn Backend>) -> Self {
        let cancel = CancellationToken::new();
        let inflight = cancel.child_token();

        Self {
            inner: Arc::new(DashboardInner {
                config,
                backend,
                store: DashboardStore::new(),
                cancel,
                inflight: std::sync::Mutex::new(inflight),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Load the first snapshot and spawn the periodic refresh task when
    /// `refresh_interval_secs > 0`. The task keeps running even if the
    /// first load fails. Calling `start` again only refreshes.
    pub async fn start(&self) -> Result<RefreshOutcome, CoreError> {
        self.ensure_live()?;
        let interval_secs = self.inner.config.refresh_interval_secs;
        if interval_secs > 0 {
            let mut handles = self.inner.task_handles.lock().await;
            if handles.is_empty() {
                handles.push(tokio::spawn(refresh_task(
                    self.clone(),
                    interval_secs,
                    self.inner.cancel.clone(),
                )));
            } else {
                debug!("periodic refresh already running");
            }
        }
        self.refresh().await
    }

    /// Cancel in-flight work and background tasks, then wait for them.
    /// Every later operation fails with [`CoreError::Disposed`].
    pub async fn dispose(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        self.inner.store.settle_pending(Slot::Load);
        debug!("dashboard disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Run `f` against a dashboard that lives only for the call.
    ///
    /// Background refresh is disabled; the first snapshot is not loaded,
    /// so `f` decides which operations to run.
    pub async fn oneshot<F, Fut, T>(config: DashboardConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Dashboard) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.refresh_interval_secs = 0;

        let dashboard = Dashboard::new(cfg)?;
        let result = f(dashboard.clone()).await;
        dashboard.dispose().await;
        result
    }

    fn ensure_live(&self) -> Result<(), CoreError> {
        if self.is_disposed() {
            Err(CoreError::Disposed)
        } else {
            Ok(())
        }
    }

    // ── State observation ────────────────────────────────────────

    /// Current snapshot of domains and stats.
    pub fn view(&self) -> DashboardView {
        self.inner.store.view()
    }

    pub fn domains(&self) -> Arc<Vec<Domain>> {
        self.inner.store.view().domains
    }

    pub fn stats(&self) -> Stats {
        self.inner.store.view().stats
    }

    pub fn request_state(&self, slot: Slot) -> RequestState {
        self.inner.store.state(slot)
    }

    pub fn subscribe_view(&self) -> watch::Receiver<DashboardView> {
        self.inner.store.subscribe_view()
    }

    pub fn subscribe_state(&self, slot: Slot) -> watch::Receiver<RequestState> {
        self.inner.store.subscribe_state(slot)
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Fetch a fresh snapshot and apply it if no newer refresh or
    /// confirmed mutation has started in the meantime.
    ///
    /// On failure the previous domains and stats stay in place and the
    /// load slot records the reason.
    pub async fn refresh(&self) -> Result<RefreshOutcome, CoreError> {
        self.ensure_live()?;
        let store = &self.inner.store;

        let (generation, token) = {
            let mut inflight = self.lock_inflight();
            inflight.cancel();
            let token = self.inner.cancel.child_token();
            *inflight = token.clone();
            let generation = store.next_generation();
            store.set_state(Slot::Load, RequestState::Pending);
            (generation, token)
        };
        debug!(generation, "refresh started");

        let fetched = tokio::select! {
            biased;
            () = token.cancelled() => {
                if self.is_disposed() {
                    return Err(CoreError::Disposed);
                }
                debug!(generation, "refresh cancelled by a newer operation");
                return Ok(RefreshOutcome::Superseded);
            }
            result = self.fetch_snapshot() => result,
        };

        self.finish_refresh(generation, fetched)
    }

    /// Write a fetched snapshot (or its failure) if `generation` is still
    /// current. Generations only advance under the `inflight` lock, so
    /// holding it keeps the check and both writes together.
    fn finish_refresh(
        &self,
        generation: u64,
        fetched: Result<(Vec<Domain>, Stats), CoreError>,
    ) -> Result<RefreshOutcome, CoreError> {
        let store = &self.inner.store;
        let _inflight = self.lock_inflight();

        match fetched {
            Ok((domains, stats)) => {
                let count = domains.len();
                if store.apply_snapshot(generation, domains, stats) {
                    store.set_state(Slot::Load, RequestState::Success);
                    info!(generation, domains = count, "refresh applied");
                    Ok(RefreshOutcome::Applied)
                } else {
                    debug!(generation, "discarding stale refresh response");
                    Ok(RefreshOutcome::Superseded)
                }
            }
            Err(e) if !store.is_current(generation) => {
                debug!(generation, error = %e, "ignoring failure of stale refresh");
                Ok(RefreshOutcome::Superseded)
            }
            Err(e) => {
                store.set_state(Slot::Load, RequestState::failed(&e));
                Err(e)
            }
        }
    }

    fn lock_inflight(&self) -> MutexGuard<'_, CancellationToken> {
        self.inner
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// List (and server stats) for one refresh. Server stats are fetched
    /// concurrently; the first failure aborts both.
    async fn fetch_snapshot(&self) -> Result<(Vec<Domain>, Stats), CoreError> {
        let backend = &self.inner.backend;
        let config = &self.inner.config;

        let list = async {
            backend
                .list_domains(&config.query)
                .await
                .map_err(|e| CoreError::from_api(Operation::List, e))
        };

        match config.stats_source {
            StatsSource::Server => {
                let stats = async {
                    backend
                        .stats()
                        .await
                        .map_err(|e| CoreError::from_api(Operation::Stats, e))
                };
                tokio::try_join!(list, stats)
            }
            StatsSource::Local => {
                let domains = list.await?;
                let stats = Stats::from_domains(&domains, config.low_spam_threshold);
                Ok((domains, stats))
            }
        }
    }

    /// Cancel the in-flight refresh and retire its generation so a
    /// response fetched before a confirmed mutation can't resurrect rows.
    fn invalidate_refreshes(&self) {
        let mut inflight = self.lock_inflight();
        inflight.cancel();
        *inflight = self.inner.cancel.child_token();
        self.inner.store.next_generation();
        self.inner.store.settle_pending(Slot::Load);
    }

    // ── Scan ─────────────────────────────────────────────────────

    /// Trigger a backend scan, then refresh.
    ///
    /// Only one scan runs at a time: a second call while the first is
    /// pending fails with [`CoreError::ScanInProgress`] without touching
    /// the network. A failed scan does not refresh.
    pub async fn scan(&self, options: &ScanOptions) -> Result<ScanResult, CoreError> {
        self.ensure_live()?;
        let store = &self.inner.store;
        if !store.try_begin(Slot::Scan) {
            return Err(CoreError::ScanInProgress);
        }
        debug!(mode = ?options.mode, "scan started");

        let result = tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => Err(CoreError::Disposed),
            result = self.inner.backend.start_scan(options) => {
                result.map_err(|e| CoreError::from_api(Operation::Scan, e))
            }
        };

        match result {
            Ok(scan) => {
                info!(found = scan.domains_found, status = %scan.status, "scan finished");
                store.set_state(Slot::Scan, RequestState::Success);
                if let Err(e) = self.refresh().await {
                    warn!(error = %e, "refresh after scan failed");
                }
                Ok(scan)
            }
            Err(e) => {
                store.set_state(Slot::Scan, RequestState::failed(&e));
                Err(e)
            }
        }
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Delete one domain. The row only leaves the view after the backend
    /// confirms; an unknown id fails with [`CoreError::NotFound`].
    pub async fn remove(&self, id: DomainId) -> Result<String, CoreError> {
        self.ensure_live()?;
        let store = &self.inner.store;
        store.set_state(Slot::Mutate, RequestState::Pending);

        let result = tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => Err(CoreError::Disposed),
            result = self.inner.backend.delete_domain(id) => result.map_err(|e| {
                if e.is_not_found() {
                    CoreError::NotFound { id: id.to_string() }
                } else {
                    CoreError::from_api(Operation::Delete, e)
                }
            }),
        };

        let message = match result {
            Ok(message) => message,
            Err(e) => {
                store.set_state(Slot::Mutate, RequestState::failed(&e));
                return Err(e);
            }
        };
        store.set_state(Slot::Mutate, RequestState::Success);
        info!(%id, "domain deleted");

        match self.inner.config.stats_source {
            StatsSource::Local => {
                self.invalidate_refreshes();
                store.remove_domain(id, Some(self.inner.config.low_spam_threshold));
            }
            StatsSource::Server => match self.refresh().await {
                Ok(RefreshOutcome::Applied) => {}
                outcome => {
                    if let Err(e) = outcome {
                        warn!(error = %e, "refresh after delete failed; dropping row locally");
                    }
                    store.remove_domain(id, None);
                }
            },
        }
        Ok(message)
    }

    /// Delete every domain on the backend, then empty the view.
    pub async fn clear_all(&self) -> Result<String, CoreError> {
        self.ensure_live()?;
        let store = &self.inner.store;
        store.set_state(Slot::Mutate, RequestState::Pending);

        let result = tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => Err(CoreError::Disposed),
            result = self.inner.backend.clear_domains() => {
                result.map_err(|e| CoreError::from_api(Operation::ClearAll, e))
            }
        };

        match result {
            Ok(message) => {
                self.invalidate_refreshes();
                store.clear();
                store.set_state(Slot::Mutate, RequestState::Success);
                info!("all domains cleared");
                Ok(message)
            }
            Err(e) => {
                store.set_state(Slot::Mutate, RequestState::failed(&e));
                Err(e)
            }
        }
    }

    /// Ask the backend to push a test notification to `bark_key`.
    pub async fn test_notification(&self, bark_key: &SecretString) -> Result<String, CoreError> {
        self.ensure_live()?;
        self.inner
            .backend
            .test_notification(bark_key)
            .await
            .map_err(|e| CoreError::from_api(Operation::Notify, e))
    }
}

// ── Background tasks ─────────────────────────────────────────────

async fn refresh_task(dashboard: Dashboard, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                match dashboard.refresh().await {
                    Ok(_) | Err(CoreError::Disposed) => {}
                    Err(e) => warn!(error = %e, "periodic refresh failed"),
                }
            }
        }
    }
}
