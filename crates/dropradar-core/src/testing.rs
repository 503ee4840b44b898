// ── In-memory backend for store tests ──
//
// Holds a server-side table, counts calls per endpoint, injects one-shot
// failures and can hold list/scan responses behind oneshot gates so
// tests control the order in which responses land.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::oneshot;

use dropradar_api::{Error as ApiError, ListQuery};

use crate::backend::Backend;
use crate::error::Operation;
use crate::model::{
    DEFAULT_LOW_SPAM_THRESHOLD, Domain, DomainId, DomainStatus, ScanOptions, ScanResult, Stats,
};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Failure {
    Status(u16),
    Timeout,
}

impl Failure {
    fn into_error(self) -> ApiError {
        match self {
            Self::Status(status) => ApiError::Http {
                status,
                message: "injected failure".into(),
            },
            Self::Timeout => ApiError::Timeout { timeout_secs: 1 },
        }
    }
}

#[derive(Default)]
pub(crate) struct Calls {
    pub list: AtomicUsize,
    pub stats: AtomicUsize,
    pub scan: AtomicUsize,
    pub delete: AtomicUsize,
    pub clear: AtomicUsize,
    pub notify: AtomicUsize,
}

impl Calls {
    pub fn list(&self) -> usize {
        self.list.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> usize {
        self.stats.load(Ordering::SeqCst)
    }

    pub fn scan(&self) -> usize {
        self.scan.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    table: Mutex<Vec<Domain>>,
    failures: Mutex<Vec<(Operation, Failure)>>,
    list_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    scan_gate: Mutex<Option<oneshot::Receiver<()>>>,
    scan_yield: Mutex<Vec<Domain>>,
    pub calls: Calls,
}

impl FakeBackend {
    pub fn with_rows(rows: Vec<Domain>) -> Self {
        let fake = Self::default();
        fake.set_rows(rows);
        fake
    }

    pub fn set_rows(&self, rows: Vec<Domain>) {
        *self.table.lock().unwrap() = rows;
    }

    /// Make the next call for `operation` fail.
    pub fn fail_next(&self, operation: Operation, failure: Failure) {
        self.failures.lock().unwrap().push((operation, failure));
    }

    /// Hold the next list response until the returned sender fires. The
    /// table is read before waiting.
    pub fn gate_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.list_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn gate_next_scan(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.scan_gate.lock().unwrap() = Some(rx);
        tx
    }

    /// Rows a successful scan inserts into the table.
    pub fn scan_finds(&self, rows: Vec<Domain>) {
        *self.scan_yield.lock().unwrap() = rows;
    }

    fn take_failure(&self, operation: Operation) -> Result<(), ApiError> {
        let mut failures = self.failures.lock().unwrap();
        match failures.iter().position(|(op, _)| *op == operation) {
            Some(idx) => Err(failures.remove(idx).1.into_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn list_domains(&self, _query: &ListQuery) -> Result<Vec<Domain>, ApiError> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        let rows = self.table.lock().unwrap().clone();
        let gate = self.list_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.take_failure(Operation::List)?;
        Ok(rows)
    }

    async fn stats(&self) -> Result<Stats, ApiError> {
        self.calls.stats.fetch_add(1, Ordering::SeqCst);
        self.take_failure(Operation::Stats)?;
        let rows = self.table.lock().unwrap().clone();
        Ok(Stats::from_domains(&rows, DEFAULT_LOW_SPAM_THRESHOLD))
    }

    async fn start_scan(&self, _options: &ScanOptions) -> Result<ScanResult, ApiError> {
        self.calls.scan.fetch_add(1, Ordering::SeqCst);
        let gate = self.scan_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.take_failure(Operation::Scan)?;

        let found = std::mem::take(&mut *self.scan_yield.lock().unwrap());
        let count = found.len() as u64;
        self.table.lock().unwrap().extend(found);
        Ok(ScanResult {
            status: "success".into(),
            domains_found: count,
            message: format!("Scan completed, {count} new domains"),
        })
    }

    async fn delete_domain(&self, id: DomainId) -> Result<String, ApiError> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        self.take_failure(Operation::Delete)?;
        let mut table = self.table.lock().unwrap();
        let before = table.len();
        table.retain(|d| d.id != id);
        if table.len() == before {
            return Err(ApiError::NotFound {
                message: "Domain not found".into(),
            });
        }
        Ok(format!("Domain {id} deleted"))
    }

    async fn clear_domains(&self) -> Result<String, ApiError> {
        self.calls.clear.fetch_add(1, Ordering::SeqCst);
        self.take_failure(Operation::ClearAll)?;
        let mut table = self.table.lock().unwrap();
        let count = table.len();
        table.clear();
        Ok(format!("Deleted {count} domains"))
    }

    async fn test_notification(&self, _bark_key: &SecretString) -> Result<String, ApiError> {
        self.calls.notify.fetch_add(1, Ordering::SeqCst);
        self.take_failure(Operation::Notify)?;
        Ok("Test notification sent".into())
    }
}

pub(crate) fn domain(id: u64, authority: u32, spam: u32, status: DomainStatus) -> Domain {
    Domain {
        id: DomainId::from(id),
        name: format!("drop{id}.com"),
        authority_score: authority,
        backlinks: u64::from(authority) * 25,
        spam_score: spam,
        status,
        drop_date: None,
        tld: Some(".com".into()),
        length: None,
        created_at: None,
    }
}

/// Five rows with a spread of scores and statuses.
pub(crate) fn sample_rows() -> Vec<Domain> {
    vec![
        domain(1, 45, 3, DomainStatus::Available),
        domain(2, 38, 5, DomainStatus::Available),
        domain(3, 52, 2, DomainStatus::Auction),
        domain(4, 41, 4, DomainStatus::Available),
        domain(5, 48, 6, DomainStatus::Pending),
    ]
}
