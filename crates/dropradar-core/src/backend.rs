// ── Backend seam ──
//
// The dashboard talks to the remote service through this trait so the
// store can run against the real HTTP client or an in-memory double.
// Errors stay in the API crate's taxonomy; the dashboard tags them with
// the operation.

use async_trait::async_trait;
use secrecy::SecretString;

use dropradar_api::{DropRadarClient, Error as ApiError, ListQuery};

use crate::model::{Domain, DomainId, ScanOptions, ScanResult, Stats};

#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_domains(&self, query: &ListQuery) -> Result<Vec<Domain>, ApiError>;

    async fn stats(&self) -> Result<Stats, ApiError>;

    async fn start_scan(&self, options: &ScanOptions) -> Result<ScanResult, ApiError>;

    /// Returns the backend's acknowledgement message.
    async fn delete_domain(&self, id: DomainId) -> Result<String, ApiError>;

    /// Returns the backend's acknowledgement message.
    async fn clear_domains(&self) -> Result<String, ApiError>;

    /// Returns the backend's acknowledgement message.
    async fn test_notification(&self, bark_key: &SecretString) -> Result<String, ApiError>;
}

#[async_trait]
impl Backend for DropRadarClient {
    async fn list_domains(&self, query: &ListQuery) -> Result<Vec<Domain>, ApiError> {
        let page = DropRadarClient::list_domains(self, query).await?;
        Ok(page.domains.into_iter().map(Domain::from).collect())
    }

    async fn stats(&self) -> Result<Stats, ApiError> {
        DropRadarClient::stats(self).await.map(Stats::from)
    }

    async fn start_scan(&self, options: &ScanOptions) -> Result<ScanResult, ApiError> {
        let mode = options.mode.map(|m| m.as_ref().to_owned());
        DropRadarClient::start_scan(self, mode.as_deref(), options.bark_key.as_ref())
            .await
            .map(ScanResult::from)
    }

    async fn delete_domain(&self, id: DomainId) -> Result<String, ApiError> {
        DropRadarClient::delete_domain(self, id.get())
            .await
            .map(|r| r.message)
    }

    async fn clear_domains(&self) -> Result<String, ApiError> {
        DropRadarClient::clear_domains(self).await.map(|r| r.message)
    }

    async fn test_notification(&self, bark_key: &SecretString) -> Result<String, ApiError> {
        DropRadarClient::test_notification(self, bark_key)
            .await
            .map(|r| r.message)
    }
}
