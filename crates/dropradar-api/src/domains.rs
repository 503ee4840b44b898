// Domain list endpoints: list, delete one, clear all.

use tracing::debug;

use crate::client::DropRadarClient;
use crate::error::Error;
use crate::models::{DomainPage, ListQuery, MessageResponse};

impl DropRadarClient {
    /// List domains, ordered by authority score descending on the backend.
    ///
    /// `GET /api/v1/domains`
    pub async fn list_domains(&self, query: &ListQuery) -> Result<DomainPage, Error> {
        let url = self.api_url("domains")?;
        let page: DomainPage = self.get(url, &query.to_pairs()).await?;
        debug!(
            count = page.domains.len(),
            total = page.total,
            "listed domains"
        );
        Ok(page)
    }

    /// Delete one domain by id. A 404 surfaces as `Error::NotFound`.
    ///
    /// `DELETE /api/v1/domains/{id}`
    pub async fn delete_domain(&self, id: u64) -> Result<MessageResponse, Error> {
        let url = self.api_url(&format!("domains/{id}"))?;
        self.delete(url).await
    }

    /// Delete every domain. Irreversible; callers are expected to have
    /// obtained consent.
    ///
    /// `DELETE /api/v1/domains`. Backends that only route clear-all at
    /// `DELETE /api/v1/domains/all` answer 405 here, which comes back as
    /// [`Error::Http`] with `status == 405`.
    pub async fn clear_domains(&self) -> Result<MessageResponse, Error> {
        let url = self.api_url("domains")?;
        self.delete(url).await
    }
}
