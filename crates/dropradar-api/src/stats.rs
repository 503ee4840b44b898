use crate::client::DropRadarClient;
use crate::error::Error;
use crate::models::StatsResponse;

impl DropRadarClient {
    /// Server-computed aggregates over the whole domain table.
    ///
    /// `GET /api/v1/stats`
    pub async fn stats(&self) -> Result<StatsResponse, Error> {
        let url = self.api_url("stats")?;
        self.get(url, &[]).await
    }
}
