// Scan trigger and notification test endpoints.
//
// Both are POSTs whose effects happen on the backend: a scan crawls
// third-party sources and inserts new rows; the notification test pushes
// a Bark message to the given device key.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use crate::client::DropRadarClient;
use crate::error::Error;
use crate::models::{NotificationRequest, NotificationResponse, ScanRequest, ScanResponse};

impl DropRadarClient {
    /// Start a backend scan and wait for it to finish.
    ///
    /// Uses the scan deadline rather than the read deadline. `mode` is sent
    /// as a query parameter; the backend default applies when it is `None`.
    ///
    /// `POST /api/v1/scan?mode=<mode>`
    pub async fn start_scan(
        &self,
        mode: Option<&str>,
        bark_key: Option<&SecretString>,
    ) -> Result<ScanResponse, Error> {
        let mut url = self.api_url("scan")?;
        if let Some(mode) = mode {
            url.query_pairs_mut().append_pair("mode", mode);
        }
        debug!(
            mode = mode.unwrap_or("<default>"),
            notify = bark_key.is_some(),
            timeout_secs = self.scan_timeout().as_secs(),
            "starting scan"
        );

        let body = ScanRequest {
            bark_key: bark_key.map(|k| k.expose_secret()),
        };
        let resp: ScanResponse = self.post(url, &body, self.scan_timeout()).await?;
        info!(found = resp.domains_found, status = %resp.status, "scan finished");
        Ok(resp)
    }

    /// Ask the backend to push a test notification to a Bark device key.
    ///
    /// `POST /api/v1/test-notification`
    pub async fn test_notification(
        &self,
        bark_key: &SecretString,
    ) -> Result<NotificationResponse, Error> {
        let url = self.api_url("test-notification")?;
        let body = NotificationRequest {
            bark_key: bark_key.expose_secret(),
        };
        self.post(url, &body, self.timeout()).await
    }
}
