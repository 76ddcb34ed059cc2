//! Backend API Client
//!
//! HTTP client for the Aegis detection backend. Every endpoint the console
//! touches lives here; see `types` for the response schemas.

use std::time::Duration;

use serde::Deserialize;

use crate::constants;
use crate::error::{MonitorError, MonitorResult};
use crate::monitor::job::DetectionBackend;

use super::types::{Alert, DetectRunWire, DetectionRunResult, LogRecord, StatsSummary};

/// Backend connection configuration
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl BackendConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            base_url: constants::get_backend_url(),
            timeout_seconds: constants::get_request_timeout(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BACKEND_URL.to_string(),
            timeout_seconds: constants::DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Standardized error envelope the backend uses for failed requests
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// Backend API client
pub struct BackendClient {
    config: BackendConfig,
    http_client: reqwest::Client,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(config: BackendConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Map a response to the error taxonomy. A non-2xx status with the
    /// backend's `{error, status}` envelope becomes `Backend`; any other
    /// non-2xx becomes `Http`.
    async fn check(response: reqwest::Response) -> MonitorResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => Err(MonitorError::Backend {
                status,
                message: envelope.error,
            }),
            Err(_) => Err(MonitorError::Http { status }),
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> MonitorResult<T> {
        let body = Self::check(response).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| MonitorError::Parse(e.to_string()))
    }

    /// GET /alerts - full stored alert collection, in backend order
    pub async fn list_alerts(&self) -> MonitorResult<Vec<Alert>> {
        let response = self.http_client.get(self.url("/alerts")).send().await?;
        Self::decode(response).await
    }

    /// POST /alerts/clear
    pub async fn clear_alerts(&self) -> MonitorResult<()> {
        let response = self
            .http_client
            .post(self.url("/alerts/clear"))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// GET /stats - backend-computed dashboard counters
    pub async fn stats(&self) -> MonitorResult<StatsSummary> {
        let response = self.http_client.get(self.url("/stats")).send().await?;
        Self::decode(response).await
    }

    /// POST /logs - store one log record
    pub async fn submit_log(&self, record: &LogRecord) -> MonitorResult<()> {
        let response = self
            .http_client
            .post(self.url("/logs"))
            .json(record)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// GET /logs - most recent stored logs (backend caps this at 100)
    pub async fn recent_logs(&self) -> MonitorResult<Vec<LogRecord>> {
        let response = self.http_client.get(self.url("/logs")).send().await?;
        Self::decode(response).await
    }

    /// GET /logs/count
    pub async fn count_logs(&self) -> MonitorResult<u64> {
        #[derive(Deserialize)]
        struct CountResponse {
            count: u64,
        }

        let response = self.http_client.get(self.url("/logs/count")).send().await?;
        let counted: CountResponse = Self::decode(response).await?;
        Ok(counted.count)
    }

    /// POST /logs/clear - delete stored logs, optionally alerts too
    pub async fn clear_logs(&self, clear_alerts: bool) -> MonitorResult<()> {
        let response = self
            .http_client
            .post(self.url("/logs/clear"))
            .json(&serde_json::json!({ "clear_alerts": clear_alerts }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

impl DetectionBackend for BackendClient {
    /// POST /detect - run detection over stored logs, optionally capped
    async fn run_detection(&self, limit: Option<u64>) -> MonitorResult<DetectionRunResult> {
        log::info!(
            "Requesting detection run (limit: {})",
            limit.map(|l| l.to_string()).unwrap_or_else(|| "all".to_string())
        );

        let response = self
            .http_client
            .post(self.url("/detect"))
            .json(&serde_json::json!({ "limit": limit }))
            .send()
            .await?;
        let wire: DetectRunWire = Self::decode(response).await?;
        Ok(wire.into())
    }

    /// POST /detect/cancel - ask the backend to stop the in-flight run
    async fn cancel_detection(&self) -> MonitorResult<()> {
        let response = self
            .http_client
            .post(self.url("/detect/cancel"))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
