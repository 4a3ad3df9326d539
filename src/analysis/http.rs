use super::{AnalysisProvider, DropAnalysisRequest, DropAnalysisResponse};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Posts analysis requests as JSON to an HTTP endpoint and reads back
/// `{ "analysis": "..." }`.
#[derive(Debug, Clone)]
pub struct HttpAnalysisProvider {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpAnalysisProvider {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ridatsu/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AnalysisError::Provider(format!("Could not build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.into(),
            api_key,
            client,
        })
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AnalysisError::Provider("no analysis endpoint configured".to_string()))?;
        Self::new(
            endpoint,
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn map_http_error(error: reqwest::Error) -> AnalysisError {
    if error.is_timeout() {
        AnalysisError::Provider(format!("Request timeout: {error}"))
    } else if error.is_connect() {
        AnalysisError::Provider(format!("Connection error: {error}"))
    } else {
        AnalysisError::Provider(format!("HTTP error: {error}"))
    }
}

#[async_trait]
impl AnalysisProvider for HttpAnalysisProvider {
    async fn analyze(
        &self,
        request: &DropAnalysisRequest,
    ) -> Result<DropAnalysisResponse, AnalysisError> {
        let mut call = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }

        debug!(endpoint = %self.endpoint, "Sending drop analysis request");
        let response = call.send().await.map_err(map_http_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = body.trim();
            return Err(AnalysisError::Provider(if body.is_empty() {
                format!("HTTP {status}")
            } else {
                format!("HTTP {status}: {body}")
            }));
        }

        response
            .json::<DropAnalysisResponse>()
            .await
            .map_err(|e| AnalysisError::Provider(format!("Malformed response: {e}")))
    }
}
