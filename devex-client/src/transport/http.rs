//! HTTP transport for the dashboard's REST backend.
//!
//! Endpoints:
//! - `GET  /metrics?level=org|team&limit=N`
//! - `GET  /benchmarks`
//! - `GET  /frictions`
//! - `GET  /teams`
//! - `POST /initiatives`

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;

use devex_core::{Friction, Initiative, MetricRecord, ScopeLevel, Team};

use super::traits::*;
use crate::config::ClientConfig;

/// reqwest-backed transport.
pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Create a transport for the configured backend.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TransportError::InvalidConfig(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TransportError> {
        let url = self.config.endpoint(path);
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| TransportError::NetworkError(e.to_string()))?;

        decode(check_status(response).await?).await
    }
}

async fn check_status(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(TransportError::RequestFailed {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    response
        .json()
        .await
        .map_err(|e| TransportError::ParseError(e.to_string()))
}

#[async_trait]
impl DevexTransport for HttpTransport {
    fn id(&self) -> &str {
        &self.config.base_url
    }

    async fn fetch_metrics(
        &self,
        level: ScopeLevel,
        limit: usize,
    ) -> Result<Vec<MetricRecord>, TransportError> {
        let query = [
            ("level", level.as_str().to_string()),
            ("limit", limit.to_string()),
        ];
        let mut records: Vec<MetricRecord> = self.get_json("metrics", &query).await?;

        // The level is implied by the query; records rarely carry it.
        for record in &mut records {
            record.scope_level = level;
        }
        Ok(records)
    }

    async fn fetch_benchmarks(&self) -> Result<Vec<serde_json::Value>, TransportError> {
        self.get_json("benchmarks", &[]).await
    }

    async fn fetch_frictions(&self) -> Result<Vec<Friction>, TransportError> {
        self.get_json("frictions", &[]).await
    }

    async fn fetch_teams(&self) -> Result<Vec<Team>, TransportError> {
        self.get_json("teams", &[]).await
    }

    async fn submit_initiative(
        &self,
        initiative: &Initiative,
    ) -> Result<serde_json::Value, TransportError> {
        let url = self.config.endpoint("initiatives");
        tracing::debug!(url = %url, title = %initiative.title, "POST initiative");

        let response = self
            .client
            .post(&url)
            .json(initiative)
            .send()
            .await
            .map_err(|e| TransportError::NetworkError(e.to_string()))?;

        decode(check_status(response).await?).await
    }
}
