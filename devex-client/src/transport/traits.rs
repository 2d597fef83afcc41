//! Core trait for backend transports.

use async_trait::async_trait;

use devex_core::{Friction, Initiative, MetricRecord, ScopeLevel, Team};

/// Error types for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Backend is not reachable or disabled
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Backend answered with a non-success status
    #[error("Request failed: HTTP {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Client could not be constructed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Retrieval and submission against the dashboard backend.
///
/// Implementations decode payloads into core records; they never retry.
#[async_trait]
pub trait DevexTransport: Send + Sync {
    /// Transport identifier, for logs.
    fn id(&self) -> &str;

    /// Fetch up to `limit` metric records at a level.
    async fn fetch_metrics(
        &self,
        level: ScopeLevel,
        limit: usize,
    ) -> Result<Vec<MetricRecord>, TransportError>;

    /// Fetch benchmark reference payloads.
    async fn fetch_benchmarks(&self) -> Result<Vec<serde_json::Value>, TransportError>;

    /// Fetch the friction list.
    async fn fetch_frictions(&self) -> Result<Vec<Friction>, TransportError>;

    /// Fetch the team list.
    async fn fetch_teams(&self) -> Result<Vec<Team>, TransportError>;

    /// Submit a new initiative, returning the backend's response body.
    async fn submit_initiative(
        &self,
        initiative: &Initiative,
    ) -> Result<serde_json::Value, TransportError>;
}
