//! Mock transport for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::Mutex;

use devex_core::{Friction, Initiative, MetricRecord, ScopeLevel, Team};

use super::traits::*;

/// Backend endpoints, used to toggle failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    OrgMetrics,
    TeamMetrics,
    Benchmarks,
    Frictions,
    Teams,
    Initiatives,
}

/// In-memory transport with canned responses.
pub struct MockTransport {
    org_records: Vec<MetricRecord>,
    team_records: Vec<MetricRecord>,
    benchmarks: Vec<serde_json::Value>,
    frictions: Vec<Friction>,
    teams: Vec<Team>,
    failing: HashSet<Endpoint>,
    call_count: AtomicU32,
    submitted: Mutex<Vec<Initiative>>,
}

impl MockTransport {
    /// Create a mock with no data.
    pub fn new() -> Self {
        Self {
            org_records: Vec::new(),
            team_records: Vec::new(),
            benchmarks: Vec::new(),
            frictions: Vec::new(),
            teams: Vec::new(),
            failing: HashSet::new(),
            call_count: AtomicU32::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_org_records(mut self, records: Vec<MetricRecord>) -> Self {
        self.org_records = records;
        self
    }

    pub fn with_team_records(mut self, records: Vec<MetricRecord>) -> Self {
        self.team_records = records;
        self
    }

    pub fn with_benchmarks(mut self, benchmarks: Vec<serde_json::Value>) -> Self {
        self.benchmarks = benchmarks;
        self
    }

    pub fn with_frictions(mut self, frictions: Vec<Friction>) -> Self {
        self.frictions = frictions;
        self
    }

    pub fn with_teams(mut self, teams: Vec<Team>) -> Self {
        self.teams = teams;
        self
    }

    /// Make an endpoint fail with [`TransportError::Unavailable`].
    pub fn failing(mut self, endpoint: Endpoint) -> Self {
        self.failing.insert(endpoint);
        self
    }

    /// Total number of transport calls.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Initiatives submitted so far.
    pub async fn submitted(&self) -> Vec<Initiative> {
        self.submitted.lock().await.clone()
    }

    fn enter(&self, endpoint: Endpoint) -> Result<(), TransportError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&endpoint) {
            return Err(TransportError::Unavailable(format!(
                "Mock endpoint {endpoint:?} disabled"
            )));
        }
        Ok(())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DevexTransport for MockTransport {
    fn id(&self) -> &str {
        "mock"
    }

    async fn fetch_metrics(
        &self,
        level: ScopeLevel,
        limit: usize,
    ) -> Result<Vec<MetricRecord>, TransportError> {
        let (endpoint, records) = match level {
            ScopeLevel::Organization => (Endpoint::OrgMetrics, &self.org_records),
            ScopeLevel::Team => (Endpoint::TeamMetrics, &self.team_records),
        };
        self.enter(endpoint)?;
        Ok(records.iter().take(limit).cloned().collect())
    }

    async fn fetch_benchmarks(&self) -> Result<Vec<serde_json::Value>, TransportError> {
        self.enter(Endpoint::Benchmarks)?;
        Ok(self.benchmarks.clone())
    }

    async fn fetch_frictions(&self) -> Result<Vec<Friction>, TransportError> {
        self.enter(Endpoint::Frictions)?;
        Ok(self.frictions.clone())
    }

    async fn fetch_teams(&self) -> Result<Vec<Team>, TransportError> {
        self.enter(Endpoint::Teams)?;
        Ok(self.teams.clone())
    }

    async fn submit_initiative(
        &self,
        initiative: &Initiative,
    ) -> Result<serde_json::Value, TransportError> {
        self.enter(Endpoint::Initiatives)?;
        let mut submitted = self.submitted.lock().await;
        submitted.push(initiative.clone());
        Ok(serde_json::json!({ "id": format!("mock-{}", submitted.len()) }))
    }
}
