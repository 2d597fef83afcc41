//! DashboardService - loads dashboard inputs and submits initiatives.
//!
//! The service owns the I/O around the pure core: it fans out the loads,
//! tolerates partial failure, and only submits drafts that validate.

use std::sync::Arc;
use tracing::{debug, info, warn};

use devex_core::{
    DashboardInputs, DashboardSnapshot, FrictionCatalog, Initiative, InitiativeBuilder,
    InitiativeDraft, ScopeLevel, Team, ValidationFailure,
};

use crate::config::ClientConfig;
use crate::transport::{DevexTransport, TransportError};

/// Error types for the service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Draft did not validate; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    /// Transport error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// A submitted initiative and the backend's answer.
#[derive(Debug, Clone, serde::Serialize)]
pub struct InitiativeReceipt {
    pub initiative: Initiative,
    pub response: serde_json::Value,
}

/// Entry point for dashboard loads and initiative creation.
pub struct DashboardService {
    transport: Arc<dyn DevexTransport>,
    config: ClientConfig,
}

impl DashboardService {
    /// Create a service over a transport.
    pub fn new(transport: Arc<dyn DevexTransport>) -> Self {
        Self {
            transport,
            config: ClientConfig::default(),
        }
    }

    /// Create with configuration.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Load every dashboard input concurrently and assemble the snapshot.
    ///
    /// A failed fetch is logged and shows up in `issues`; it never stops
    /// the other inputs from being used.
    pub async fn load_dashboard(&self) -> DashboardSnapshot {
        debug!(transport = %self.transport.id(), "Loading dashboard");

        let (org, teams, benchmarks, frictions) = tokio::join!(
            self.transport
                .fetch_metrics(ScopeLevel::Organization, self.config.org_metrics_limit),
            self.transport
                .fetch_metrics(ScopeLevel::Team, self.config.team_metrics_limit),
            self.transport.fetch_benchmarks(),
            self.transport.fetch_frictions(),
        );

        let snapshot = DashboardSnapshot::assemble(DashboardInputs {
            org_records: settle("organization metrics", org),
            team_records: settle("team metrics", teams),
            benchmarks: settle("benchmarks", benchmarks),
            frictions: settle("frictions", frictions),
        });

        info!(
            teams = snapshot.teams.len(),
            issues = snapshot.issues.len(),
            "Dashboard loaded"
        );
        snapshot
    }

    /// Load the friction catalog.
    pub async fn load_frictions(&self) -> Result<FrictionCatalog, ServiceError> {
        let frictions = self.transport.fetch_frictions().await?;
        Ok(FrictionCatalog::new(frictions))
    }

    /// Load the team list; failures yield an empty list.
    pub async fn load_teams(&self) -> Vec<Team> {
        settle("teams", self.transport.fetch_teams().await).unwrap_or_default()
    }

    /// Validate a draft and submit it.
    ///
    /// Teams are only fetched when the draft needs the first-team fallback.
    pub async fn create_initiative(
        &self,
        draft: &InitiativeDraft,
    ) -> Result<InitiativeReceipt, ServiceError> {
        let teams = if draft.needs_team_fallback() {
            self.load_teams().await
        } else {
            Vec::new()
        };

        let initiative = InitiativeBuilder::new(&teams).build(draft)?;
        let response = self.transport.submit_initiative(&initiative).await?;

        info!(
            title = %initiative.title,
            scope = %initiative.scope,
            "Initiative submitted"
        );
        Ok(InitiativeReceipt {
            initiative,
            response,
        })
    }
}

fn settle<T>(what: &str, result: Result<T, TransportError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(input = what, error = %e, "Failed to load dashboard input");
            None
        }
    }
}
