//! Command-line interface for `devex-dashboard`.
//!
//! CLI arguments and environment variable handling using clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use devex_core::{
    severity_class, status_class, Friction, FrictionCatalog, InitiativeDraft, SeverityClass,
    StatusClass,
};

use crate::config::{ClientConfig, BACKEND_URL_ENV};

/// DevEx dashboard - metrics overview and improvement initiatives
#[derive(Parser, Debug, Clone)]
#[command(name = "devex-dashboard")]
#[command(about = "Inspect developer experience metrics and create improvement initiatives")]
pub struct Args {
    /// Backend base URL (overrides the config file)
    #[arg(long, env = BACKEND_URL_ENV)]
    pub backend_url: Option<String>,

    /// YAML config file
    #[arg(long, env = "DEVEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the dashboard snapshot as JSON
    Summary,
    /// Print frictions with their display classes as JSON
    Frictions,
    /// Build and submit an initiative
    CreateInitiative(CreateInitiativeArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CreateInitiativeArgs {
    /// Link the initiative to this friction
    #[arg(long)]
    pub friction_id: Option<String>,

    /// Initiative title (derived from the friction when omitted)
    #[arg(long)]
    pub title: Option<String>,

    /// team or organization
    #[arg(long, default_value = "team")]
    pub scope: String,

    /// Team id (defaults to the first team for team scope)
    #[arg(long)]
    pub team_id: Option<String>,

    #[arg(long)]
    pub owner: Option<String>,

    /// Target date, YYYY-MM-DD
    #[arg(long)]
    pub target_date: Option<String>,

    /// Goal (repeatable)
    #[arg(long = "goal")]
    pub goals: Vec<String>,

    /// Success metric (repeatable)
    #[arg(long = "metric")]
    pub success_metrics: Vec<String>,

    /// Start from the suggested goals and metrics
    #[arg(long, default_value = "false")]
    pub seeded: bool,
}

impl Args {
    /// Resolve configuration: file, then environment, then flags.
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let config = match &self.config {
            Some(path) => ClientConfig::from_yaml(&std::fs::read_to_string(path)?)?,
            None => ClientConfig::default(),
        };
        let mut config = config.with_env_overrides();
        if let Some(url) = &self.backend_url {
            config.base_url = url.clone();
        }
        Ok(config)
    }
}

impl CreateInitiativeArgs {
    /// Build a draft from the flags, linking `friction` when given.
    pub fn to_draft(&self, friction: Option<Friction>) -> InitiativeDraft {
        let mut draft = if self.seeded {
            InitiativeDraft::seeded()
        } else {
            InitiativeDraft::new()
        };

        draft.link_friction(friction);
        if let Some(title) = &self.title {
            draft.set_title(title.clone());
        }

        draft.scope = self.scope.clone();
        draft.team_id = self.team_id.clone();
        draft.owner = self.owner.clone().unwrap_or_default();
        draft.target_date_input = self.target_date.clone();
        if !self.goals.is_empty() {
            draft.goals = self.goals.clone();
        }
        if !self.success_metrics.is_empty() {
            draft.success_metrics = self.success_metrics.clone();
        }
        draft
    }
}

/// A friction row as printed by `frictions`.
#[derive(Debug, Serialize)]
pub struct FrictionRow<'a> {
    #[serde(flatten)]
    pub friction: &'a Friction,
    pub severity_class: SeverityClass,
    pub status_class: StatusClass,
}

/// Rows for every friction in the catalog, in source order.
pub fn friction_rows(catalog: &FrictionCatalog) -> Vec<FrictionRow<'_>> {
    catalog
        .iter()
        .map(|friction| FrictionRow {
            friction,
            severity_class: severity_class(friction),
            status_class: status_class(friction),
        })
        .collect()
}
