//! DevEx Core - metrics reconciliation and initiative derivation
//!
//! This crate holds the logic behind the DevEx dashboard that has real
//! invariants. Everything else (fetching, rendering, routing) lives in the
//! caller, which hands raw payloads in and renders what comes out.
//!
//! - **Metrics**: fold duplicated time-series measurements into one current
//!   record per scope, then into organization-wide aggregates
//! - **Frictions**: hold the friction list and classify entries for display
//! - **Initiatives**: turn a user-edited draft, optionally linked to a
//!   friction, into a validated initiative payload
//!
//! # Data flow
//!
//! ```text
//! ┌──────────────┐   reconcile    ┌──────────────────┐   aggregate   ┌───────────────────┐
//! │ MetricRecord │ ─────────────▶ │  LatestByScope   │ ────────────▶ │ AggregateSnapshot │
//! └──────────────┘                └──────────────────┘               └───────────────────┘
//!
//! ┌──────────────┐    select      ┌──────────────────┐     build     ┌───────────────────┐
//! │FrictionCatalog│ ────────────▶ │  InitiativeDraft │ ────────────▶ │    Initiative     │
//! └──────────────┘                └──────────────────┘               └───────────────────┘
//! ```
//!
//! All operations are synchronous and free of I/O, so they can be called
//! from any number of tasks without coordination.
//!
//! # Example
//!
//! ```ignore
//! use devex_core::{compute_aggregates, reconcile_latest_per_scope};
//!
//! let latest = reconcile_latest_per_scope(team_records);
//! let aggregates = compute_aggregates(latest.iter());
//! ```

pub mod dashboard;
pub mod friction;
pub mod initiative;
pub mod instant;
pub mod metrics;
pub mod types;

// Re-export main types
pub use dashboard::{
    DashboardInputs, DashboardSnapshot, LoadIssue, OrgOverview, StatCard, TeamHealth, TeamSummary,
    Trend,
};
pub use friction::{severity_class, status_class, FrictionCatalog, SeverityClass, StatusClass};
pub use initiative::{
    derive_default_title, ErrorKind, Initiative, InitiativeBuilder, InitiativeDraft,
    InitiativeScope, InitiativeStatus, ValidationFailure,
};
pub use metrics::{
    compute_aggregates, latest_record, reconcile_latest_per_scope, AggregateSnapshot,
    LatestByScope,
};
pub use types::*;
