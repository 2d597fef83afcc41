//! Dashboard view model.
//!
//! Turns whatever inputs arrived into render-ready values. Each input is
//! optional; a missing one is reported as a [`LoadIssue`] and the rest of
//! the snapshot is still assembled.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::friction::FrictionCatalog;
use crate::metrics::{
    compute_aggregates, latest_record, reconcile_latest_per_scope, AggregateSnapshot,
};
use crate::types::{Friction, FrictionStatus, MetricRecord};

/// DevEx score at or above which a team counts as healthy.
pub const HEALTHY_DEVEX_THRESHOLD: f64 = 70.0;

/// Direction of a stat card delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
}

/// One headline number with its change since the prior period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct StatCard {
    pub title: String,
    pub value: f64,
    pub suffix: String,
    pub delta: f64,
    pub subtitle: String,
}

impl StatCard {
    pub fn new(title: impl Into<String>, value: f64, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value,
            suffix: String::new(),
            delta: 0.0,
            subtitle: subtitle.into(),
        }
    }

    /// Builder: set the unit suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Builder: set the delta.
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    /// Up for zero and positive deltas.
    pub fn trend(&self) -> Trend {
        if self.delta >= 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }

    /// Delta with one decimal and a `+` sign when not negative.
    pub fn formatted_delta(&self) -> String {
        // Collapse -0.0 so it prints as "+0.0".
        let delta = if self.delta == 0.0 { 0.0 } else { self.delta };
        match self.trend() {
            Trend::Up => format!("+{delta:.1}"),
            Trend::Down => format!("{delta:.1}"),
        }
    }

    /// Value followed by its suffix, e.g. `72/100` or `3h`.
    pub fn formatted_value(&self) -> String {
        format!("{}{}", format_number(self.value), self.suffix)
    }
}

/// The four organization-level headline cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgOverview {
    pub devex: StatCard,
    pub motivation: StatCard,
    pub wasted_time: StatCard,
    pub open_frictions: StatCard,
}

impl OrgOverview {
    /// Build the cards; missing values show as 0.
    pub fn from_record(org: Option<&MetricRecord>, open_frictions: usize) -> Self {
        let value = |field: fn(&MetricRecord) -> Option<f64>| org.and_then(field).unwrap_or(0.0);

        Self {
            devex: StatCard::new("DevEx Score", value(|r| r.devex_score), "Org")
                .with_suffix("/100")
                .with_delta(value(|r| r.trend)),
            motivation: StatCard::new("Motivation", value(|r| r.motivation), "Org")
                .with_suffix("/100"),
            wasted_time: StatCard::new(
                "Wasted time",
                round_half_up(value(|r| r.wasted_time_hours)),
                "Org",
            )
            .with_suffix("h"),
            open_frictions: StatCard::new("Open frictions", open_frictions as f64, "Current"),
        }
    }

    /// Cards in display order.
    pub fn cards(&self) -> [&StatCard; 4] {
        [
            &self.devex,
            &self.motivation,
            &self.wasted_time,
            &self.open_frictions,
        ]
    }
}

/// Health badge for a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum TeamHealth {
    Healthy,
    NeedsAttention,
}

/// One team's current numbers, as shown in the comparison grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team_id: String,
    /// "Team " plus the last four characters of the id
    pub label: String,
    pub devex_score: f64,
    pub motivation: f64,
    /// Rounded to whole hours
    pub wasted_hours: f64,
    pub health: TeamHealth,
}

impl TeamSummary {
    pub fn from_record(record: &MetricRecord) -> Self {
        let devex_score = record.devex_score.unwrap_or(0.0);
        let health = if devex_score >= HEALTHY_DEVEX_THRESHOLD {
            TeamHealth::Healthy
        } else {
            TeamHealth::NeedsAttention
        };

        Self {
            team_id: record.scope_id.clone(),
            label: format!("Team {}", short_id(&record.scope_id)),
            devex_score,
            motivation: record.motivation.unwrap_or(0.0),
            wasted_hours: round_half_up(record.wasted_time_hours.unwrap_or(0.0)),
            health,
        }
    }
}

/// An input that did not arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadIssue {
    OrgMetrics,
    TeamMetrics,
    Benchmarks,
    Frictions,
}

impl LoadIssue {
    /// User-facing message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::OrgMetrics => "Failed to load organization metrics",
            Self::TeamMetrics => "Failed to load team metrics",
            Self::Benchmarks => "Failed to load benchmarks",
            Self::Frictions => "Failed to load frictions",
        }
    }
}

/// Raw inputs for one dashboard load. `None` means the fetch failed.
#[derive(Debug, Clone, Default)]
pub struct DashboardInputs {
    pub org_records: Option<Vec<MetricRecord>>,
    pub team_records: Option<Vec<MetricRecord>>,
    /// Benchmark reference payloads, passed through untouched
    pub benchmarks: Option<Vec<serde_json::Value>>,
    pub frictions: Option<Vec<Friction>>,
}

/// Everything the dashboard page renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Current organization record, if any arrived
    pub organization: Option<MetricRecord>,
    pub overview: OrgOverview,
    pub teams: Vec<TeamSummary>,
    pub aggregates: AggregateSnapshot,
    pub benchmarks: Vec<serde_json::Value>,
    /// Most severe unresolved friction, suggested as the next focus
    pub focus: Option<Friction>,
    pub issues: Vec<LoadIssue>,
}

impl DashboardSnapshot {
    /// Assemble a snapshot from whatever inputs are present.
    pub fn assemble(inputs: DashboardInputs) -> Self {
        let mut issues = Vec::new();

        let organization = match inputs.org_records {
            Some(records) => latest_record(records),
            None => {
                issues.push(LoadIssue::OrgMetrics);
                None
            }
        };

        let latest = match inputs.team_records {
            Some(records) => reconcile_latest_per_scope(records),
            None => {
                issues.push(LoadIssue::TeamMetrics);
                Default::default()
            }
        };

        let benchmarks = inputs.benchmarks.unwrap_or_else(|| {
            issues.push(LoadIssue::Benchmarks);
            Vec::new()
        });

        let catalog = match inputs.frictions {
            Some(frictions) => FrictionCatalog::new(frictions),
            None => {
                issues.push(LoadIssue::Frictions);
                FrictionCatalog::default()
            }
        };

        let focus = FrictionCatalog::new(
            catalog
                .iter()
                .filter(|f| f.status != FrictionStatus::Resolved)
                .cloned()
                .collect(),
        )
        .most_severe()
        .cloned();

        let overview = OrgOverview::from_record(organization.as_ref(), catalog.len());
        let aggregates = compute_aggregates(&latest);
        let teams = latest.iter().map(TeamSummary::from_record).collect();

        if !issues.is_empty() {
            tracing::warn!(?issues, "Dashboard assembled with missing inputs");
        }

        Self {
            organization,
            overview,
            teams,
            aggregates,
            benchmarks,
            focus,
            issues,
        }
    }

    /// True when every input arrived.
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }
}

fn short_id(id: &str) -> String {
    let tail: Vec<char> = id.chars().rev().take(4).collect();
    tail.into_iter().rev().collect()
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stat_card_delta_formatting() {
        let up = StatCard::new("DevEx Score", 72.0, "Org").with_delta(1.46);
        assert_eq!(up.trend(), Trend::Up);
        assert_eq!(up.formatted_delta(), "+1.5");

        let down = StatCard::new("DevEx Score", 72.0, "Org").with_delta(-2.0);
        assert_eq!(down.trend(), Trend::Down);
        assert_eq!(down.formatted_delta(), "-2.0");

        let flat = StatCard::new("Motivation", 0.0, "Org").with_delta(-0.0);
        assert_eq!(flat.trend(), Trend::Up);
        assert_eq!(flat.formatted_delta(), "+0.0");
    }

    #[test]
    fn test_stat_card_value_formatting() {
        assert_eq!(
            StatCard::new("DevEx", 72.0, "Org").with_suffix("/100").formatted_value(),
            "72/100"
        );
        assert_eq!(StatCard::new("DevEx", 72.5, "Org").formatted_value(), "72.5");
    }

    #[test]
    fn test_overview_defaults_without_org() {
        let overview = OrgOverview::from_record(None, 0);
        for card in overview.cards() {
            assert_eq!(card.value, 0.0);
            assert_eq!(card.delta, 0.0);
        }
        assert_eq!(overview.devex.suffix, "/100");
        assert_eq!(overview.wasted_time.suffix, "h");
        assert_eq!(overview.open_frictions.subtitle, "Current");
    }

    #[test]
    fn test_overview_from_org_record() {
        let org = MetricRecord::organization("acme", "2024-05-01")
            .with_devex(68.0)
            .with_motivation(74.0)
            .with_wasted_hours(12.5)
            .with_trend(-1.2);
        let overview = OrgOverview::from_record(Some(&org), 7);

        assert_eq!(overview.devex.value, 68.0);
        assert_eq!(overview.devex.formatted_delta(), "-1.2");
        assert_eq!(overview.motivation.delta, 0.0);
        assert_eq!(overview.wasted_time.value, 13.0);
        assert_eq!(overview.open_frictions.value, 7.0);
    }

    #[test]
    fn test_team_summary() {
        let record = MetricRecord::team("64f0c0ffee12ab", "2024-05-01")
            .with_devex(70.0)
            .with_motivation(55.0)
            .with_wasted_hours(2.4);
        let summary = TeamSummary::from_record(&record);

        assert_eq!(summary.label, "Team 12ab");
        assert_eq!(summary.health, TeamHealth::Healthy);
        assert_eq!(summary.wasted_hours, 2.0);

        let short =
            TeamSummary::from_record(&MetricRecord::team("ab", "2024-05-01").with_devex(69.9));
        assert_eq!(short.label, "Team ab");
        assert_eq!(short.health, TeamHealth::NeedsAttention);
    }

    #[test]
    fn test_assemble_full_inputs() {
        let snapshot = DashboardSnapshot::assemble(DashboardInputs {
            org_records: Some(vec![
                MetricRecord::organization("acme", "2024-05-01").with_devex(70.0),
            ]),
            team_records: Some(vec![
                MetricRecord::team("a", "2024-04-01").with_devex(10.0),
                MetricRecord::team("a", "2024-05-01").with_devex(80.0),
                MetricRecord::team("b", "2024-05-01").with_devex(60.0),
            ]),
            benchmarks: Some(vec![json!({"industry": "saas", "devex_score": 65})]),
            frictions: Some(vec![
                Friction::new("f1", "Slow CI", "tooling", 4, FrictionStatus::Open),
                Friction::new("f2", "Flaky tests", "testing", 5, FrictionStatus::Resolved),
                Friction::new("f3", "Meetings", "culture", 2, FrictionStatus::Active),
            ]),
        });

        assert!(snapshot.is_complete());
        assert_eq!(snapshot.teams.len(), 2);
        assert_eq!(snapshot.aggregates.average_devex, 70.0);
        assert_eq!(snapshot.overview.devex.value, 70.0);
        // every listed friction counts, resolved ones included
        assert_eq!(snapshot.overview.open_frictions.value, 3.0);
        assert_eq!(snapshot.focus.unwrap().id, "f1");
        assert_eq!(snapshot.benchmarks.len(), 1);
    }

    #[test]
    fn test_assemble_with_missing_inputs() {
        let snapshot = DashboardSnapshot::assemble(DashboardInputs {
            org_records: None,
            team_records: Some(vec![MetricRecord::team("a", "2024-05-01").with_devex(50.0)]),
            benchmarks: None,
            frictions: None,
        });

        assert_eq!(
            snapshot.issues,
            vec![LoadIssue::OrgMetrics, LoadIssue::Benchmarks, LoadIssue::Frictions]
        );
        assert_eq!(snapshot.organization, None);
        assert_eq!(snapshot.teams.len(), 1);
        assert_eq!(snapshot.aggregates.average_devex, 50.0);
        assert!(snapshot.focus.is_none());
        assert_eq!(LoadIssue::TeamMetrics.message(), "Failed to load team metrics");
    }

    #[test]
    fn test_assemble_nothing_arrived() {
        let snapshot = DashboardSnapshot::assemble(DashboardInputs::default());
        assert_eq!(snapshot.issues.len(), 4);
        assert!(snapshot.teams.is_empty());
        assert_eq!(snapshot.aggregates, AggregateSnapshot::default());
    }
}
