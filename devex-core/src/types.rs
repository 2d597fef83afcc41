//! Record types supplied by the upstream data source.
//!
//! These arrive already decoded by the caller's transport. Decoding is
//! forgiving: missing, null, or non-numeric optional values become `None`
//! instead of rejecting the whole payload, and out-of-range severities are
//! clamped. Field names follow the backend's snake_case wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::instant::parse_instant;

/// Organizational level a measurement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScopeLevel {
    /// Whole-organization measurement
    #[serde(rename = "org", alias = "organization")]
    Organization,
    /// Single team measurement
    #[default]
    Team,
}

impl ScopeLevel {
    /// Wire value used in `level=` query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Organization => "org",
            Self::Team => "team",
        }
    }

    /// Parse a wire value, accepting both `org` and `organization`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "org" | "organization" => Some(Self::Organization),
            "team" => Some(Self::Team),
            _ => None,
        }
    }
}

/// One measurement for one scope at one point in time.
///
/// Several records may exist per `scope_id`; the current one is the record
/// with the latest `captured_at` (see [`crate::metrics`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "wire::MetricRecordWire")]
pub struct MetricRecord {
    /// Team or organization id (`team_id` / `org_id` on the wire)
    pub scope_id: String,
    /// Level of the scope (`level` on the wire)
    pub scope_level: ScopeLevel,
    /// When the measurement was taken, as sent by the source (`date` on the wire)
    pub captured_at: String,
    /// DevEx score (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devex_score: Option<f64>,
    /// Motivation (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivation: Option<f64>,
    /// Hours lost to friction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wasted_time_hours: Option<f64>,
    /// Delta against the prior period (organization level)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<f64>,
}

impl MetricRecord {
    /// Create a record with no metric values.
    pub fn new(
        scope_id: impl Into<String>,
        scope_level: ScopeLevel,
        captured_at: impl Into<String>,
    ) -> Self {
        Self {
            scope_id: scope_id.into(),
            scope_level,
            captured_at: captured_at.into(),
            devex_score: None,
            motivation: None,
            wasted_time_hours: None,
            trend: None,
        }
    }

    /// Create a team-level record.
    pub fn team(scope_id: impl Into<String>, captured_at: impl Into<String>) -> Self {
        Self::new(scope_id, ScopeLevel::Team, captured_at)
    }

    /// Create an organization-level record.
    pub fn organization(scope_id: impl Into<String>, captured_at: impl Into<String>) -> Self {
        Self::new(scope_id, ScopeLevel::Organization, captured_at)
    }

    /// Builder: set the DevEx score.
    pub fn with_devex(mut self, score: f64) -> Self {
        self.devex_score = Some(score);
        self
    }

    /// Builder: set motivation.
    pub fn with_motivation(mut self, motivation: f64) -> Self {
        self.motivation = Some(motivation);
        self
    }

    /// Builder: set wasted hours.
    pub fn with_wasted_hours(mut self, hours: f64) -> Self {
        self.wasted_time_hours = Some(hours);
        self
    }

    /// Builder: set the trend delta.
    pub fn with_trend(mut self, trend: f64) -> Self {
        self.trend = Some(trend);
        self
    }

    /// Parsed capture time, or `None` when the source value is malformed.
    pub fn captured_instant(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.captured_at)
    }
}

/// A team as listed by the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "wire::TeamWire")]
pub struct Team {
    pub id: String,
    pub name: String,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Lifecycle state of a friction.
///
/// Transitions happen upstream. Values this crate does not recognize are
/// kept verbatim in [`FrictionStatus::Unknown`] and rendered neutrally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FrictionStatus {
    Open,
    Active,
    Resolved,
    Unknown(String),
}

impl FrictionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Active => "active",
            Self::Resolved => "resolved",
            Self::Unknown(raw) => raw,
        }
    }
}

impl Default for FrictionStatus {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<String> for FrictionStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "open" => Self::Open,
            "active" => Self::Active,
            "resolved" => Self::Resolved,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<FrictionStatus> for String {
    fn from(status: FrictionStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Lowest friction severity.
pub const MIN_SEVERITY: u8 = 1;
/// Highest friction severity.
pub const MAX_SEVERITY: u8 = 5;

/// A recorded obstacle to developer productivity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "wire::FrictionWire")]
pub struct Friction {
    pub id: String,
    pub title: String,
    /// Free-form classification (e.g. "tooling", "process")
    pub category: String,
    /// Always within [`MIN_SEVERITY`, `MAX_SEVERITY`]
    pub severity: u8,
    pub status: FrictionStatus,
}

impl Friction {
    /// Create a friction; severity is clamped into range.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        severity: u8,
        status: FrictionStatus,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            severity: severity.clamp(MIN_SEVERITY, MAX_SEVERITY),
            status,
        }
    }
}

/// Forgiving field decoders for upstream payloads.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{FrictionStatus, ScopeLevel, MAX_SEVERITY, MIN_SEVERITY};

    fn as_number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|n| n.is_finite())
    }

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(as_number))
    }

    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => s,
            _ => String::new(),
        })
    }

    pub fn severity<'de, D>(deserializer: D) -> Result<u8, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(as_number)
            .map(|n| n.round().clamp(MIN_SEVERITY as f64, MAX_SEVERITY as f64) as u8)
            .unwrap_or(MIN_SEVERITY))
    }

    pub fn scope_level<'de, D>(deserializer: D) -> Result<Option<ScopeLevel>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => ScopeLevel::parse(&s),
            _ => None,
        })
    }

    /// Null or non-string statuses become `Unknown("")`.
    pub fn status<'de, D>(deserializer: D) -> Result<FrictionStatus, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => FrictionStatus::from(s),
            _ => FrictionStatus::default(),
        })
    }
}

/// Wire shapes accepted from the backend.
///
/// Every alias is its own field so a payload carrying more than one of them
/// (`_id` and `id`, `team_id` and `scope_id`) still decodes; the first
/// non-empty value wins.
mod wire {
    use serde::Deserialize;

    use super::{lenient, Friction, FrictionStatus, MetricRecord, ScopeLevel, Team, MIN_SEVERITY};

    fn first_non_empty<const N: usize>(candidates: [String; N]) -> String {
        candidates
            .into_iter()
            .find(|c| !c.is_empty())
            .unwrap_or_default()
    }

    #[derive(Deserialize)]
    pub struct MetricRecordWire {
        #[serde(default, deserialize_with = "lenient::text")]
        scope_id: String,
        #[serde(default, deserialize_with = "lenient::text")]
        team_id: String,
        #[serde(default, deserialize_with = "lenient::text")]
        org_id: String,
        #[serde(default, deserialize_with = "lenient::scope_level")]
        scope_level: Option<ScopeLevel>,
        #[serde(default, deserialize_with = "lenient::scope_level")]
        level: Option<ScopeLevel>,
        #[serde(default, deserialize_with = "lenient::text")]
        captured_at: String,
        #[serde(default, deserialize_with = "lenient::text")]
        date: String,
        #[serde(default, deserialize_with = "lenient::number")]
        devex_score: Option<f64>,
        #[serde(default, deserialize_with = "lenient::number")]
        motivation: Option<f64>,
        #[serde(default, deserialize_with = "lenient::number")]
        wasted_time_hours: Option<f64>,
        #[serde(default, deserialize_with = "lenient::number")]
        trend: Option<f64>,
    }

    impl From<MetricRecordWire> for MetricRecord {
        fn from(w: MetricRecordWire) -> Self {
            Self {
                scope_id: first_non_empty([w.scope_id, w.team_id, w.org_id]),
                scope_level: w.scope_level.or(w.level).unwrap_or_default(),
                captured_at: first_non_empty([w.captured_at, w.date]),
                devex_score: w.devex_score,
                motivation: w.motivation,
                wasted_time_hours: w.wasted_time_hours,
                trend: w.trend,
            }
        }
    }

    #[derive(Deserialize)]
    pub struct TeamWire {
        #[serde(default, deserialize_with = "lenient::text")]
        id: String,
        #[serde(default, rename = "_id", deserialize_with = "lenient::text")]
        mongo_id: String,
        #[serde(default, deserialize_with = "lenient::text")]
        name: String,
    }

    impl From<TeamWire> for Team {
        fn from(w: TeamWire) -> Self {
            Self {
                id: first_non_empty([w.id, w.mongo_id]),
                name: w.name,
            }
        }
    }

    #[derive(Deserialize)]
    pub struct FrictionWire {
        #[serde(default, deserialize_with = "lenient::text")]
        id: String,
        #[serde(default, rename = "_id", deserialize_with = "lenient::text")]
        mongo_id: String,
        #[serde(default, deserialize_with = "lenient::text")]
        title: String,
        #[serde(default, deserialize_with = "lenient::text")]
        category: String,
        #[serde(default = "min_severity", deserialize_with = "lenient::severity")]
        severity: u8,
        #[serde(default, deserialize_with = "lenient::status")]
        status: FrictionStatus,
    }

    fn min_severity() -> u8 {
        MIN_SEVERITY
    }

    impl From<FrictionWire> for Friction {
        fn from(w: FrictionWire) -> Self {
            Self {
                id: first_non_empty([w.id, w.mongo_id]),
                title: w.title,
                category: w.category,
                severity: w.severity,
                status: w.status,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metric_record_from_team_payload() {
        let record: MetricRecord = serde_json::from_value(json!({
            "team_id": "64f0c0ffee0001",
            "level": "team",
            "date": "2024-05-01T10:00:00Z",
            "devex_score": 72,
            "motivation": 65.5,
            "wasted_time_hours": 3.25
        }))
        .unwrap();

        assert_eq!(record.scope_id, "64f0c0ffee0001");
        assert_eq!(record.scope_level, ScopeLevel::Team);
        assert_eq!(record.devex_score, Some(72.0));
        assert_eq!(record.motivation, Some(65.5));
        assert_eq!(record.wasted_time_hours, Some(3.25));
        assert_eq!(record.trend, None);
        assert!(record.captured_instant().is_some());
    }

    #[test]
    fn test_metric_record_tolerates_bad_fields() {
        let record: MetricRecord = serde_json::from_value(json!({
            "team_id": "t1",
            "date": 12345,
            "devex_score": null,
            "motivation": "n/a",
            "wasted_time_hours": "4"
        }))
        .unwrap();

        assert_eq!(record.captured_at, "");
        assert_eq!(record.captured_instant(), None);
        assert_eq!(record.devex_score, None);
        assert_eq!(record.motivation, None);
        assert_eq!(record.wasted_time_hours, Some(4.0));
    }

    #[test]
    fn test_null_fields_do_not_reject_the_batch() {
        let records: Vec<MetricRecord> = serde_json::from_value(json!([
            {"team_id": "t1", "date": "2024-05-01", "devex_score": 70},
            {"team_id": null, "level": null, "date": null, "devex_score": 60}
        ]))
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].scope_id, "");
        assert_eq!(records[1].scope_level, ScopeLevel::Team);
        assert_eq!(records[1].devex_score, Some(60.0));

        let frictions: Vec<Friction> = serde_json::from_value(json!([
            {"_id": "f1", "title": "Slow CI", "category": "tooling", "severity": 4, "status": "open"},
            {"_id": "f2", "title": "Docs", "category": null, "status": null},
            {"_id": null, "title": 7, "status": 3}
        ]))
        .unwrap();
        assert_eq!(frictions.len(), 3);
        assert_eq!(frictions[1].category, "");
        assert_eq!(frictions[1].status, FrictionStatus::Unknown(String::new()));
        assert_eq!(frictions[2].id, "");
        assert_eq!(frictions[2].title, "");
        assert_eq!(frictions[2].status, FrictionStatus::default());

        let teams: Vec<Team> =
            serde_json::from_value(json!([{"_id": "T1", "name": null}, {"id": null}])).unwrap();
        assert_eq!(teams, vec![Team::new("T1", ""), Team::new("", "")]);
    }

    #[test]
    fn test_both_id_spellings_decode() {
        let friction: Friction =
            serde_json::from_value(json!({"_id": "f1", "id": "f1", "title": "Slow CI"})).unwrap();
        assert_eq!(friction.id, "f1");

        let team: Team = serde_json::from_value(json!({"_id": "T1", "id": "", "name": "Platform"}))
            .unwrap();
        assert_eq!(team.id, "T1");

        let record: MetricRecord = serde_json::from_value(json!({
            "scope_id": "t1",
            "team_id": "t1",
            "captured_at": "2024-05-01",
            "date": "2024-04-01"
        }))
        .unwrap();
        assert_eq!(record.scope_id, "t1");
        assert_eq!(record.captured_at, "2024-05-01");
    }

    #[test]
    fn test_record_round_trips_through_own_serialization() {
        let record = MetricRecord::organization("acme", "2024-05-01").with_trend(1.5);
        let back: MetricRecord =
            serde_json::from_value(serde_json::to_value(&record).unwrap()).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_org_level_aliases() {
        let record: MetricRecord = serde_json::from_value(json!({
            "org_id": "acme",
            "level": "organization",
            "captured_at": "2024-05-01",
            "trend": -1.5
        }))
        .unwrap();

        assert_eq!(record.scope_id, "acme");
        assert_eq!(record.scope_level, ScopeLevel::Organization);
        assert_eq!(record.trend, Some(-1.5));
    }

    #[test]
    fn test_friction_severity_is_clamped() {
        let high: Friction =
            serde_json::from_value(json!({"_id": "f1", "title": "Slow CI", "severity": 9}))
                .unwrap();
        let low: Friction =
            serde_json::from_value(json!({"_id": "f2", "title": "Docs", "severity": -3}))
                .unwrap();
        let missing: Friction =
            serde_json::from_value(json!({"_id": "f3", "title": "Onboarding"})).unwrap();

        assert_eq!(high.severity, 5);
        assert_eq!(low.severity, 1);
        assert_eq!(missing.severity, 1);
        assert_eq!(Friction::new("f4", "x", "y", 0, FrictionStatus::Open).severity, 1);
    }

    #[test]
    fn test_friction_status_keeps_unknown_values() {
        let friction: Friction = serde_json::from_value(json!({
            "_id": "f1",
            "title": "Flaky tests",
            "category": "testing",
            "severity": 4,
            "status": "blocked"
        }))
        .unwrap();

        assert_eq!(friction.status, FrictionStatus::Unknown("blocked".to_string()));
        assert_eq!(serde_json::to_value(&friction.status).unwrap(), json!("blocked"));
    }

    #[test]
    fn test_team_accepts_mongo_id() {
        let team: Team = serde_json::from_value(json!({"_id": "T1", "name": "Platform"})).unwrap();
        assert_eq!(team, Team::new("T1", "Platform"));
    }

    #[test]
    fn test_scope_level_parse() {
        assert_eq!(ScopeLevel::parse("ORG"), Some(ScopeLevel::Organization));
        assert_eq!(ScopeLevel::parse("team"), Some(ScopeLevel::Team));
        assert_eq!(ScopeLevel::parse("division"), None);
        assert_eq!(ScopeLevel::Organization.as_str(), "org");
    }
}
