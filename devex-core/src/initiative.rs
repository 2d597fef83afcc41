//! Initiative drafting and validation.
//!
//! An [`InitiativeDraft`] is the single-editor working copy behind the
//! "create initiative" form. [`InitiativeBuilder::build`] normalizes it into
//! an [`Initiative`] ready for submission. Normalization rules, in order:
//!
//! 1. Blank title: `"Resolve: <friction title>"` when a friction is linked,
//!    otherwise [`DEFAULT_TITLE`]. Never an error.
//! 2. Scope must be `team` or `organization` (`org`), otherwise
//!    [`ValidationFailure::InvalidScope`].
//! 3. Team scope without a team id falls back to the first loaded team, or
//!    stays `None` when no teams are loaded. Organization scope drops it.
//! 4. Blank owner becomes [`DEFAULT_OWNER`].
//! 5. A date-only target date becomes midnight UTC; absent stays `None`.
//! 6. Blank goals and success metrics are dropped, order kept.
//! 7. Status is `planned` and progress is 0.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::instant::parse_instant;
use crate::types::{Friction, Team};

/// Title used when there is neither a user title nor a linked friction.
pub const DEFAULT_TITLE: &str = "DevEx Initiative";
/// Owner used when the owner field is left blank.
pub const DEFAULT_OWNER: &str = "You";

const TACKLE_PREFIX: &str = "Tackle: ";
const RESOLVE_PREFIX: &str = "Resolve: ";

/// Goals suggested when a draft is opened from scratch.
pub const SUGGESTED_GOALS: &[&str] = &["Reduce flaky tests", "Cut cycle time by 20%"];
/// Success metrics suggested when a draft is opened from scratch.
pub const SUGGESTED_SUCCESS_METRICS: &[&str] = &["DevEx +5", "Wasted time -10%"];

/// Classification of validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidScope,
}

/// Hard validation failure raised by [`InitiativeBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    /// Scope is neither team nor organization
    #[error("Invalid scope {0:?}: expected \"team\" or \"organization\"")]
    InvalidScope(String),
}

impl ValidationFailure {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidScope(_) => ErrorKind::InvalidScope,
        }
    }
}

/// Organizational unit an initiative targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum InitiativeScope {
    Team,
    #[serde(rename = "org", alias = "organization")]
    Organization,
}

impl InitiativeScope {
    /// Wire value sent to the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Team => "team",
            Self::Organization => "org",
        }
    }
}

impl fmt::Display for InitiativeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InitiativeScope {
    type Err = ValidationFailure;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "team" => Ok(Self::Team),
            "org" | "organization" => Ok(Self::Organization),
            other => Err(ValidationFailure::InvalidScope(other.to_string())),
        }
    }
}

/// Initiative status. Only `planned` can be produced at creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum InitiativeStatus {
    #[default]
    Planned,
}

/// A validated initiative, ready to hand to the submission collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Initiative {
    pub title: String,
    /// Linked friction, by reference only
    pub friction_id: Option<String>,
    pub scope: InitiativeScope,
    /// Set only for team scope; may still be `None` when no teams are known
    pub team_id: Option<String>,
    pub owner: String,
    pub target_date: Option<DateTime<Utc>>,
    pub goals: Vec<String>,
    pub success_metrics: Vec<String>,
    pub status: InitiativeStatus,
    pub progress: u8,
}

/// Title a linked friction suggests, before any user edit.
pub fn derive_default_title(friction: Option<&Friction>) -> String {
    match friction {
        Some(f) => format!("{TACKLE_PREFIX}{}", f.title),
        None => DEFAULT_TITLE.to_string(),
    }
}

/// The in-progress, user-edited precursor to an [`Initiative`].
///
/// The title is auto-derived from the linked friction until the user edits
/// it; after that, relinking never overwrites it.
#[derive(Debug, Clone, PartialEq)]
pub struct InitiativeDraft {
    title: String,
    title_edited: bool,
    friction: Option<Friction>,
    /// Raw scope as chosen in the form
    pub scope: String,
    pub team_id: Option<String>,
    pub owner: String,
    /// Date-only input, e.g. `2025-03-31`
    pub target_date_input: Option<String>,
    pub goals: Vec<String>,
    pub success_metrics: Vec<String>,
}

impl Default for InitiativeDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            title_edited: false,
            friction: None,
            scope: InitiativeScope::Team.as_str().to_string(),
            team_id: None,
            owner: String::new(),
            target_date_input: None,
            goals: Vec::new(),
            success_metrics: Vec::new(),
        }
    }
}

impl InitiativeDraft {
    /// Create an empty team-scoped draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a draft pre-filled with the suggested goals and metrics.
    pub fn seeded() -> Self {
        Self {
            goals: SUGGESTED_GOALS.iter().map(|s| s.to_string()).collect(),
            success_metrics: SUGGESTED_SUCCESS_METRICS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ..Self::default()
        }
    }

    /// Create a draft opened from a selected friction.
    pub fn for_friction(friction: Friction) -> Self {
        let mut draft = Self::seeded();
        draft.link_friction(Some(friction));
        draft
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the user has typed into the title field.
    pub fn title_edited(&self) -> bool {
        self.title_edited
    }

    pub fn friction(&self) -> Option<&Friction> {
        self.friction.as_ref()
    }

    /// Record a user edit of the title. Disables auto-derivation.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.title_edited = true;
    }

    /// Change the linked friction, re-deriving the title if it is untouched.
    pub fn link_friction(&mut self, friction: Option<Friction>) {
        self.friction = friction;
        if !self.title_edited {
            self.title = derive_default_title(self.friction.as_ref());
            tracing::debug!(title = %self.title, "Derived initiative title from friction link");
        }
    }

    /// Builder: set scope.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Builder: set team id.
    pub fn with_team(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    /// Builder: set owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Builder: set target date input.
    pub fn with_target_date(mut self, input: impl Into<String>) -> Self {
        self.target_date_input = Some(input.into());
        self
    }

    /// Builder: replace goals.
    pub fn with_goals<I, S>(mut self, goals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.goals = goals.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: replace success metrics.
    pub fn with_success_metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.success_metrics = metrics.into_iter().map(Into::into).collect();
        self
    }

    /// Append an empty goal row.
    pub fn add_goal(&mut self) {
        self.goals.push(String::new());
    }

    /// Edit a goal row. Out-of-range indices are ignored.
    pub fn update_goal(&mut self, index: usize, value: impl Into<String>) {
        if let Some(goal) = self.goals.get_mut(index) {
            *goal = value.into();
        }
    }

    /// Append an empty success metric row.
    pub fn add_success_metric(&mut self) {
        self.success_metrics.push(String::new());
    }

    /// Edit a success metric row. Out-of-range indices are ignored.
    pub fn update_success_metric(&mut self, index: usize, value: impl Into<String>) {
        if let Some(metric) = self.success_metrics.get_mut(index) {
            *metric = value.into();
        }
    }

    /// True when building will consult the team list.
    pub fn needs_team_fallback(&self) -> bool {
        let team_scoped = matches!(
            self.scope.parse::<InitiativeScope>(),
            Ok(InitiativeScope::Team)
        );
        team_scoped && is_blank(self.team_id.as_deref())
    }
}

/// Normalizes drafts against the currently loaded team list.
#[derive(Debug, Clone, Copy)]
pub struct InitiativeBuilder<'a> {
    teams: &'a [Team],
}

impl<'a> InitiativeBuilder<'a> {
    pub fn new(teams: &'a [Team]) -> Self {
        Self { teams }
    }

    /// Validate and normalize a draft.
    pub fn build(&self, draft: &InitiativeDraft) -> Result<Initiative, ValidationFailure> {
        let friction = draft.friction.as_ref();

        let title = if draft.title.trim().is_empty() {
            match friction {
                Some(f) => format!("{RESOLVE_PREFIX}{}", f.title),
                None => DEFAULT_TITLE.to_string(),
            }
        } else {
            draft.title.clone()
        };

        let scope: InitiativeScope = draft.scope.parse()?;

        let team_id = match scope {
            InitiativeScope::Organization => None,
            InitiativeScope::Team => match draft.team_id.as_deref() {
                Some(id) if !id.trim().is_empty() => Some(id.to_string()),
                _ => self.first_team_id(),
            },
        };

        let owner = if draft.owner.trim().is_empty() {
            DEFAULT_OWNER.to_string()
        } else {
            draft.owner.clone()
        };

        let target_date = normalize_target_date(draft.target_date_input.as_deref());

        Ok(Initiative {
            title,
            friction_id: friction.map(|f| f.id.clone()),
            scope,
            team_id,
            owner,
            target_date,
            goals: normalize_entries(&draft.goals),
            success_metrics: normalize_entries(&draft.success_metrics),
            status: InitiativeStatus::Planned,
            progress: 0,
        })
    }

    fn first_team_id(&self) -> Option<String> {
        let fallback = self
            .teams
            .first()
            .map(|t| t.id.clone())
            .filter(|id| !id.is_empty());
        match &fallback {
            Some(id) => tracing::debug!(team_id = %id, "Defaulting initiative to first team"),
            None => tracing::debug!("No teams loaded, team-scoped initiative has no team"),
        }
        fallback
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn normalize_target_date(input: Option<&str>) -> Option<DateTime<Utc>> {
    let input = input.filter(|raw| !raw.trim().is_empty())?;
    let parsed = parse_instant(input);
    if parsed.is_none() {
        tracing::warn!(target_date = %input, "Ignoring unparseable target date");
    }
    parsed
}

fn normalize_entries(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| !entry.trim().is_empty())
        .cloned()
        .collect()
}
