//! Friction catalog and display classification.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::types::{Friction, FrictionStatus};

/// Severity at or above which a friction is flagged as high.
pub const HIGH_SEVERITY_THRESHOLD: u8 = 4;

/// Severity bucket used to pick a display affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum SeverityClass {
    High,
    Normal,
}

/// Status bucket used to pick a display affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    /// Resolved
    Positive,
    /// Being worked on
    Attention,
    /// Open, or a status this crate does not know
    Neutral,
}

/// `High` iff severity >= 4.
pub fn severity_class(friction: &Friction) -> SeverityClass {
    if friction.severity >= HIGH_SEVERITY_THRESHOLD {
        SeverityClass::High
    } else {
        SeverityClass::Normal
    }
}

/// `Positive` for resolved, `Attention` for active, `Neutral` otherwise.
pub fn status_class(friction: &Friction) -> StatusClass {
    match friction.status {
        FrictionStatus::Resolved => StatusClass::Positive,
        FrictionStatus::Active => StatusClass::Attention,
        FrictionStatus::Open | FrictionStatus::Unknown(_) => StatusClass::Neutral,
    }
}

/// The current set of frictions, in source order.
#[derive(Debug, Clone, Default)]
pub struct FrictionCatalog {
    frictions: Vec<Friction>,
}

impl FrictionCatalog {
    /// Create a catalog from the records supplied by the source.
    pub fn new(frictions: Vec<Friction>) -> Self {
        Self { frictions }
    }

    /// Look up a friction by id.
    ///
    /// Unknown ids return `None`; what to do instead is up to the caller.
    pub fn select(&self, friction_id: &str) -> Option<&Friction> {
        let found = self.frictions.iter().find(|f| f.id == friction_id);
        if found.is_none() {
            tracing::debug!(friction_id = %friction_id, "Friction not in catalog");
        }
        found
    }

    pub fn len(&self) -> usize {
        self.frictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frictions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Friction> {
        self.frictions.iter()
    }

    /// Frictions with the given status.
    pub fn by_status(&self, status: &FrictionStatus) -> Vec<&Friction> {
        self.frictions.iter().filter(|f| &f.status == status).collect()
    }

    /// Frictions in a category (case-insensitive).
    pub fn by_category(&self, category: &str) -> Vec<&Friction> {
        let wanted = category.trim().to_lowercase();
        self.frictions
            .iter()
            .filter(|f| f.category.trim().to_lowercase() == wanted)
            .collect()
    }

    /// Count of frictions not yet resolved.
    pub fn open_count(&self) -> usize {
        self.frictions
            .iter()
            .filter(|f| f.status != FrictionStatus::Resolved)
            .count()
    }

    /// Highest-severity friction; the first one listed wins ties.
    pub fn most_severe(&self) -> Option<&Friction> {
        self.frictions
            .iter()
            .fold(None, |best: Option<&Friction>, f| match best {
                Some(b) if b.severity >= f.severity => Some(b),
                _ => Some(f),
            })
    }

    pub fn into_inner(self) -> Vec<Friction> {
        self.frictions
    }
}

impl From<Vec<Friction>> for FrictionCatalog {
    fn from(frictions: Vec<Friction>) -> Self {
        Self::new(frictions)
    }
}
