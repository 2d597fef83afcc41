//! Metric reconciliation.
//!
//! The source may return several measurements per team (one per capture
//! time) in any order. [`reconcile_latest_per_scope`] folds them into one
//! current record per scope and [`compute_aggregates`] averages those.
//!
//! Ordering rules:
//! - The current record has the greatest capture time for its scope.
//! - On equal capture times the record seen first in the input wins.
//! - A malformed capture time sorts before every valid one; two malformed
//!   records tie, so again the first one seen wins.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::types::MetricRecord;

/// One current record per scope, in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct LatestByScope {
    /// scope_id -> slot in `records`
    index: HashMap<String, usize>,
    records: Vec<MetricRecord>,
    /// Parsed capture time per slot
    captured: Vec<Option<DateTime<Utc>>>,
}

impl LatestByScope {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a record; it replaces the current one only if strictly newer.
    pub fn offer(&mut self, candidate: MetricRecord) {
        let candidate_at = candidate.captured_instant();
        if candidate_at.is_none() {
            tracing::warn!(
                scope_id = %candidate.scope_id,
                captured_at = %candidate.captured_at,
                "Unparseable capture time, treating record as oldest"
            );
        }

        match self.index.get(&candidate.scope_id) {
            Some(&slot) => {
                // Option orders None below Some, so malformed times lose to valid ones.
                if candidate_at > self.captured[slot] {
                    tracing::debug!(
                        scope_id = %candidate.scope_id,
                        captured_at = %candidate.captured_at,
                        "Replacing current record with newer capture"
                    );
                    self.records[slot] = candidate;
                    self.captured[slot] = candidate_at;
                }
            }
            None => {
                self.index
                    .insert(candidate.scope_id.clone(), self.records.len());
                self.records.push(candidate);
                self.captured.push(candidate_at);
            }
        }
    }

    /// Current record for a scope.
    pub fn get(&self, scope_id: &str) -> Option<&MetricRecord> {
        self.index.get(scope_id).map(|&slot| &self.records[slot])
    }

    /// Check whether a scope is present.
    pub fn contains(&self, scope_id: &str) -> bool {
        self.index.contains_key(scope_id)
    }

    /// Number of distinct scopes.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Current records in order of first appearance.
    pub fn iter(&self) -> std::slice::Iter<'_, MetricRecord> {
        self.records.iter()
    }
}

impl FromIterator<MetricRecord> for LatestByScope {
    fn from_iter<I: IntoIterator<Item = MetricRecord>>(iter: I) -> Self {
        let mut latest = Self::new();
        for record in iter {
            latest.offer(record);
        }
        latest
    }
}

impl IntoIterator for LatestByScope {
    type Item = MetricRecord;
    type IntoIter = std::vec::IntoIter<MetricRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a LatestByScope {
    type Item = &'a MetricRecord;
    type IntoIter = std::slice::Iter<'a, MetricRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Fold raw records into exactly one current record per `scope_id`.
pub fn reconcile_latest_per_scope<I>(records: I) -> LatestByScope
where
    I: IntoIterator<Item = MetricRecord>,
{
    let latest: LatestByScope = records.into_iter().collect();
    tracing::debug!(scopes = latest.len(), "Reconciled metric records");
    latest
}

/// The single current record of a collection, ignoring scope ids.
///
/// Used for the organization snapshot, which is one scope by construction.
pub fn latest_record<I>(records: I) -> Option<MetricRecord>
where
    I: IntoIterator<Item = MetricRecord>,
{
    let mut current: Option<(MetricRecord, Option<DateTime<Utc>>)> = None;
    for record in records {
        let at = record.captured_instant();
        let newer = match &current {
            Some((_, best)) => at > *best,
            None => true,
        };
        if newer {
            current = Some((record, at));
        }
    }
    current.map(|(record, _)| record)
}

/// Organization-wide averages over the current team records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct AggregateSnapshot {
    pub average_devex: f64,
    pub average_motivation: f64,
    pub average_wasted_hours: f64,
}

/// Average each metric over `records`.
///
/// A missing field counts as 0 but the record still counts toward the
/// denominator, so gaps pull the average down. Empty input yields zeros.
pub fn compute_aggregates<'a, I>(records: I) -> AggregateSnapshot
where
    I: IntoIterator<Item = &'a MetricRecord>,
{
    let mut count = 0usize;
    let mut devex = 0.0;
    let mut motivation = 0.0;
    let mut wasted = 0.0;

    for record in records {
        count += 1;
        devex += record.devex_score.unwrap_or(0.0);
        motivation += record.motivation.unwrap_or(0.0);
        wasted += record.wasted_time_hours.unwrap_or(0.0);
    }

    if count == 0 {
        return AggregateSnapshot::default();
    }

    let n = count as f64;
    AggregateSnapshot {
        average_devex: devex / n,
        average_motivation: motivation / n,
        average_wasted_hours: wasted / n,
    }
}
