//! Query façade: stateless entry points over the catalog and calculator.
//!
//! The engine owns the validated catalog, takes every reference instant as
//! an explicit parameter, and returns structured results for a presentation
//! layer to render. Same inputs, same outputs; safe to call concurrently.

pub mod error;

pub use error::QueryError;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use skysched_catalog::{Catalog, RecurrencePattern};
use skysched_compute::{
    next_matching_occurrence, occurrences_covering, NextOccurrence, Occurrence, SelectedVariant,
    VariantFilter,
};
use skysched_core::time::duration_secs_opt;
use skysched_core::DEFAULT_LOOKAHEAD_DAYS;

/// Snapshot of one pattern at a reference instant. Constructed fresh per
/// query and handed to the presentation layer; never stored.
#[derive(Debug, Clone, Serialize)]
pub struct PatternStatus {
    pub pattern_id: String,
    pub name: String,
    pub reference: DateTime<Utc>,
    pub variant: Option<SelectedVariant>,
    pub occurrences: Vec<Occurrence>,
    /// Index of the occurrence containing `reference`, boundaries
    /// inclusive.
    pub active_index: Option<usize>,
    /// Countdown to the nearest boundary: the active occurrence's end, or
    /// the next start. None when the lookahead window holds nothing.
    #[serde(with = "duration_secs_opt")]
    pub until_next_boundary: Option<Duration>,
}

/// Stateless query entry points over a validated catalog.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    catalog: Catalog,
    lookahead_days: u32,
}

impl QueryEngine {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
        }
    }

    /// Override the next-occurrence search bound.
    pub fn with_lookahead(mut self, days: u32) -> Self {
        self.lookahead_days = days;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn pattern(&self, id: &str) -> Result<&RecurrencePattern, QueryError> {
        self.catalog
            .get(id)
            .ok_or_else(|| QueryError::UnknownPattern(id.to_string()))
    }

    /// Current status of a pattern at `at`: relevant occurrences, which one
    /// (if any) contains the instant, and the countdown to the nearest
    /// boundary.
    pub fn status_at(&self, pattern_id: &str, at: DateTime<Utc>) -> Result<PatternStatus, QueryError> {
        let pattern = self.pattern(pattern_id)?;
        let set = occurrences_covering(pattern, at);

        let active_index = set.occurrences.iter().position(|o| o.contains(at));
        let until_next_boundary = match active_index {
            Some(i) => Some(set.occurrences[i].end.signed_duration_since(at)),
            None => set
                .occurrences
                .iter()
                .find(|o| o.start > at)
                .map(|o| o.start.signed_duration_since(at))
                .or_else(|| self.upcoming_start(pattern, at)),
        };

        debug!(pattern_id, active = ?active_index, "status computed");

        Ok(PatternStatus {
            pattern_id: pattern_id.to_string(),
            name: pattern.name.clone(),
            reference: at,
            variant: set.variant,
            occurrences: set.occurrences,
            active_index,
            until_next_boundary,
        })
    }

    /// Next occurrence of a pattern ending strictly after `from`,
    /// optionally restricted to a variant class.
    pub fn next_matching(
        &self,
        pattern_id: &str,
        filter: Option<VariantFilter>,
        from: DateTime<Utc>,
    ) -> Result<NextOccurrence, QueryError> {
        let pattern = self.pattern(pattern_id)?;
        if filter.is_some() && !pattern.has_variants() {
            return Err(QueryError::FilterUnsupported(pattern_id.to_string()));
        }
        Ok(next_matching_occurrence(
            pattern,
            from,
            filter.as_ref(),
            self.lookahead_days,
        ))
    }

    /// Countdown fallback for days whose own schedule is over (or absent):
    /// the bounded forward search.
    fn upcoming_start(&self, pattern: &RecurrencePattern, at: DateTime<Utc>) -> Option<Duration> {
        match next_matching_occurrence(pattern, at, None, self.lookahead_days) {
            NextOccurrence::Found(found) => {
                Some(found.occurrence.start.signed_duration_since(at))
            }
            NextOccurrence::Exhausted { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests;
