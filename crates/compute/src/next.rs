use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use skysched_catalog::{RecurrencePattern, ShardColor};

use crate::calc::{day_start, occurrences_covering};
use crate::occurrence::{Occurrence, SelectedVariant};

/// Filter on the variant class of a rotating pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantFilter {
    Color(ShardColor),
}

impl VariantFilter {
    pub fn matches(&self, variant: &SelectedVariant) -> bool {
        match self {
            VariantFilter::Color(color) => variant.color == *color,
        }
    }
}

impl fmt::Display for VariantFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantFilter::Color(color) => write!(f, "{}", color),
        }
    }
}

impl FromStr for VariantFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(VariantFilter::Color(s.parse()?))
    }
}

/// A qualifying occurrence located by the bounded search.
#[derive(Debug, Clone, Serialize)]
pub struct FoundOccurrence {
    pub occurrence: Occurrence,
    pub variant: Option<SelectedVariant>,
}

/// Outcome of the bounded next-occurrence search.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NextOccurrence {
    Found(FoundOccurrence),
    /// The search window elapsed without a qualifying day. A normal,
    /// expected outcome for filters that cannot match soon, not an error.
    Exhausted { days_scanned: u32 },
}

impl NextOccurrence {
    pub fn found(&self) -> Option<&FoundOccurrence> {
        match self {
            NextOccurrence::Found(f) => Some(f),
            NextOccurrence::Exhausted { .. } => None,
        }
    }
}

/// Find the next occurrence whose end is strictly after `from`, advancing
/// day by day in the pattern's timezone.
///
/// Day 0 is probed with `from` itself; each later candidate day with its
/// own local day start. A day qualifies when the governing variant passes
/// `filter` (if any) and some occurrence of the day has not fully elapsed.
/// The search is hard-capped at `max_days` to guarantee termination.
pub fn next_matching_occurrence(
    pattern: &RecurrencePattern,
    from: DateTime<Utc>,
    filter: Option<&VariantFilter>,
    max_days: u32,
) -> NextOccurrence {
    let tz = pattern.tz;
    let start_date = from.with_timezone(&tz).date_naive();

    for day in 0..max_days {
        let probe = if day == 0 {
            from
        } else {
            day_start(tz, start_date + Duration::days(day as i64)).with_timezone(&Utc)
        };

        let set = occurrences_covering(pattern, probe);

        if let Some(f) = filter {
            match &set.variant {
                Some(v) if f.matches(v) => {}
                _ => continue,
            }
        }

        // A fully elapsed day is skipped; `end == from` counts as elapsed,
        // which keeps the search idempotent across the inclusive boundary.
        if let Some(occurrence) = set.occurrences.iter().find(|o| o.end > from) {
            debug!(day, start = %occurrence.start, "next occurrence found");
            return NextOccurrence::Found(FoundOccurrence {
                occurrence: occurrence.clone(),
                variant: set.variant,
            });
        }
    }

    debug!(max_days, "next occurrence search exhausted");
    NextOccurrence::Exhausted {
        days_scanned: max_days,
    }
}
