use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use skysched_catalog::ShardColor;

/// One concrete time window during which a recurring event is active.
/// All instants are in the pattern's reference timezone.
#[derive(Debug, Clone, Serialize)]
pub struct Occurrence {
    pub start: DateTime<Tz>,
    /// Secondary instants inside the window (e.g. the shard landing).
    pub markers: Vec<DateTime<Tz>>,
    pub end: DateTime<Tz>,
}

impl Occurrence {
    /// Whether `t` falls inside the window. Inclusive on both boundaries.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }
}

/// The variant governing a rotating pattern's calendar day, decorated with
/// the day's realm/map rotation and reward.
#[derive(Debug, Clone, Serialize)]
pub struct SelectedVariant {
    pub label: String,
    pub color: ShardColor,
    pub realm: Option<String>,
    pub map: Option<String>,
    pub reward: Option<f64>,
    /// Days since the pattern's epoch anchor date (negative before it).
    pub day_index: i64,
}

/// Result of `occurrences_covering`: the occurrences relevant to the
/// reference instant, plus the selected variant for rotating patterns.
/// An applicable variant with an empty occurrence list means "no
/// occurrence today" (weekday exclusion).
#[derive(Debug, Clone, Serialize)]
pub struct OccurrenceSet {
    pub variant: Option<SelectedVariant>,
    pub occurrences: Vec<Occurrence>,
}
