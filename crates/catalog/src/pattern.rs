use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use skysched_core::time::{duration_secs, duration_secs_list};
use skysched_core::TimeOfDay;

/// Shard eruption class. Red shards run on the shorter cadence and carry a
/// candle reward; black shards run on the longer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShardColor {
    Black,
    Red,
}

impl fmt::Display for ShardColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShardColor::Black => write!(f, "black"),
            ShardColor::Red => write!(f, "red"),
        }
    }
}

impl FromStr for ShardColor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "black" => Ok(ShardColor::Black),
            "red" => Ok(ShardColor::Red),
            other => Err(format!("unknown shard color: '{}'", other)),
        }
    }
}

/// One member of a rotating cycle. Governs every calendar day the pattern's
/// selector maps onto it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub label: String,
    pub color: ShardColor,
    /// ISO weekday numbers (1 = Mon .. 7 = Sun) with no occurrence.
    #[serde(default)]
    pub excluded_weekdays: Vec<u8>,
    /// From local day start to the first occurrence, in seconds.
    #[serde(with = "duration_secs")]
    pub offset: Duration,
    /// Between successive occurrence starts, in seconds.
    #[serde(with = "duration_secs")]
    pub interval: Duration,
    /// Map names, indexed by the realm cycle position.
    #[serde(default)]
    pub maps: Vec<String>,
    /// Ascended candle reward (red shards only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<f64>,
}

/// How a rotating pattern maps a cycle-day index onto a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantSelector {
    /// `variants[day_index mod len]`.
    RoundRobin,
    /// Two-tier: odd day index selects among the red variants, even among
    /// the black; within the color, `(day_index div 2) mod pool_len` in
    /// declaration order.
    ColorSplit,
}

/// Rotating multi-day cycle description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationSpec {
    /// Epoch anchor date: cycle day 0, in the pattern's timezone.
    pub epoch: NaiveDate,
    pub selector: VariantSelector,
    /// Auxiliary name cycle (realms), period `realms.len()`.
    #[serde(default)]
    pub realms: Vec<String>,
    pub variants: Vec<Variant>,
}

/// Recurrence kind plus the anchor/interval data that kind requires.
/// Required fields are enforced by the variant shape itself, so a pattern
/// that deserializes is structurally complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recurrence {
    /// Once per day at a fixed wall-clock time.
    FixedDaily { anchor: TimeOfDay },
    /// Every `interval`, anchored `minute` minutes past local midnight.
    IntervalFromMidnight {
        minute: u32,
        #[serde(with = "duration_secs")]
        interval: Duration,
    },
    /// Every `interval`, anchored at a declared wall-clock phase.
    PhaseOffsetInterval {
        anchor: TimeOfDay,
        #[serde(with = "duration_secs")]
        interval: Duration,
    },
    /// Variant chosen per calendar day from a rotating cycle.
    RotatingMultiDay(RotationSpec),
}

impl Recurrence {
    /// Short kind label for listings and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Recurrence::FixedDaily { .. } => "fixed_daily",
            Recurrence::IntervalFromMidnight { .. } => "interval_from_midnight",
            Recurrence::PhaseOffsetInterval { .. } => "phase_offset_interval",
            Recurrence::RotatingMultiDay(_) => "rotating_multi_day",
        }
    }
}

/// Offsets from occurrence start to intermediate marker(s) and to end,
/// in seconds. Markers must fall strictly inside the window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowOffsets {
    #[serde(default, with = "duration_secs_list")]
    pub markers: Vec<Duration>,
    #[serde(with = "duration_secs")]
    pub end: Duration,
}

/// One recurring timer. Keyed by a stable string id in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrencePattern {
    /// Display name.
    pub name: String,
    /// Authoritative timezone. All day-boundary arithmetic happens here,
    /// never in the caller's local zone.
    pub tz: Tz,
    pub recurrence: Recurrence,
    pub window: WindowOffsets,
}

impl RecurrencePattern {
    /// Whether the pattern carries a rotating variant cycle.
    pub fn has_variants(&self) -> bool {
        matches!(self.recurrence, Recurrence::RotatingMultiDay(_))
    }

    pub fn rotation(&self) -> Option<&RotationSpec> {
        match &self.recurrence {
            Recurrence::RotatingMultiDay(spec) => Some(spec),
            _ => None,
        }
    }
}
