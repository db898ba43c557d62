use std::collections::HashSet;
use std::path::Path;

use chrono::Duration;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::CatalogError;
use crate::pattern::{
    Recurrence, RecurrencePattern, RotationSpec, ShardColor, VariantSelector, WindowOffsets,
};

/// Ordered, keyed collection of recurrence patterns.
///
/// Loaded once at startup and read-only afterwards. Construction validates
/// every pattern, so downstream calculators never see a malformed one.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    patterns: IndexMap<String, RecurrencePattern>,
}

/// On-disk shape of a catalog file. Deserialization goes through
/// `Catalog::new` so file-loaded catalogs get the same validation as
/// code-literal ones.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    patterns: IndexMap<String, RecurrencePattern>,
}

impl Catalog {
    /// Validate and wrap a pattern collection. Fails fast on the first
    /// malformed pattern rather than defaulting anything silently.
    pub fn new(patterns: IndexMap<String, RecurrencePattern>) -> Result<Self, CatalogError> {
        for (id, pattern) in &patterns {
            validate_pattern(id, pattern)?;
        }

        let rotating = patterns.values().filter(|p| p.has_variants()).count();
        info!(
            "catalog loaded: {} patterns ({} rotating)",
            patterns.len(),
            rotating
        );

        Ok(Self { patterns })
    }

    /// Parse a declarative TOML catalog.
    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(raw)?;
        Self::new(file.patterns)
    }

    /// Load a catalog file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn get(&self, id: &str) -> Option<&RecurrencePattern> {
        self.patterns.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.patterns.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Patterns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecurrencePattern)> {
        self.patterns.iter().map(|(id, p)| (id.as_str(), p))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }
}

fn validate_pattern(id: &str, pattern: &RecurrencePattern) -> Result<(), CatalogError> {
    let window = &pattern.window;
    if window.end <= Duration::zero() {
        return Err(CatalogError::invalid(id, "window end offset must be positive"));
    }
    let mut prev = Duration::zero();
    for marker in &window.markers {
        if *marker <= prev {
            return Err(CatalogError::invalid(
                id,
                "marker offsets must be positive and strictly increasing",
            ));
        }
        if *marker >= window.end {
            return Err(CatalogError::invalid(
                id,
                "marker offsets must fall before the window end",
            ));
        }
        prev = *marker;
    }

    match &pattern.recurrence {
        Recurrence::FixedDaily { anchor } => {
            if !anchor.is_valid() {
                return Err(CatalogError::invalid(id, "anchor is not a valid wall-clock time"));
            }
        }
        Recurrence::IntervalFromMidnight { minute, interval } => {
            if *minute >= 60 {
                return Err(CatalogError::invalid(id, "anchor minute must be below 60"));
            }
            validate_interval(id, *interval)?;
            validate_window_fits(id, window, *interval)?;
        }
        Recurrence::PhaseOffsetInterval { anchor, interval } => {
            if !anchor.is_valid() {
                return Err(CatalogError::invalid(id, "anchor is not a valid wall-clock time"));
            }
            validate_interval(id, *interval)?;
            validate_window_fits(id, window, *interval)?;
        }
        Recurrence::RotatingMultiDay(spec) => validate_rotation(id, spec, window)?,
    }

    Ok(())
}

fn validate_interval(id: &str, interval: Duration) -> Result<(), CatalogError> {
    // A zero or negative interval would make boundary advancement loop.
    if interval <= Duration::zero() {
        return Err(CatalogError::invalid(id, "interval must be positive"));
    }
    Ok(())
}

fn validate_window_fits(
    id: &str,
    window: &WindowOffsets,
    interval: Duration,
) -> Result<(), CatalogError> {
    // A window outlasting the interval would overlap the next occurrence.
    if window.end > interval {
        return Err(CatalogError::invalid(
            id,
            "window end offset must not exceed the recurrence interval",
        ));
    }
    Ok(())
}

fn validate_rotation(
    id: &str,
    spec: &RotationSpec,
    window: &WindowOffsets,
) -> Result<(), CatalogError> {
    if spec.variants.is_empty() {
        return Err(CatalogError::invalid(id, "variant cycle must not be empty"));
    }

    let mut labels = HashSet::new();
    for variant in &spec.variants {
        if !labels.insert(variant.label.as_str()) {
            return Err(CatalogError::invalid(
                id,
                format!("duplicate variant label '{}'", variant.label),
            ));
        }
        validate_interval(id, variant.interval)?;
        validate_window_fits(id, window, variant.interval)?;
        if variant.offset < Duration::zero() {
            return Err(CatalogError::invalid(
                id,
                format!("variant '{}' has a negative day offset", variant.label),
            ));
        }
        for weekday in &variant.excluded_weekdays {
            if !(1..=7).contains(weekday) {
                return Err(CatalogError::invalid(
                    id,
                    format!(
                        "variant '{}' excludes weekday {} (expected ISO 1..=7)",
                        variant.label, weekday
                    ),
                ));
            }
        }
        if !variant.maps.is_empty() && variant.maps.len() != spec.realms.len() {
            return Err(CatalogError::invalid(
                id,
                format!(
                    "variant '{}' has {} maps but the realm cycle has {}",
                    variant.label,
                    variant.maps.len(),
                    spec.realms.len()
                ),
            ));
        }
    }

    if spec.selector == VariantSelector::ColorSplit {
        let has_black = spec.variants.iter().any(|v| v.color == ShardColor::Black);
        let has_red = spec.variants.iter().any(|v| v.color == ShardColor::Red);
        if !has_black || !has_red {
            return Err(CatalogError::invalid(
                id,
                "color-split selection needs at least one variant of each color",
            ));
        }
    }

    Ok(())
}
