use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use skysched_catalog::{
    Recurrence, RecurrencePattern, RotationSpec, ShardColor, Variant, VariantSelector,
    WindowOffsets,
};
use skysched_core::TimeOfDay;

use crate::occurrence::{Occurrence, OccurrenceSet, SelectedVariant};

/// How many successive occurrences a single call computes, matching the
/// visibility of the upstream schedule (three eruptions per shard day).
pub const OCCURRENCE_COUNT: usize = 3;

/// Compute the occurrences relevant to `reference` for one pattern.
///
/// - `FixedDaily`: the single next daily instance (today's if still ahead,
///   otherwise tomorrow's).
/// - `IntervalFromMidnight` / `PhaseOffsetInterval`: the next
///   [`OCCURRENCE_COUNT`] interval boundaries strictly after `reference`.
/// - `RotatingMultiDay`: the governing variant's full day-anchored schedule
///   for the local calendar day containing `reference`; empty when the
///   variant excludes that weekday.
pub fn occurrences_covering(pattern: &RecurrencePattern, reference: DateTime<Utc>) -> OccurrenceSet {
    let tz = pattern.tz;
    let date = reference.with_timezone(&tz).date_naive();

    match &pattern.recurrence {
        Recurrence::FixedDaily { anchor } => {
            let mut start = local_instant(tz, date, *anchor);
            if start <= reference {
                // Daily events occur once per day; never compute more than
                // one future instance. At the end of the representable
                // calendar `succ_opt` saturates and today's elapsed
                // instance is returned unchanged.
                start = local_instant(tz, date.succ_opt().unwrap_or(date), *anchor);
            }
            OccurrenceSet {
                variant: None,
                occurrences: vec![decorate(start, &pattern.window)],
            }
        }
        Recurrence::IntervalFromMidnight { minute, interval } => {
            let first = day_start(tz, date) + Duration::minutes(*minute as i64);
            OccurrenceSet {
                variant: None,
                occurrences: interval_chain(first, *interval, reference, &pattern.window),
            }
        }
        Recurrence::PhaseOffsetInterval { anchor, interval } => {
            let first = local_instant(tz, date, *anchor);
            OccurrenceSet {
                variant: None,
                occurrences: interval_chain(first, *interval, reference, &pattern.window),
            }
        }
        Recurrence::RotatingMultiDay(spec) => rotating_day(spec, tz, &pattern.window, date),
    }
}

/// The schedule of a rotating pattern's calendar day. Day-anchored: the
/// same day always yields the same occurrences, wherever inside it the
/// reference instant falls.
fn rotating_day(
    spec: &RotationSpec,
    tz: Tz,
    window: &WindowOffsets,
    date: NaiveDate,
) -> OccurrenceSet {
    let day_index = date.signed_duration_since(spec.epoch).num_days();
    let variant = select_variant(spec, day_index);

    let realm = if spec.realms.is_empty() {
        None
    } else {
        let realm_idx = day_index.rem_euclid(spec.realms.len() as i64) as usize;
        Some(spec.realms[realm_idx].clone())
    };
    let map = match (&realm, variant.maps.is_empty()) {
        (Some(_), false) => {
            let realm_idx = day_index.rem_euclid(spec.realms.len() as i64) as usize;
            Some(variant.maps[realm_idx].clone())
        }
        _ => None,
    };

    let selected = SelectedVariant {
        label: variant.label.clone(),
        color: variant.color,
        realm,
        map,
        reward: variant.reward,
        day_index,
    };

    // Weekday exclusion uses the local calendar date, never the underlying
    // UTC timestamp.
    let weekday = date.weekday().number_from_monday() as u8;
    if variant.excluded_weekdays.contains(&weekday) {
        return OccurrenceSet {
            variant: Some(selected),
            occurrences: Vec::new(),
        };
    }

    let first = day_start(tz, date) + variant.offset;
    let occurrences = (0..OCCURRENCE_COUNT)
        .map(|i| decorate(first + variant.interval * i as i32, window))
        .collect();

    OccurrenceSet {
        variant: Some(selected),
        occurrences,
    }
}

/// Variant selection for a cycle-day index. Pool indexing is euclidean so
/// pre-epoch dates stay well-defined.
fn select_variant(spec: &RotationSpec, day_index: i64) -> &Variant {
    match spec.selector {
        VariantSelector::RoundRobin => {
            let idx = day_index.rem_euclid(spec.variants.len() as i64) as usize;
            &spec.variants[idx]
        }
        VariantSelector::ColorSplit => {
            let color = if day_index.rem_euclid(2) == 1 {
                ShardColor::Red
            } else {
                ShardColor::Black
            };
            // Catalog validation guarantees both pools are non-empty.
            let pool: Vec<&Variant> = spec
                .variants
                .iter()
                .filter(|v| v.color == color)
                .collect();
            let idx = day_index
                .div_euclid(2)
                .rem_euclid(pool.len() as i64) as usize;
            pool[idx]
        }
    }
}

/// The next `OCCURRENCE_COUNT` boundaries of an interval chain, starting
/// from the first boundary strictly after `reference`.
fn interval_chain(
    first: DateTime<Tz>,
    interval: Duration,
    reference: DateTime<Utc>,
    window: &WindowOffsets,
) -> Vec<Occurrence> {
    let mut start = first;
    while start <= reference {
        start += interval;
    }
    (0..OCCURRENCE_COUNT)
        .map(|i| decorate(start + interval * i as i32, window))
        .collect()
}

fn decorate(start: DateTime<Tz>, window: &WindowOffsets) -> Occurrence {
    Occurrence {
        start,
        markers: window.markers.iter().map(|m| start + *m).collect(),
        end: start + window.end,
    }
}

/// Local midnight of `date`. Midnight can fall inside a DST gap in some
/// zones; resolve to the earliest representable instant of the day.
pub(crate) fn day_start(tz: Tz, date: NaiveDate) -> DateTime<Tz> {
    let mut naive = date.and_time(NaiveTime::MIN);
    for _ in 0..4 {
        if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
            return dt;
        }
        naive += Duration::hours(1);
    }
    // Zones that skip an entire calendar day (Pacific/Apia dropped
    // 2011-12-30 crossing the date line) have no local instants on it at
    // all; anchor such a day at its UTC midnight.
    tz.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Resolve a wall-clock time on `date`. Falls back to day start plus the
/// nominal offset when the wall time lands in a DST gap.
fn local_instant(tz: Tz, date: NaiveDate, time: TimeOfDay) -> DateTime<Tz> {
    let naive = date.and_time(NaiveTime::MIN) + time.from_midnight();
    match tz.from_local_datetime(&naive).earliest() {
        Some(dt) => dt,
        None => day_start(tz, date) + time.from_midnight(),
    }
}
