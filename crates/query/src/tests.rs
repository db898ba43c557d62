use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::America::Los_Angeles;
use chrono_tz::Asia::Kolkata;
use chrono_tz::Tz;

use skysched_catalog::{Catalog, ShardColor};
use skysched_compute::{NextOccurrence, VariantFilter};

use crate::{QueryEngine, QueryError};

fn engine() -> QueryEngine {
    QueryEngine::new(Catalog::builtin().expect("builtin catalog"))
}

fn instant(tz: Tz, y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    tz.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .expect("unambiguous local time")
        .with_timezone(&Utc)
}

#[test]
fn unknown_pattern_is_rejected() {
    let engine = engine();
    let at = instant(Los_Angeles, 2025, 1, 2, 12, 0);

    assert!(matches!(
        engine.status_at("volcano", at),
        Err(QueryError::UnknownPattern(_))
    ));
    assert!(matches!(
        engine.next_matching("volcano", None, at),
        Err(QueryError::UnknownPattern(_))
    ));
}

#[test]
fn filter_on_non_rotating_pattern_is_rejected() {
    let engine = engine();
    let at = instant(Kolkata, 2025, 3, 10, 1, 50);

    let err = engine
        .next_matching("geyser", Some(VariantFilter::Color(ShardColor::Red)), at)
        .unwrap_err();
    assert!(matches!(err, QueryError::FilterUnsupported(_)));
}

#[test]
fn active_occurrence_is_indexed_with_countdown_to_end() {
    let engine = engine();
    // Jan 2 is a red-a day: 07:40 / 13:40 / 19:40, each window 4h.
    let at = instant(Los_Angeles, 2025, 1, 2, 8, 0);

    let status = engine.status_at("shard", at).expect("status");
    assert_eq!(status.active_index, Some(0));
    assert_eq!(status.until_next_boundary, Some(Duration::minutes(220)));
    assert_eq!(status.variant.as_ref().unwrap().label, "red-a");
}

#[test]
fn between_occurrences_counts_down_to_next_start() {
    let engine = engine();
    let at = instant(Los_Angeles, 2025, 1, 2, 12, 0);

    let status = engine.status_at("shard", at).expect("status");
    assert_eq!(status.active_index, None);
    assert_eq!(status.until_next_boundary, Some(Duration::minutes(100)));
}

#[test]
fn window_boundaries_are_inclusive() {
    let engine = engine();
    // Exactly at the end of the first window (07:40 + 4h).
    let at = instant(Los_Angeles, 2025, 1, 2, 11, 40);

    let status = engine.status_at("shard", at).expect("status");
    assert_eq!(status.active_index, Some(0));
    assert_eq!(status.until_next_boundary, Some(Duration::zero()));
}

#[test]
fn elapsed_day_falls_back_to_forward_search() {
    let engine = engine();
    // Jan 1's black-a schedule is over by 21:50.
    let at = instant(Los_Angeles, 2025, 1, 1, 23, 59);

    let status = engine.status_at("shard", at).expect("status");
    assert_eq!(status.active_index, None);
    // Next start is Jan 2 07:40.
    assert_eq!(status.until_next_boundary, Some(Duration::minutes(461)));
}

#[test]
fn excluded_day_still_reports_the_variant() {
    let engine = engine();
    // Saturday Jan 25 is a black-a day with no shard.
    let at = instant(Los_Angeles, 2025, 1, 25, 12, 0);

    let status = engine.status_at("shard", at).expect("status");
    assert!(status.occurrences.is_empty());
    assert_eq!(status.active_index, None);
    assert_eq!(status.variant.as_ref().unwrap().label, "black-a");
    // The countdown falls through to the next applicable day.
    assert!(status.until_next_boundary.is_some());
}

#[test]
fn interval_pattern_counts_down_to_next_boundary() {
    let engine = engine();
    let at = instant(Kolkata, 2025, 3, 10, 1, 50);

    let status = engine.status_at("geyser", at).expect("status");
    assert_eq!(status.active_index, None);
    assert_eq!(status.until_next_boundary, Some(Duration::minutes(45)));
}

#[test]
fn fixed_daily_counts_down_to_reset() {
    let engine = engine();
    let at = instant(Kolkata, 2025, 3, 10, 13, 0);

    let status = engine.status_at("daily-reset", at).expect("status");
    assert_eq!(status.occurrences.len(), 1);
    assert_eq!(status.until_next_boundary, Some(Duration::minutes(60)));
}

#[test]
fn lookahead_override_bounds_the_search() {
    let engine = engine().with_lookahead(1);
    // Day 0 is black; with a single-day window a red filter cannot match.
    let from = instant(Los_Angeles, 2025, 1, 1, 12, 0);

    let next = engine
        .next_matching("shard", Some(VariantFilter::Color(ShardColor::Red)), from)
        .expect("query runs");
    assert!(matches!(
        next,
        NextOccurrence::Exhausted { days_scanned: 1 }
    ));
}

#[test]
fn status_serializes_for_presentation() {
    let engine = engine();
    let at = instant(Los_Angeles, 2025, 1, 2, 8, 0);

    let status = engine.status_at("shard", at).expect("status");
    let json = serde_json::to_string(&status).expect("serialize");
    assert!(json.contains("\"pattern_id\":\"shard\""));
    assert!(json.contains("\"active_index\":0"));
    assert!(json.contains("\"until_next_boundary\":13200"));
}
