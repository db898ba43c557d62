//! The built-in Sky catalog: wax event timers, the forest rainbow, the
//! daily reset, and the rotating shard eruption cycle.
//!
//! Anchor times are stored already corrected (the upstream data applied a
//! uniform +30 minute adjustment at entry time); the engine adds no runtime
//! offset on top.

use chrono::{Duration, NaiveDate};
use chrono_tz::{America::Los_Angeles, Asia::Kolkata};
use indexmap::IndexMap;

use skysched_core::TimeOfDay;

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::pattern::{
    Recurrence, RecurrencePattern, RotationSpec, ShardColor, Variant, VariantSelector,
    WindowOffsets,
};

/// Cycle day 0 of the shard rotation, a black day in America/Los_Angeles.
/// This is the authoritative anchor for all shard day-index arithmetic.
const SHARD_EPOCH: (i32, u32, u32) = (2025, 1, 1);

impl Catalog {
    /// The default catalog, validated like any other.
    pub fn builtin() -> Result<Self, CatalogError> {
        let mut patterns = IndexMap::new();

        // Wax events repeat on a fixed cadence from local midnight.
        let wax_window = WindowOffsets {
            markers: Vec::new(),
            end: Duration::minutes(10),
        };
        let wax_events: [(&str, &str, u32, i64); 6] = [
            ("geyser", "Geyser", 35, 2),
            ("grandma", "Grandma", 5, 2),
            ("turtle", "Turtle", 20, 2),
            ("shard-event", "Shard Event", 26, 4),
            ("sunset", "Sunset", 20, 2),
            ("fairy-ring", "Fairy Ring", 20, 1),
        ];
        for (id, name, minute, hours) in wax_events {
            patterns.insert(
                id.to_string(),
                RecurrencePattern {
                    name: name.to_string(),
                    tz: Kolkata,
                    recurrence: Recurrence::IntervalFromMidnight {
                        minute,
                        interval: Duration::hours(hours),
                    },
                    window: wax_window.clone(),
                },
            );
        }

        patterns.insert(
            "forest-rainbow".to_string(),
            RecurrencePattern {
                name: "Forest Rainbow".to_string(),
                tz: Kolkata,
                recurrence: Recurrence::PhaseOffsetInterval {
                    anchor: TimeOfDay::new(5, 30),
                    interval: Duration::hours(12),
                },
                window: wax_window.clone(),
            },
        );

        patterns.insert(
            "daily-reset".to_string(),
            RecurrencePattern {
                name: "Daily Reset".to_string(),
                tz: Kolkata,
                recurrence: Recurrence::FixedDaily {
                    anchor: TimeOfDay::new(14, 0),
                },
                window: WindowOffsets {
                    markers: Vec::new(),
                    end: Duration::minutes(1),
                },
            },
        );

        patterns.insert("shard".to_string(), shard_pattern()?);

        Self::new(patterns)
    }
}

fn shard_pattern() -> Result<RecurrencePattern, CatalogError> {
    let (y, m, d) = SHARD_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| CatalogError::invalid("shard", "invalid epoch date"))?;

    let black_interval = Duration::hours(8);
    let red_interval = Duration::hours(6);

    let realms = maps(["Prairie", "Forest", "Valley", "Wasteland", "Vault"]);

    let variants = vec![
        Variant {
            label: "black-a".to_string(),
            color: ShardColor::Black,
            excluded_weekdays: vec![6, 7],
            offset: Duration::hours(1) + Duration::minutes(50),
            interval: black_interval,
            maps: maps([
                "Butterfly Field",
                "Forest Brook",
                "Ice Rink",
                "Broken Temple",
                "Starlight Desert",
            ]),
            reward: None,
        },
        Variant {
            label: "black-b".to_string(),
            color: ShardColor::Black,
            excluded_weekdays: vec![7, 1],
            offset: Duration::hours(2) + Duration::minutes(10),
            interval: black_interval,
            maps: maps([
                "Village Islands",
                "Boneyard",
                "Ice Rink",
                "Battlefield",
                "Starlight Desert",
            ]),
            reward: None,
        },
        Variant {
            label: "red-a".to_string(),
            color: ShardColor::Red,
            excluded_weekdays: vec![1, 2],
            offset: Duration::hours(7) + Duration::minutes(40),
            interval: red_interval,
            maps: maps([
                "Cave",
                "Forest Garden",
                "Village of Dreams",
                "Graveyard",
                "Jellyfish Cove",
            ]),
            reward: Some(2.0),
        },
        Variant {
            label: "red-b".to_string(),
            color: ShardColor::Red,
            excluded_weekdays: vec![2, 3],
            offset: Duration::hours(2) + Duration::minutes(20),
            interval: red_interval,
            maps: maps([
                "Bird Nest",
                "Treehouse",
                "Village of Dreams",
                "Crabfield",
                "Jellyfish Cove",
            ]),
            reward: Some(2.5),
        },
        Variant {
            label: "red-c".to_string(),
            color: ShardColor::Red,
            excluded_weekdays: vec![3, 4],
            offset: Duration::hours(3) + Duration::minutes(30),
            interval: red_interval,
            maps: maps([
                "Sanctuary Island",
                "Elevated Clearing",
                "Hermit Valley",
                "Forgotten Ark",
                "Jellyfish Cove",
            ]),
            reward: Some(3.5),
        },
    ];

    Ok(RecurrencePattern {
        name: "Shard Eruption".to_string(),
        tz: Los_Angeles,
        recurrence: Recurrence::RotatingMultiDay(RotationSpec {
            epoch,
            selector: VariantSelector::ColorSplit,
            realms,
            variants,
        }),
        window: WindowOffsets {
            // Shards land 8m40s after the eruption opens; the window
            // closes four hours in.
            markers: vec![Duration::minutes(8) + Duration::seconds(40)],
            end: Duration::hours(4),
        },
    })
}

fn maps<const N: usize>(names: [&str; N]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
