use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Wall-clock anchor within a day, in a pattern's local timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };

    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    /// Whether this is a representable wall-clock time.
    pub fn is_valid(&self) -> bool {
        self.hour < 24 && self.minute < 60
    }

    /// Nominal offset from local midnight. Calendar arithmetic in the
    /// pattern's timezone is applied by the calculator, not here.
    pub fn from_midnight(&self) -> Duration {
        Duration::minutes(self.hour as i64 * 60 + self.minute as i64)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Serde adapter storing a `chrono::Duration` field as whole seconds.
pub mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::seconds(i64::deserialize(d)?))
    }
}

/// Serde adapter storing an `Option<chrono::Duration>` field as whole seconds.
pub mod duration_secs_opt {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&d.num_seconds()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<i64>::deserialize(d)?.map(Duration::seconds))
    }
}

/// Serde adapter storing a `Vec<chrono::Duration>` field as whole seconds.
pub mod duration_secs_list {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(list: &[Duration], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(list.iter().map(|d| d.num_seconds()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Duration>, D::Error> {
        let secs = Vec::<i64>::deserialize(d)?;
        Ok(secs.into_iter().map(Duration::seconds).collect())
    }
}
