use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Calendar day in the reference timezone. Partition key of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogicalDay(NaiveDate);

impl LogicalDay {
    pub fn from_instant(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self(crate::utils::time::local_date(instant, offset))
    }

    /// Number of whole days from `self` back to `earlier` (negative if `earlier` is later).
    pub fn days_since(&self, earlier: LogicalDay) -> i64 {
        self.0.signed_duration_since(earlier.0).num_days()
    }
}

impl fmt::Display for LogicalDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl FromStr for LogicalDay {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DAY_FORMAT).map(Self)
    }
}

impl Serialize for LogicalDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LogicalDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn day_rolls_over_at_fifteen_utc_for_jst() {
        let before = Utc.with_ymd_and_hms(2024, 2, 29, 14, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 2, 29, 15, 0, 0).unwrap();

        assert_eq!(LogicalDay::from_instant(before, jst()).to_string(), "2024-02-29");
        assert_eq!(LogicalDay::from_instant(after, jst()).to_string(), "2024-03-01");
    }

    #[test]
    fn parses_and_rejects() {
        let day: LogicalDay = "2024-03-01".parse().unwrap();
        assert_eq!(day, LogicalDay::from_instant(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(), jst()));
        assert!("03/01/2024".parse::<LogicalDay>().is_err());
    }

    #[test]
    fn days_since_counts_calendar_days() {
        let a: LogicalDay = "2024-03-01".parse().unwrap();
        let b: LogicalDay = "2024-02-27".parse().unwrap();
        assert_eq!(a.days_since(b), 3);
        assert_eq!(b.days_since(a), -3);
    }
}
