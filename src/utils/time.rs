use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Utc};

/// Asia/Tokyo has no DST, so a fixed offset is exact.
pub const JST_OFFSET_HOURS: i32 = 9;

pub fn reference_offset(hours: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| anyhow::anyhow!("UTC offset out of range: {} hours", hours))
}

pub fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// First local midnight strictly after `now`, as a UTC instant.
pub fn next_day_boundary(now: DateTime<Utc>, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let tomorrow = local_date(now, offset).succ_opt()?;
    let local_midnight = tomorrow.and_time(NaiveTime::MIN);
    let utc_midnight = local_midnight - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    Some(utc_midnight.and_utc())
}

pub fn format_datetime_local(datetime: DateTime<Utc>, offset: FixedOffset) -> String {
    datetime
        .with_timezone(&offset)
        .format("%Y-%m-%d %H:%M:%S %:z")
        .to_string()
}
