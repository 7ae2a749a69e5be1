use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use time::{Date, OffsetDateTime, UtcOffset};

/// Offset of `tz` from UTC at the instant `time`, daylight saving included.
pub fn utc_offset_at(time: OffsetDateTime, tz: Tz) -> UtcOffset {
    let seconds = DateTime::<Utc>::from_timestamp(time.unix_timestamp(), 0)
        .map(|utc| {
            tz.offset_from_utc_datetime(&utc.naive_utc())
                .fix()
                .local_minus_utc()
        })
        .unwrap_or(0);
    UtcOffset::from_whole_seconds(seconds).unwrap_or(UtcOffset::UTC)
}

/// Calendar date of `time` as seen on a wall clock in `tz`.
pub fn localized_date(time: OffsetDateTime, tz: Tz) -> Date {
    time.to_offset(utc_offset_at(time, tz)).date()
}
