/// Absolute timestamp reconstruction
///
/// Direct records carry milliseconds past midnight. Multicast messages carry a
/// per-message offset relative to the last Time message, which is itself
/// relative to midnight. Trade reports embed their own execution time.
/// Anything that cannot be represented resolves to `EventTime::Unresolved`
/// instead of failing the message.

use time::{Date, Duration, Month, OffsetDateTime, UtcOffset};

/// Resolved time of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    At(OffsetDateTime),
    /// The components were present but do not form a representable time
    Unresolved,
    /// The message carries no time component (session control)
    Untimed,
}

impl EventTime {
    pub fn resolved(&self) -> Option<OffsetDateTime> {
        match self {
            EventTime::At(t) => Some(*t),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, EventTime::At(_))
    }
}

impl From<Option<OffsetDateTime>> for EventTime {
    fn from(t: Option<OffsetDateTime>) -> Self {
        t.map_or(EventTime::Unresolved, EventTime::At)
    }
}

/// Unit of a raw time component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Millis,
    Micros,
    Nanos,
}

impl TimeUnit {
    pub fn duration(self, value: u64) -> Option<Duration> {
        let value = i64::try_from(value).ok()?;
        Some(match self {
            TimeUnit::Seconds => Duration::seconds(value),
            TimeUnit::Millis => Duration::milliseconds(value),
            TimeUnit::Micros => Duration::microseconds(value),
            TimeUnit::Nanos => Duration::nanoseconds(value),
        })
    }
}

pub fn midnight(date: Date, offset: UtcOffset) -> OffsetDateTime {
    date.midnight().assume_offset(offset)
}

/// `midnight + value` in the given unit
pub fn after(midnight: OffsetDateTime, value: u64, unit: TimeUnit) -> EventTime {
    unit.duration(value)
        .and_then(|d| midnight.checked_add(d))
        .into()
}

/// Direct record time: midnight plus the record's millisecond offset
pub fn direct(midnight: OffsetDateTime, relative_ms: u64) -> EventTime {
    after(midnight, relative_ms, TimeUnit::Millis)
}

/// Multicast message time: midnight + time base + per-message offset
///
/// Without a preceding Time message the base is unknown and the time is
/// unresolved.
pub fn multicast(
    midnight: OffsetDateTime,
    base: Option<u32>,
    base_unit: TimeUnit,
    offset: u32,
    offset_unit: TimeUnit,
) -> EventTime {
    let Some(base) = base else {
        return EventTime::Unresolved;
    };
    base_unit
        .duration(base as u64)
        .zip(offset_unit.duration(offset as u64))
        .and_then(|(b, o)| midnight.checked_add(b)?.checked_add(o))
        .into()
}

/// Trade time embedded in a direct trade report
///
/// `date` is the numeric value of a `YYYYMMDD` field; `time_ms` is
/// milliseconds past that date's midnight.
pub fn trade_date_time(date: u64, time_ms: u64, offset: UtcOffset) -> EventTime {
    let Some(day) = calendar_date(date) else {
        return EventTime::Unresolved;
    };
    direct(midnight(day, offset), time_ms)
}

fn calendar_date(yyyymmdd: u64) -> Option<Date> {
    let year = i32::try_from(yyyymmdd / 10_000).ok()?;
    let month = Month::try_from(((yyyymmdd / 100) % 100) as u8).ok()?;
    let day = (yyyymmdd % 100) as u8;
    Date::from_calendar_date(year, month, day).ok()
}

/// Nanoseconds since the Unix epoch, UTC
pub fn unix_nanos(nanos: u64) -> EventTime {
    OffsetDateTime::from_unix_timestamp_nanos(nanos as i128)
        .ok()
        .into()
}
