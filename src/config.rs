/// Per-stream decoding configuration

use crate::timestamp::TimeUnit;
use time::{Date, OffsetDateTime, UtcOffset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Day whose midnight anchors every relative timestamp
    pub trading_date: Date,
    /// Offset the feed's "midnight" is expressed in
    pub utc_offset: UtcOffset,
    /// Unit of the multicast Time message value
    pub time_base_unit: TimeUnit,
    /// Unit of the multicast per-message time offset
    pub time_offset_unit: TimeUnit,
}

impl SessionConfig {
    pub fn new(trading_date: Date) -> Self {
        SessionConfig {
            trading_date,
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, utc_offset: UtcOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    pub fn with_time_units(mut self, base: TimeUnit, offset: TimeUnit) -> Self {
        self.time_base_unit = base;
        self.time_offset_unit = offset;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            trading_date: OffsetDateTime::now_utc().date(),
            utc_offset: UtcOffset::UTC,
            time_base_unit: TimeUnit::Millis,
            time_offset_unit: TimeUnit::Millis,
        }
    }
}
