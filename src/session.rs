/// Per-stream parsing state
///
/// A `Session` belongs to exactly one stream. It holds the midnight anchor,
/// the latest multicast Time base and the unit/sequence of the message being
/// decoded. Independent streams (one per feed unit, say) each get their own.

use crate::config::SessionConfig;
use crate::gap_detector::GapDetector;
use crate::timestamp::{self, EventTime};
use log::warn;
use time::OffsetDateTime;

/// Transport identity of a multicast message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceContext {
    pub unit: u8,
    /// Starting sequence of the enclosing block
    pub block_sequence: u32,
    /// Sequence of this message: block start plus position in block
    pub sequence: u32,
}

#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    midnight: OffsetDateTime,
    time_base: Option<u32>,
    context: Option<SequenceContext>,
    gaps: GapDetector,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Session {
            midnight: timestamp::midnight(config.trading_date, config.utc_offset),
            config,
            time_base: None,
            context: None,
            gaps: GapDetector::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn midnight(&self) -> OffsetDateTime {
        self.midnight
    }

    /// Value of the most recent Time message
    pub fn time_base(&self) -> Option<u32> {
        self.time_base
    }

    pub fn set_time_base(&mut self, base: u32) {
        self.time_base = Some(base);
    }

    pub fn context(&self) -> Option<SequenceContext> {
        self.context
    }

    /// Record the transport position of the next message to decode
    pub fn enter(&mut self, context: SequenceContext) {
        if let Some((from, to)) = self.gaps.process(context.unit, context.sequence) {
            warn!("unit {} sequence gap [{}..{}]", context.unit, from, to);
        }
        self.context = Some(context);
    }

    pub fn gaps(&self) -> &GapDetector {
        &self.gaps
    }

    pub fn resolve_direct(&self, relative_ms: u32) -> EventTime {
        timestamp::direct(self.midnight, relative_ms as u64)
    }

    pub fn resolve_multicast(&self, offset: u32) -> EventTime {
        timestamp::multicast(
            self.midnight,
            self.time_base,
            self.config.time_base_unit,
            offset,
            self.config.time_offset_unit,
        )
    }

    /// Time of a Time message itself: midnight plus its base
    pub fn resolve_time_base(&self, base: u32) -> EventTime {
        timestamp::after(self.midnight, base as u64, self.config.time_base_unit)
    }
}
