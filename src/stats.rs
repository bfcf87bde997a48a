/// Decode statistics
///
/// Counts what happened to every frame of a stream: decoded, discarded as
/// malformed or truncated, skipped as unknown, or rejected by the sink.

use crate::decoder::DecodeError;
use crate::protocol::MessageType;
use log::info;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct DecodeStats {
    start_time: Option<Instant>,
    total_bytes: u64,
    decoded: u64,
    malformed: u64,
    truncated: u64,
    unknown: u64,
    sink_failures: u64,
    blocks: u64,
    gap_events: u32,
    by_type: HashMap<MessageType, u64>,
}

impl DecodeStats {
    pub fn new() -> Self {
        DecodeStats::default()
    }

    /// Record an input buffer handed to the decoder
    pub fn record_input(&mut self, size: usize) {
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
        }
        self.total_bytes += size as u64;
    }

    pub fn record_decoded(&mut self, message_type: MessageType) {
        self.decoded += 1;
        *self.by_type.entry(message_type).or_insert(0) += 1;
    }

    pub fn record_error(&mut self, error: &DecodeError) {
        match error {
            DecodeError::UnknownMessageType(_) => self.unknown += 1,
            DecodeError::MalformedField { .. } => self.malformed += 1,
            DecodeError::TruncatedMessage { .. } | DecodeError::TruncatedStream { .. } => {
                self.truncated += 1
            }
        }
    }

    pub fn record_sink_failure(&mut self) {
        self.sink_failures += 1;
    }

    pub fn record_blocks(&mut self, blocks: usize) {
        self.blocks += blocks as u64;
    }

    pub fn record_gaps(&mut self, events: usize) {
        self.gap_events = self.gap_events.wrapping_add(events as u32);
    }

    pub fn decoded(&self) -> u64 {
        self.decoded
    }

    pub fn malformed(&self) -> u64 {
        self.malformed
    }

    pub fn truncated(&self) -> u64 {
        self.truncated
    }

    pub fn unknown(&self) -> u64 {
        self.unknown
    }

    pub fn sink_failures(&self) -> u64 {
        self.sink_failures
    }

    pub fn blocks(&self) -> u64 {
        self.blocks
    }

    pub fn gap_events(&self) -> u32 {
        self.gap_events
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn count(&self, message_type: MessageType) -> u64 {
        self.by_type.get(&message_type).copied().unwrap_or(0)
    }

    /// Every frame that produced a result, successful or not
    pub fn total_messages(&self) -> u64 {
        self.decoded + self.malformed + self.truncated + self.unknown
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|st| st.elapsed())
    }

    pub fn messages_per_sec(&self) -> f64 {
        match self.elapsed() {
            Some(e) if e.as_secs_f64() > 0.0 => self.total_messages() as f64 / e.as_secs_f64(),
            _ => 0.0,
        }
    }

    pub fn reset(&mut self) {
        *self = DecodeStats::default();
    }

    pub fn log_summary(&self) {
        info!(
            "decoded={} malformed={} truncated={} unknown={} sink_failures={} bytes={} blocks={} gaps={} msg/s={:.2}",
            self.decoded,
            self.malformed,
            self.truncated,
            self.unknown,
            self.sink_failures,
            self.total_bytes,
            self.blocks,
            self.gap_events,
            self.messages_per_sec()
        );
        let mut types: Vec<_> = self.by_type.iter().collect();
        types.sort_by_key(|(_, &n)| std::cmp::Reverse(n));
        for (message_type, n) in types {
            info!("  {:?}: {}", message_type, n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::FieldError;

    #[test]
    fn test_record_outcomes() {
        let mut stats = DecodeStats::new();
        stats.record_input(46);
        stats.record_decoded(MessageType::AddOrder);
        stats.record_decoded(MessageType::AddOrder);
        stats.record_decoded(MessageType::Trade);
        stats.record_error(&DecodeError::UnknownMessageType(0xee));
        stats.record_error(&DecodeError::MalformedField {
            kind: "trade",
            field: "side",
            reason: FieldError::InvalidSide(b'?'),
        });

        assert_eq!(stats.total_bytes(), 46);
        assert_eq!(stats.decoded(), 3);
        assert_eq!(stats.count(MessageType::AddOrder), 2);
        assert_eq!(stats.count(MessageType::Time), 0);
        assert_eq!(stats.unknown(), 1);
        assert_eq!(stats.malformed(), 1);
        assert_eq!(stats.total_messages(), 5);
    }

    #[test]
    fn test_reset() {
        let mut stats = DecodeStats::new();
        stats.record_sink_failure();
        stats.record_gaps(2);
        stats.reset();
        assert_eq!(stats.sink_failures(), 0);
        assert_eq!(stats.gap_events(), 0);
        assert!(stats.elapsed().is_none());
    }
}
