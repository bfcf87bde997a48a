/// Sequence number gap detection
///
/// Tracks the sequence numbers seen on each multicast unit and records the
/// ranges that never arrived. Detection only: requesting the missing range is
/// up to whoever consumes the decoded stream.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
struct UnitState {
    last_sequence: Option<u32>,
    gaps: Vec<(u32, u32)>, // (start, end) inclusive
}

#[derive(Debug, Clone, Default)]
pub struct GapDetector {
    units: HashMap<u8, UnitState>,
    total_gap_count: u32,
}

impl GapDetector {
    pub fn new() -> Self {
        GapDetector::default()
    }

    /// Process a sequence number on a unit; returns the newly opened gap, if any
    ///
    /// Sequences at or below the last one seen (replays) are ignored.
    pub fn process(&mut self, unit: u8, seq_num: u32) -> Option<(u32, u32)> {
        let state = self.units.entry(unit).or_default();
        let Some(last) = state.last_sequence else {
            state.last_sequence = Some(seq_num);
            return None;
        };
        let expected_next = last.wrapping_add(1);
        if seq_num == expected_next {
            state.last_sequence = Some(seq_num);
            return None;
        }
        if seq_num <= last {
            return None;
        }
        let gap = (expected_next, seq_num - 1);
        state.gaps.push(gap);
        state.last_sequence = Some(seq_num);
        self.total_gap_count = self
            .total_gap_count
            .wrapping_add(seq_num - expected_next);
        Some(gap)
    }

    /// Gaps detected on a unit as (start, end) tuples (inclusive)
    pub fn gaps(&self, unit: u8) -> &[(u32, u32)] {
        self.units
            .get(&unit)
            .map(|s| s.gaps.as_slice())
            .unwrap_or(&[])
    }

    pub fn last_sequence(&self, unit: u8) -> Option<u32> {
        self.units.get(&unit).and_then(|s| s.last_sequence)
    }

    /// Total number of missing sequence numbers across units
    pub fn total_gaps(&self) -> u32 {
        self.total_gap_count
    }

    /// Count of gap ranges across units
    pub fn gap_count(&self) -> usize {
        self.units.values().map(|s| s.gaps.len()).sum()
    }

    pub fn reset(&mut self) {
        self.units.clear();
        self.total_gap_count = 0;
    }

    pub fn is_in_gap(&self, unit: u8, seq_num: u32) -> bool {
        self.gaps(unit)
            .iter()
            .any(|&(start, end)| seq_num >= start && seq_num <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_gaps() {
        let mut detector = GapDetector::new();
        for i in 0..100 {
            assert_eq!(detector.process(1, i), None);
        }
        assert_eq!(detector.total_gaps(), 0);
        assert!(detector.gaps(1).is_empty());
    }

    #[test]
    fn test_single_gap() {
        let mut detector = GapDetector::new();
        detector.process(1, 1);
        detector.process(1, 2);
        assert_eq!(detector.process(1, 5), Some((3, 4)));
        detector.process(1, 6);

        assert_eq!(detector.total_gaps(), 2);
        assert_eq!(detector.gap_count(), 1);
        assert_eq!(detector.gaps(1)[0], (3, 4));
    }

    #[test]
    fn test_units_are_independent() {
        let mut detector = GapDetector::new();
        detector.process(1, 10);
        detector.process(2, 500);
        detector.process(1, 11);
        detector.process(2, 501);
        assert_eq!(detector.gap_count(), 0);

        detector.process(2, 510);
        assert!(detector.gaps(1).is_empty());
        assert_eq!(detector.gaps(2), &[(502, 509)]);
        assert!(detector.is_in_gap(2, 505));
        assert!(!detector.is_in_gap(1, 505));
    }

    #[test]
    fn test_replay_ignored() {
        let mut detector = GapDetector::new();
        detector.process(1, 10);
        detector.process(1, 11);
        assert_eq!(detector.process(1, 5), None);
        assert_eq!(detector.last_sequence(1), Some(11));
        assert_eq!(detector.gap_count(), 0);
    }

    #[test]
    fn test_reset() {
        let mut detector = GapDetector::new();
        detector.process(1, 1);
        detector.process(1, 5);
        assert_eq!(detector.total_gaps(), 3);

        detector.reset();
        assert_eq!(detector.total_gaps(), 0);
        assert!(detector.gaps(1).is_empty());
    }
}
