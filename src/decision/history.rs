//! Bounded decision trail.
//!
//! Keeps the most recent decisions for rendering. Appends only; once full,
//! each append evicts the oldest record.

use std::collections::VecDeque;

use super::policy::Command;

/// Trail length used when none is configured
pub const DEFAULT_HISTORY_CAPACITY: usize = 30;

/// One frame's decision
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecisionRecord {
    /// Chosen slice
    pub slice_index: usize,
    /// Resulting command
    pub command: Command,
    /// Frame sequence number, starting at 1
    pub sequence: u64,
}

/// FIFO ring of the latest decision records.
#[derive(Clone, Debug)]
pub struct PathHistory {
    capacity: usize,
    records: VecDeque<DecisionRecord>,
}

impl PathHistory {
    /// Create an empty history. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a record, evicting the oldest when over capacity.
    pub fn push(&mut self, record: DecisionRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Records oldest first
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &DecisionRecord> + '_ {
        self.records.iter()
    }

    /// Most recent record
    pub fn latest(&self) -> Option<&DecisionRecord> {
        self.records.back()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum number of records kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all records
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl Default for PathHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sequence: u64) -> DecisionRecord {
        let slice_index = (sequence % 5) as usize;
        DecisionRecord {
            slice_index,
            command: Command::for_slice(slice_index, 5),
            sequence,
        }
    }

    #[test]
    fn test_fills_up_to_capacity() {
        let mut history = PathHistory::new(30);
        for seq in 1..=30 {
            history.push(record(seq));
        }
        assert_eq!(history.len(), 30);
        assert_eq!(history.iter().next().unwrap().sequence, 1);
    }

    #[test]
    fn test_fifo_eviction_after_35() {
        let mut history = PathHistory::default();
        for seq in 1..=35 {
            history.push(record(seq));
            assert!(history.len() <= history.capacity());
        }

        assert_eq!(history.len(), 30);
        let sequences: Vec<u64> = history.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, (6..=35).collect::<Vec<_>>());
        assert_eq!(history.latest().unwrap().sequence, 35);
    }

    #[test]
    fn test_small_capacity() {
        let mut history = PathHistory::new(2);
        history.push(record(1));
        history.push(record(2));
        history.push(record(3));
        let sequences: Vec<u64> = history.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![2, 3]);
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let mut history = PathHistory::new(0);
        history.push(record(1));
        history.push(record(2));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.latest().unwrap().sequence, 2);
    }

    #[test]
    fn test_clear() {
        let mut history = PathHistory::new(5);
        history.push(record(1));
        history.clear();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }
}
