//! Bounded history of retired coordination sessions

use std::collections::VecDeque;

use crate::domain::CoordinationRecord;

/// FIFO ring buffer that evicts its oldest entries once over capacity
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T = CoordinationRecord> {
    capacity: usize,
    entries: VecDeque<T>,
}

impl<T: Clone> HistoryBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    /// Append an entry; returns how many old entries were evicted
    pub fn push(&mut self, entry: T) -> usize {
        self.entries.push_back(entry);
        let mut evicted = 0;
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// The last `limit` entries, oldest first
    ///
    /// `limit <= 0` or `limit > len` returns everything.
    pub fn recent(&self, limit: i64) -> Vec<T> {
        let len = self.entries.len();
        let take = match usize::try_from(limit) {
            Ok(n) if n > 0 && n <= len => n,
            _ => len,
        };
        self.entries.iter().skip(len - take).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn filled(capacity: usize, count: u32) -> HistoryBuffer<u32> {
        let mut buffer = HistoryBuffer::new(capacity);
        for i in 0..count {
            buffer.push(i);
        }
        buffer
    }

    #[test]
    fn test_evicts_oldest_first() {
        let buffer = filled(3, 5);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.recent(0), vec![2, 3, 4]);
    }

    #[test]
    fn test_push_reports_evictions() {
        let mut buffer = filled(2, 2);
        assert_eq!(buffer.push(9), 1);
        assert_eq!(buffer.recent(-1), vec![1, 9]);
    }

    #[test]
    fn test_zero_capacity_retains_nothing() {
        let mut buffer = HistoryBuffer::new(0);
        assert_eq!(buffer.push("a"), 1);
        assert!(buffer.is_empty());
        assert!(buffer.recent(5).is_empty());
    }

    #[test]
    fn test_recent_slicing() {
        let buffer = filled(10, 6);
        assert_eq!(buffer.recent(2), vec![4, 5]);
        assert_eq!(buffer.recent(6), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(buffer.recent(7), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(buffer.recent(0).len(), 6);
        assert_eq!(buffer.recent(-3).len(), 6);
    }

    proptest! {
        #[test]
        fn prop_len_never_exceeds_capacity(capacity in 0usize..50, count in 0u32..200) {
            let buffer = filled(capacity, count);
            prop_assert!(buffer.len() <= capacity);
            prop_assert_eq!(buffer.len(), capacity.min(count as usize));
        }

        #[test]
        fn prop_survivors_are_most_recent_in_order(capacity in 1usize..50, count in 0u32..200) {
            let buffer = filled(capacity, count);
            let first = count.saturating_sub(capacity as u32);
            let expected: Vec<u32> = (first..count).collect();
            prop_assert_eq!(buffer.recent(0), expected);
        }

        #[test]
        fn prop_recent_returns_tail(count in 0u32..100, limit in -10i64..120) {
            let buffer = filled(100, count);
            let all = buffer.recent(0);
            let window = buffer.recent(limit);
            if limit <= 0 || limit as usize > all.len() {
                prop_assert_eq!(window, all);
            } else {
                prop_assert_eq!(window.len(), limit as usize);
                prop_assert_eq!(&window[..], &all[all.len() - limit as usize..]);
            }
        }
    }
}
