//! Fixed-capacity rate history for sparkline-style display

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Circular buffer of rate samples
///
/// Once full, every push drops the oldest sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendBuffer {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl TrendBuffer {
    /// Create an empty buffer holding at most `capacity` samples (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a sample, evicting the oldest one when full
    pub fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    /// Largest sample currently held, useful for scaling a sparkline
    pub fn max(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::max)
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for TrendBuffer {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrites_oldest() {
        let mut buf = TrendBuffer::new(3);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            buf.push(v);
        }
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.to_vec(), vec![3.0, 4.0, 5.0]);
        assert_eq!(buf.latest(), Some(5.0));
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut buf = TrendBuffer::new(0);
        assert_eq!(buf.capacity(), 1);
        buf.push(1.5);
        buf.push(2.5);
        assert_eq!(buf.to_vec(), vec![2.5]);
    }

    #[test]
    fn test_max_and_clear() {
        let mut buf = TrendBuffer::new(4);
        assert_eq!(buf.max(), None);
        buf.push(0.2);
        buf.push(1.7);
        buf.push(0.9);
        assert_eq!(buf.max(), Some(1.7));
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.latest(), None);
    }
}
