use std::collections::VecDeque;
use std::ops::Range;

/// Fixed-capacity FIFO of samples.
///
/// Once `len()` reaches the capacity every push evicts exactly one sample, the oldest.
/// Push and evict are O(1); the backing ring buffer is allocated once.
#[derive(Clone, Debug)]
pub struct RollingWindow {
    /// All values in the window (oldest at the front)
    values: VecDeque<f64>,

    /// Maximum number of retained samples
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `value`, returning the evicted oldest sample when the window was full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.capacity == 0 {
            return Some(value);
        }

        let evicted = if self.values.len() == self.capacity {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        evicted
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.values.len() == self.capacity
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = f64> + ExactSizeIterator + '_ {
        self.values.iter().copied()
    }

    /// Samples in `range`, indexed from the oldest (index 0).
    ///
    /// Panics if the range is out of bounds, like slice indexing.
    pub fn range(&self, range: Range<usize>) -> impl Iterator<Item = f64> + '_ {
        self.values.range(range).copied()
    }

    /// Arithmetic mean of `range`. Returns 0.0 for an empty range.
    pub fn mean_of(&self, range: Range<usize>) -> f64 {
        let n = range.len();
        if n == 0 {
            return 0.0;
        }
        self.range(range).sum::<f64>() / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn evicts_oldest_once_full() {
        let mut w = RollingWindow::new(3);

        assert_eq!(w.push(1.0), None);
        assert_eq!(w.push(2.0), None);
        assert_eq!(w.push(3.0), None);
        assert!(w.is_full());

        assert_eq!(w.push(4.0), Some(1.0));
        assert_eq!(w.iter().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn zero_capacity_never_stores() {
        let mut w = RollingWindow::new(0);

        assert_eq!(w.push(1.5), Some(1.5));
        assert!(w.is_empty());
        assert!(!w.is_full());
    }

    #[test]
    fn mean_of_sub_range() {
        let mut w = RollingWindow::new(10);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0, 6.0] {
            w.push(v);
        }

        assert_eq!(w.mean_of(0..2), 1.5);
        assert_eq!(w.mean_of(3..6), 5.0);
        assert_eq!(w.mean_of(4..4), 0.0);
    }

    proptest! {
        #[test]
        fn retains_exactly_the_most_recent_samples(
            capacity in 1usize..64,
            samples in prop::collection::vec(-1.0e6f64..1.0e6, 0..256),
        ) {
            let mut w = RollingWindow::new(capacity);
            for &s in &samples {
                w.push(s);
                prop_assert!(w.len() <= capacity);
            }

            let keep = samples.len().min(capacity);
            let expected = &samples[samples.len() - keep..];
            prop_assert_eq!(w.iter().collect::<Vec<_>>(), expected.to_vec());
        }
    }
}
