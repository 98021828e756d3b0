//! Bounded rolling history
//!
//! Fixed-capacity ring buffer. Storage is allocated once in `new`; `push`
//! overwrites the oldest entry when full, so eviction is O(1) and never
//! allocates. This keeps history updates safe on the real-time audio thread.

/// Fixed-capacity FIFO of recent readings
#[derive(Debug, Clone)]
pub struct RollingHistory {
    values: Vec<f32>,
    capacity: usize,
    /// Index of the oldest entry
    head: usize,
    len: usize,
}

impl RollingHistory {
    /// Create a history holding at most `capacity` readings (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: vec![0.0; capacity],
            capacity,
            head: 0,
            len: 0,
        }
    }

    /// Append a reading, evicting the oldest one when full
    #[inline]
    pub fn push(&mut self, value: f32) {
        if self.len < self.capacity {
            let tail = (self.head + self.len) % self.capacity;
            self.values[tail] = value;
            self.len += 1;
        } else {
            self.values[self.head] = value;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// Number of readings held
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no reading has been recorded
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of readings held
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Readings from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.len).map(move |i| self.values[(self.head + i) % self.capacity])
    }

    /// Oldest reading still held
    pub fn oldest(&self) -> Option<f32> {
        (self.len > 0).then(|| self.values[self.head])
    }

    /// Most recent reading
    pub fn latest(&self) -> Option<f32> {
        (self.len > 0).then(|| self.values[(self.head + self.len - 1) % self.capacity])
    }

    /// Mean of held readings (0.0 when empty)
    pub fn mean(&self) -> f32 {
        if self.len == 0 {
            return 0.0;
        }
        let sum: f64 = self.iter().map(f64::from).sum();
        (sum / self.len as f64) as f32
    }

    /// Largest held reading (0.0 when empty)
    pub fn max(&self) -> f32 {
        self.iter().fold(0.0, f32::max)
    }

    /// Drop all readings, keeping the allocation
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_then_evicts_fifo() {
        let mut history = RollingHistory::new(3);
        history.push(1.0);
        history.push(2.0);
        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![1.0, 2.0]);

        history.push(3.0);
        history.push(4.0);
        assert_eq!(history.len(), 3);
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(history.oldest(), Some(2.0));
        assert_eq!(history.latest(), Some(4.0));
    }

    #[test]
    fn mean_and_max() {
        let mut history = RollingHistory::new(4);
        assert_eq!(history.mean(), 0.0);
        for v in [0.2, 0.4, 0.6] {
            history.push(v);
        }
        assert!((history.mean() - 0.4).abs() < 1e-6);
        assert_eq!(history.max(), 0.6);
    }

    #[test]
    fn never_grows_past_capacity() {
        let mut history = RollingHistory::new(100);
        for i in 0..10_000 {
            history.push(i as f32);
        }
        assert_eq!(history.len(), 100);
        assert_eq!(history.oldest(), Some(9_900.0));
        assert_eq!(history.latest(), Some(9_999.0));
    }

    #[test]
    fn zero_capacity_is_promoted_to_one() {
        let mut history = RollingHistory::new(0);
        history.push(1.0);
        history.push(2.0);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.latest(), Some(2.0));
    }

    #[test]
    fn clear_empties() {
        let mut history = RollingHistory::new(2);
        history.push(1.0);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.latest(), None);
    }
}
