//! Rolling EAR sample window

use std::collections::VecDeque;

/// Default window length shown in the plot.
pub const DEFAULT_CAPACITY: usize = 100;

/// Baseline EAR used to seed the window so the chart starts full.
pub const BASELINE_EAR: f64 = 0.3;

/// Fixed-capacity FIFO of recent EAR values, oldest first.
///
/// Rendering-only state; never persisted.
#[derive(Debug, Clone)]
pub struct EarHistory {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl EarHistory {
    pub fn new(capacity: usize) -> Self {
        let mut samples = VecDeque::with_capacity(capacity);
        samples.extend(std::iter::repeat(BASELINE_EAR).take(capacity));
        Self { samples, capacity }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Push a sample, evicting the oldest when full.
    pub fn push(&mut self, ear: f64) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(ear);
    }

    /// Samples oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
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
}

impl Default for EarHistory {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_seeded_full() {
        let history = EarHistory::new(10);
        assert_eq!(history.len(), 10);
        assert!(history.iter().all(|v| v == BASELINE_EAR));
    }

    #[test]
    fn test_fifo_eviction_keeps_newest() {
        let mut history = EarHistory::new(100);
        for i in 0..150 {
            history.push(i as f64);
        }
        assert_eq!(history.len(), 100);

        let samples: Vec<f64> = history.iter().collect();
        // Exactly the most recent 100, oldest-first order preserved.
        assert_eq!(samples[0], 50.0);
        assert_eq!(samples[99], 149.0);
        assert!(samples.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_capacity_is_fixed() {
        let mut history = EarHistory::new(5);
        for _ in 0..20 {
            history.push(0.1);
            assert_eq!(history.len(), 5);
        }
    }

    proptest! {
        // The window stays exactly full and the newest sample is always
        // the last one pushed.
        #[test]
        fn test_window_invariants(samples in prop::collection::vec(0.0f64..1.0, 1..300)) {
            let mut history = EarHistory::new(100);
            for &s in &samples {
                history.push(s);
            }
            prop_assert_eq!(history.len(), 100);
            prop_assert_eq!(history.iter().last(), samples.last().copied());
        }
    }
}
