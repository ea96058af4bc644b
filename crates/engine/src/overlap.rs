//! Counts how many extant lineages carry ancestral material at each position.
//!
//! Every position starts with a count equal to the number of samples. Each
//! coalescence over an interval lowers the count there by one; once it reaches
//! one the most recent common ancestor for that interval has been found and its
//! material no longer needs to be tracked.

#[derive(Debug, Clone)]
pub(crate) struct OverlapCounter {
    /// Boundaries; `counts[i]` applies to `[breaks[i], breaks[i + 1])`
    breaks: Vec<f64>,
    counts: Vec<usize>,
}

impl OverlapCounter {
    pub(crate) fn new(sequence_length: f64, num_samples: usize) -> Self {
        Self {
            breaks: vec![0.0, sequence_length],
            counts: vec![num_samples],
        }
    }

    /// Index of the boundary at `x`, inserting one if needed.
    fn split_at(&mut self, x: f64) -> usize {
        match self.breaks.binary_search_by(|b| b.total_cmp(&x)) {
            Ok(index) => index,
            Err(index) => {
                // x lies inside the interval that starts at index - 1
                let count = self.counts[index - 1];
                self.breaks.insert(index, x);
                self.counts.insert(index, count);
                index
            }
        }
    }

    /// Decrement the count on `[left, right)`.
    ///
    /// Returns the affected pieces with their new counts, left to right.
    pub(crate) fn decrement(&mut self, left: f64, right: f64) -> Vec<(f64, f64, usize)> {
        let start = self.split_at(left);
        let end = self.split_at(right);
        (start..end)
            .map(|i| {
                self.counts[i] = self.counts[i].saturating_sub(1);
                (self.breaks[i], self.breaks[i + 1], self.counts[i])
            })
            .collect()
    }

    /// Whether every position has found its common ancestor.
    pub(crate) fn is_complete(&self) -> bool {
        self.counts.iter().all(|&c| c <= 1)
    }
}
