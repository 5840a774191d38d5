/// Sparse distance histograms
///
/// A histogram grows only as far as the largest distance seen, so tiles with
/// only close collisions never pay for a worst-case allocation.

/// Counter indexed by non-negative integer distance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistanceHistogram {
    counts: Vec<u64>,
}

impl DistanceHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of distance `i`.
    pub fn inc(&mut self, i: usize) {
        let len = self.counts.len();
        if i < len {
            self.counts[i] += 1;
        } else if i == len {
            self.counts.push(1);
        } else if i < self.counts.capacity() {
            // Reserved but unused: extend the logical extent in place.
            self.counts.resize(i + 1, 0);
            self.counts[i] = 1;
        } else {
            self.counts.reserve(i + 1 - len);
            self.counts.resize(i + 1, 0);
            self.counts[i] = 1;
        }
    }

    /// Count recorded for distance `i`.
    pub fn get(&self, i: usize) -> u64 {
        self.counts.get(i).copied().unwrap_or(0)
    }

    /// One past the largest distance recorded.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all bucket counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(distance, count)` for every non-zero bucket in ascending distance.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c != 0)
            .map(|(d, &c)| (d, c))
    }
}
