/// A keeper slot: position of a point in its tree and squared distance to the
/// query. Unfilled slots hold `index: None` at infinite distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparableDist {
    pub index: Option<usize>,
    pub dist: f64,
}

impl ComparableDist {
    const ABSENT: ComparableDist = ComparableDist {
        index: None,
        dist: f64::INFINITY,
    };

    pub fn is_absent(&self) -> bool {
        self.index.is_none()
    }
}

/// Bounded best-first keeper retaining the `k` closest points seen so far,
/// ordered by ascending distance.
#[derive(Debug, Clone)]
pub struct NKeeper {
    heap: Vec<ComparableDist>,
}

impl NKeeper {
    /// A keeper for the `k` closest points; `k` is at least one.
    pub fn new(k: usize) -> Self {
        Self {
            heap: vec![ComparableDist::ABSENT; k.max(1)],
        }
    }

    /// Refill every slot with the absent sentinel.
    pub fn reset(&mut self) {
        self.heap.fill(ComparableDist::ABSENT);
    }

    /// Offer a point; it is retained only if closer than the current worst.
    pub fn keep(&mut self, index: usize, dist: f64) {
        let last = self.heap.len() - 1;
        if dist >= self.heap[last].dist {
            return;
        }
        let at = self.heap.partition_point(|e| e.dist <= dist);
        self.heap.pop();
        self.heap.insert(
            at,
            ComparableDist {
                index: Some(index),
                dist,
            },
        );
    }

    /// Distance of the worst retained slot; infinite until the keeper is full.
    pub fn max_dist(&self) -> f64 {
        self.heap[self.heap.len() - 1].dist
    }

    pub fn as_slice(&self) -> &[ComparableDist] {
        &self.heap
    }
}
