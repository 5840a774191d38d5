//! Two-dimensional KD-tree for nearest-colony search on a single tile.
//!
//! The tree is generic over any point type that implements the contract
//! traits below. Collections are indexed through the slice-level traits
//! ([`Length`], [`IndexAt`], [`SubRange`], [`PivotByDimension`]), which are
//! implemented for `[P]` whenever `P` is [`Comparable`].
//!
//! Split values are chosen by taking the median of a bounded random sample
//! rather than the true median, so the shape of a tree depends on the RNG.
//! Query results never do.

mod keeper;
mod pivot;
mod point;

pub use keeper::{ComparableDist, NKeeper};
pub use point::Point;

use rand::Rng;

/// Default number of random points examined when choosing a split.
pub const DEFAULT_PIVOT_SAMPLE: usize = 100;

/// Axis of the tile plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dim {
    X,
    Y,
}

impl Dim {
    /// The axis split on by the children of a node split on `self`.
    pub fn next(self) -> Self {
        match self {
            Dim::X => Dim::Y,
            Dim::Y => Dim::X,
        }
    }
}

// ---------------------------------------------------------------------------
// Point contract
// ---------------------------------------------------------------------------

/// Signed separation of two points along one axis, in physical units.
///
/// `a.compare(b, d) < 0` orders `a` before `b` on axis `d`.
pub trait CompareAlongDimension {
    fn compare(&self, other: &Self, dim: Dim) -> f64;
}

/// Squared physical distance between two points.
///
/// Must agree with [`CompareAlongDimension`]: the square of the separation
/// along any axis is never larger than the squared distance.
pub trait DistanceTo {
    fn distance(&self, other: &Self) -> f64;
}

/// A point that can be stored in a [`Tree`].
pub trait Comparable: CompareAlongDimension + DistanceTo {}

impl<T: CompareAlongDimension + DistanceTo> Comparable for T {}

// ---------------------------------------------------------------------------
// Collection contract
// ---------------------------------------------------------------------------

pub trait Length {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait IndexAt {
    type Item;
    fn index_at(&self, i: usize) -> &Self::Item;
}

/// Mutable view of the half-open range `[start, end)`.
pub trait SubRange {
    fn sub_range(&mut self, start: usize, end: usize) -> &mut Self;
}

pub trait PivotByDimension {
    /// Partition the collection around a pivot chosen along `dim` and return
    /// the pivot's final position. Elements before it do not follow the
    /// pivot on `dim`; elements after it do not precede it.
    fn pivot<R: Rng + ?Sized>(&mut self, dim: Dim, sample: usize, rng: &mut R) -> usize;
}

/// Everything the builder needs from a collection of points.
pub trait Interface: Length + IndexAt + SubRange + PivotByDimension {}

impl<T: Length + IndexAt + SubRange + PivotByDimension + ?Sized> Interface for T {}

impl<P> Length for [P] {
    fn len(&self) -> usize {
        <[P]>::len(self)
    }
}

impl<P> IndexAt for [P] {
    type Item = P;
    fn index_at(&self, i: usize) -> &P {
        &self[i]
    }
}

impl<P> SubRange for [P] {
    fn sub_range(&mut self, start: usize, end: usize) -> &mut Self {
        &mut self[start..end]
    }
}

impl<P: CompareAlongDimension> PivotByDimension for [P] {
    fn pivot<R: Rng + ?Sized>(&mut self, dim: Dim, sample: usize, rng: &mut R) -> usize {
        let median = pivot::median_of_randoms(self, dim, sample, rng);
        pivot::partition(self, median, dim)
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// Interior or leaf node; every node holds exactly one point.
#[derive(Debug, Clone)]
struct Node {
    point: usize,
    dim: Dim,
    left: Option<usize>,
    right: Option<usize>,
}

/// A KD-tree over a fixed, non-empty set of points.
///
/// Nodes are stored in a flat arena and refer to points by their position in
/// `points`, which is reordered in place during construction.
pub struct Tree<P> {
    nodes: Vec<Node>,
    points: Vec<P>,
    root: usize,
}

impl<P: Comparable> Tree<P> {
    /// Build a tree from `points`, or `None` if there are none.
    pub fn new<R: Rng + ?Sized>(mut points: Vec<P>, sample: usize, rng: &mut R) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let mut nodes = Vec::with_capacity(points.len());
        let root = build_recursive(&mut nodes, points.as_mut_slice(), 0, Dim::X, sample, rng)?;

        Some(Tree {
            nodes,
            points,
            root,
        })
    }

    /// Find the single nearest point to `query` and its squared distance.
    pub fn nearest(&self, query: &P) -> Option<(&P, f64)> {
        let mut keeper = NKeeper::new(1);
        self.nearest_set(query, &mut keeper);
        let best = keeper.as_slice().first()?;
        self.resolve(best).map(|p| (p, best.dist))
    }

    /// Fill `keeper` with the points closest to `query`.
    ///
    /// The keeper is reset first, so one keeper can serve many queries.
    /// Slots that could not be filled keep the infinite-distance sentinel.
    pub fn nearest_set(&self, query: &P, keeper: &mut NKeeper) {
        keeper.reset();
        self.search(Some(self.root), query, keeper);
    }

    fn search(&self, node: Option<usize>, query: &P, keeper: &mut NKeeper) {
        let Some(idx) = node else {
            return;
        };
        let node = &self.nodes[idx];
        let point = &self.points[node.point];

        let c = query.compare(point, node.dim);
        let (near, far) = if c <= 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        self.search(near, query, keeper);
        keeper.keep(node.point, query.distance(point));

        if c * c <= keeper.max_dist() {
            self.search(far, query, keeper);
        }
    }

    /// The point referred to by a keeper slot, `None` for the sentinel.
    pub fn resolve(&self, entry: &ComparableDist) -> Option<&P> {
        entry.index.map(|i| &self.points[i])
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: empty trees are never constructed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn build_recursive<S, R>(
    nodes: &mut Vec<Node>,
    data: &mut S,
    offset: usize,
    dim: Dim,
    sample: usize,
    rng: &mut R,
) -> Option<usize>
where
    S: Interface + ?Sized,
    R: Rng + ?Sized,
{
    let n = data.len();
    if n == 0 {
        return None;
    }

    let p = data.pivot(dim, sample, rng);

    let node_idx = nodes.len();
    nodes.push(Node {
        point: offset + p,
        dim,
        left: None,
        right: None,
    });

    let left = build_recursive(nodes, data.sub_range(0, p), offset, dim.next(), sample, rng);
    let right = build_recursive(
        nodes,
        data.sub_range(p + 1, n),
        offset + p + 1,
        dim.next(),
        sample,
        rng,
    );

    nodes[node_idx].left = left;
    nodes[node_idx].right = right;

    Some(node_idx)
}
