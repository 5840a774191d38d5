/// Per-tile spatial indices
///
/// Pass one groups admitted read pairs by tile address; the builder then
/// constructs one KD-tree per tile on a worker pool. Every tile is finished
/// before the index is returned.
use std::collections::BTreeMap;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use rayon::ThreadPool;

use crate::kdtree::{CompareAlongDimension, Dim, DistanceTo, Tree};
use crate::record::{ReadPairRecord, TileAddress};

/// Physical size of one coordinate tick on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

/// A read pair placed on its tile in physical units.
#[derive(Debug, Clone)]
pub struct Colony {
    pub x: f64,
    pub y: f64,
    pub record: ReadPairRecord,
}

impl Colony {
    pub fn new(record: ReadPairRecord, scale: Scale) -> Self {
        let c = record.metadata.coordinate;
        Self {
            x: f64::from(c.x) * scale.x,
            y: f64::from(c.y) * scale.y,
            record,
        }
    }
}

impl CompareAlongDimension for Colony {
    fn compare(&self, other: &Self, dim: Dim) -> f64 {
        match dim {
            Dim::X => self.x - other.x,
            Dim::Y => self.y - other.y,
        }
    }
}

impl DistanceTo for Colony {
    fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Accumulates records by tile during the indexing pass.
pub struct TileIndexBuilder {
    groups: BTreeMap<TileAddress, Vec<Colony>>,
    scale: Scale,
    pivot_sample: usize,
    seed: u64,
    records: usize,
}

impl TileIndexBuilder {
    pub fn new(scale: Scale, pivot_sample: usize, seed: u64) -> Self {
        Self {
            groups: BTreeMap::new(),
            scale,
            pivot_sample,
            seed,
            records: 0,
        }
    }

    pub fn push(&mut self, record: ReadPairRecord) {
        let address = record.tile_address();
        self.groups
            .entry(address)
            .or_default()
            .push(Colony::new(record, self.scale));
        self.records += 1;
    }

    /// Number of records pushed.
    pub fn len(&self) -> usize {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Build every tile's tree on `pool` and wait for all of them.
    ///
    /// Tiles are seeded by their rank in address order, so the result does
    /// not depend on the number of worker threads.
    pub fn build(self, pool: &ThreadPool) -> TileIndex {
        let Self {
            groups,
            scale,
            pivot_sample,
            seed,
            records,
        } = self;

        info!(
            "Building {} tile indices from {} records on {} threads",
            groups.len(),
            records,
            pool.current_num_threads()
        );

        let groups: Vec<(TileAddress, Vec<Colony>)> = groups.into_iter().collect();
        let trees: Vec<(TileAddress, Tree<Colony>)> = pool.install(|| {
            groups
                .into_par_iter()
                .enumerate()
                .filter_map(|(rank, (address, colonies))| {
                    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(rank as u64));
                    let n = colonies.len();
                    let tree = Tree::new(colonies, pivot_sample, &mut rng)?;
                    debug!("Tile {address}: {n} colonies");
                    Some((address, tree))
                })
                .collect()
        });

        TileIndex {
            trees: trees.into_iter().collect(),
            scale,
        }
    }
}

/// Immutable map from tile address to that tile's tree.
pub struct TileIndex {
    trees: BTreeMap<TileAddress, Tree<Colony>>,
    scale: Scale,
}

impl TileIndex {
    pub fn get(&self, address: &TileAddress) -> Option<&Tree<Colony>> {
        self.trees.get(address)
    }

    /// Place a query record in the same physical frame as the indexed ones.
    pub fn colony(&self, record: ReadPairRecord) -> Colony {
        Colony::new(record, self.scale)
    }

    /// Number of indexed tiles.
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Indexed tile addresses in ascending order.
    pub fn tiles(&self) -> impl Iterator<Item = &TileAddress> {
        self.trees.keys()
    }
}
