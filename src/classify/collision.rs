/// Collision classification over all mapped pairs
use std::collections::BTreeMap;

use log::{debug, trace};

use super::{concordance_class, locate, nearest_distinct, Classification, Neighbor, Offset};
use crate::error::Error;
use crate::histogram::DistanceHistogram;
use crate::kdtree::NKeeper;
use crate::record::{ReadPairRecord, TileAddress};
use crate::tiles::TileIndex;

/// Report labels of the cross-tabulation cells, indexed
/// `[query class][neighbor class]`.
const CROSS_LABELS: [[&str; 2]; 2] = [
    ["Concord Concord", "Concord Discord"],
    ["Discord Concord", "Discord Discord"],
];

/// Distance histograms for one tile.
#[derive(Debug, Clone, Default)]
pub struct TileHistograms {
    /// Every query with a neighbor, overlapping or not.
    pub all: DistanceHistogram,
    /// Offset-0 collisions by query and neighbor concordance.
    pub cross: [[DistanceHistogram; 2]; 2],
}

impl TileHistograms {
    /// Histograms with their report labels, in report order.
    pub fn classes(&self) -> impl Iterator<Item = (&'static str, &DistanceHistogram)> {
        std::iter::once(("All", &self.all)).chain((0..2).flat_map(move |q| {
            (0..2).map(move |n| (CROSS_LABELS[q][n], &self.cross[q][n]))
        }))
    }
}

/// Totals accumulated over the query pass.
#[derive(Debug, Clone)]
pub struct CollisionCounts {
    pub offsets: Vec<Offset>,
    /// Colliding concordant queries per offset.
    pub concordant: Vec<u64>,
    /// Colliding discordant queries per offset.
    pub discordant: Vec<u64>,
    pub tiles: BTreeMap<TileAddress, TileHistograms>,
}

impl CollisionCounts {
    pub fn new(offsets: Vec<Offset>) -> Self {
        let n = offsets.len();
        Self {
            offsets,
            concordant: vec![0; n],
            discordant: vec![0; n],
            tiles: BTreeMap::new(),
        }
    }
}

/// Queries every indexed pair against its own tile.
pub struct CollisionClassifier<'a> {
    index: &'a TileIndex,
    keeper: NKeeper,
    counts: CollisionCounts,
}

impl<'a> CollisionClassifier<'a> {
    pub fn new(index: &'a TileIndex, offsets: Vec<Offset>) -> Self {
        Self {
            index,
            keeper: NKeeper::new(2),
            counts: CollisionCounts::new(offsets),
        }
    }

    pub fn classify(&mut self, record: ReadPairRecord) -> Result<Classification, Error> {
        let index = self.index;
        let address = record.tile_address();
        let tree = index.get(&address).ok_or_else(|| {
            Error::InternalConsistency(format!("no index for the tile of {}", locate(&record)))
        })?;

        let query = index.colony(record);
        let (neighbor, dist) = match nearest_distinct(tree, &query, &mut self.keeper)? {
            Neighbor::Found { colony, dist } => (&colony.record, dist),
            Neighbor::SoleOccupant => {
                trace!("{} is alone on its tile", locate(&query.record));
                return Ok(Classification::SoleOccupant);
            }
        };
        let query = &query.record;
        let bucket = dist as usize;

        let CollisionCounts {
            offsets,
            concordant,
            discordant,
            tiles,
        } = &mut self.counts;
        let histograms = tiles.entry(address).or_default();
        histograms.all.inc(bucket);

        let mut overlaps = 0;
        for (i, offset) in offsets.iter().enumerate() {
            if !query.overlaps(neighbor, offset.dist) {
                continue;
            }
            overlaps += 1;
            if query.concordant {
                concordant[i] += 1;
            } else {
                discordant[i] += 1;
            }

            if offset.dist == 0 {
                let (q, n) = (
                    concordance_class(query.concordant),
                    concordance_class(neighbor.concordant),
                );
                histograms.cross[q][n].inc(bucket);
                debug!(
                    "Collision {} / {} at {dist:.1} ({})",
                    locate(query),
                    locate(neighbor),
                    CROSS_LABELS[q][n]
                );
            }
        }

        Ok(Classification::Neighbor { bucket, overlaps })
    }

    pub fn finish(self) -> CollisionCounts {
        self.counts
    }
}
