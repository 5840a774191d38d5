/// Nearest-neighbor classification of read pairs against their tile index
///
/// This module handles:
/// - Labelled genomic-overlap offsets
/// - Finding a query's nearest physically distinct neighbor
/// - Routing the result into counters and per-tile histograms
pub mod coincidence;
pub mod collision;

pub use coincidence::{CoincidenceClassifier, CoincidenceCounts};
pub use collision::{CollisionClassifier, CollisionCounts, TileHistograms};

use crate::error::Error;
use crate::kdtree::{NKeeper, Tree};
use crate::record::ReadPairRecord;
use crate::tiles::Colony;

/// Genomic-overlap threshold in bases with its report label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offset {
    pub dist: i64,
    pub label: String,
}

impl Offset {
    pub fn new(dist: i64) -> Self {
        let label = match dist {
            0 => "Coincide".to_string(),
            100 => "Adjacent".to_string(),
            1000 => "At1k".to_string(),
            10000 => "At10k".to_string(),
            d => format!("At{d}"),
        };
        Self { dist, label }
    }
}

/// Row/column of the concordance cross-tabulation.
pub(crate) fn concordance_class(concordant: bool) -> usize {
    if concordant {
        0
    } else {
        1
    }
}

/// What happened to one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No index exists for the query's tile.
    Unindexed,
    /// The query is the only colony on its tile.
    SoleOccupant,
    /// A distinct neighbor was found `bucket` units away; `overlaps` is the
    /// number of configured offsets at which the two pairs overlap.
    Neighbor { bucket: usize, overlaps: usize },
}

/// Nearest colony on the query's tile other than the query itself.
pub(crate) enum Neighbor<'t> {
    Found { colony: &'t Colony, dist: f64 },
    SoleOccupant,
}

/// Position of a record for diagnostics.
pub(crate) fn locate(record: &ReadPairRecord) -> String {
    let c = record.metadata.coordinate;
    format!("{}:{}:{}", record.tile_address(), c.x, c.y)
}

/// Query `tree`, of which `query` is a member, for its nearest distinct
/// neighbor. At most one slot may hold the query itself.
pub(crate) fn nearest_distinct<'t>(
    tree: &'t Tree<Colony>,
    query: &Colony,
    keeper: &mut NKeeper,
) -> Result<Neighbor<'t>, Error> {
    tree.nearest_set(query, keeper);

    let mut seen_self = false;
    for slot in keeper.as_slice() {
        let Some(colony) = tree.resolve(slot) else {
            if seen_self {
                return Ok(Neighbor::SoleOccupant);
            }
            return Err(Error::InternalConsistency(format!(
                "nearest-neighbor query for {} returned no result on a tile of {} colonies",
                locate(&query.record),
                tree.len()
            )));
        };

        if colony.record.metadata == query.record.metadata {
            if seen_self {
                return Err(Error::InternalConsistency(format!(
                    "{} is indexed more than once",
                    locate(&query.record)
                )));
            }
            seen_self = true;
            continue;
        }

        return Ok(Neighbor::Found {
            colony,
            dist: slot.dist.sqrt(),
        });
    }

    Err(Error::InternalConsistency(format!(
        "no distinct neighbor for {}",
        locate(&query.record)
    )))
}
