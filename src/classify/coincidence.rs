/// Coincidence of proper pairs with indexed discordant pairs
use log::{debug, trace};

use super::{locate, Classification, Offset};
use crate::error::Error;
use crate::record::ReadPairRecord;
use crate::tiles::TileIndex;

/// Totals accumulated over the query pass.
#[derive(Debug, Clone)]
pub struct CoincidenceCounts {
    pub offsets: Vec<Offset>,
    /// Queries whose nearest discordant pair overlaps, per offset.
    pub coincident: Vec<u64>,
}

/// Queries proper pairs against an index of discordant pairs. The query is
/// never a member of the index, so only the single nearest colony is needed.
pub struct CoincidenceClassifier<'a> {
    index: &'a TileIndex,
    counts: CoincidenceCounts,
}

impl<'a> CoincidenceClassifier<'a> {
    pub fn new(index: &'a TileIndex, offsets: Vec<Offset>) -> Self {
        let n = offsets.len();
        Self {
            index,
            counts: CoincidenceCounts {
                offsets,
                coincident: vec![0; n],
            },
        }
    }

    pub fn classify(&mut self, record: ReadPairRecord) -> Result<Classification, Error> {
        let index = self.index;
        let Some(tree) = index.get(&record.tile_address()) else {
            trace!("No discordant pairs on the tile of {}", locate(&record));
            return Ok(Classification::Unindexed);
        };

        let query = index.colony(record);
        let (nearest, dist_sq) = tree.nearest(&query).ok_or_else(|| {
            Error::InternalConsistency(format!(
                "nearest-neighbor query for {} returned no result on a tile of {} colonies",
                locate(&query.record),
                tree.len()
            ))
        })?;
        if nearest.record.metadata == query.record.metadata {
            return Err(Error::InternalConsistency(format!(
                "proper pair {} found in the discordant index",
                locate(&query.record)
            )));
        }

        let dist = dist_sq.sqrt();
        let mut overlaps = 0;
        for (i, offset) in self.counts.offsets.iter().enumerate() {
            if query.record.overlaps(&nearest.record, offset.dist) {
                self.counts.coincident[i] += 1;
                overlaps += 1;
            }
        }
        if overlaps > 0 {
            debug!(
                "Coincidence {} / {} at {dist:.1} ({overlaps} offsets)",
                locate(&query.record),
                locate(&nearest.record)
            );
        }

        Ok(Classification::Neighbor {
            bucket: dist as usize,
            overlaps,
        })
    }

    pub fn finish(self) -> CoincidenceCounts {
        self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::testutil::pair;
    use crate::metadata::Interner;
    use crate::tiles::{Scale, TileIndexBuilder};
    use rayon::ThreadPoolBuilder;

    fn index(records: &[ReadPairRecord]) -> TileIndex {
        let mut builder = TileIndexBuilder::new(Scale { x: 1.0, y: 1.0 }, 100, 1);
        for r in records {
            builder.push(r.clone());
        }
        let pool = ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        builder.build(&pool)
    }

    fn offsets() -> Vec<Offset> {
        [0, 100, 1000].into_iter().map(Offset::new).collect()
    }

    #[test]
    fn counts_overlapping_nearest_discordant() {
        let mut interner = Interner::new();
        let discordant = vec![
            pair(&mut interner, 1101, 10, 10, 1000, false),
            pair(&mut interner, 1101, 50, 50, 1000, false),
        ];
        let index = index(&discordant);
        let mut classifier = CoincidenceClassifier::new(&index, offsets());

        // Nearest is (10, 10), 4 units away; same interval.
        let near = pair(&mut interner, 1101, 10, 14, 1000, true);
        assert_eq!(
            classifier.classify(near).unwrap(),
            Classification::Neighbor { bucket: 4, overlaps: 3 }
        );

        // Nearest is (50, 50), whose B mate ends 80 bases before this A mate.
        let offset = pair(&mut interner, 1101, 50, 51, 1330, true);
        assert_eq!(
            classifier.classify(offset).unwrap(),
            Classification::Neighbor { bucket: 1, overlaps: 2 }
        );

        assert_eq!(classifier.finish().coincident, vec![1, 2, 2]);
    }

    #[test]
    fn unindexed_tile_is_skipped() {
        let mut interner = Interner::new();
        let index = index(&[pair(&mut interner, 1101, 0, 0, 0, false)]);
        let mut classifier = CoincidenceClassifier::new(&index, offsets());
        let other_tile = pair(&mut interner, 1102, 0, 0, 0, true);
        assert_eq!(
            classifier.classify(other_tile).unwrap(),
            Classification::Unindexed
        );
        assert_eq!(classifier.finish().coincident, vec![0, 0, 0]);
    }

    #[test]
    fn query_found_in_index_is_internal_error() {
        let mut interner = Interner::new();
        let r = pair(&mut interner, 1101, 3, 3, 0, true);
        let index = index(std::slice::from_ref(&r));
        let mut classifier = CoincidenceClassifier::new(&index, offsets());
        assert!(matches!(
            classifier.classify(r),
            Err(Error::InternalConsistency(_))
        ));
    }
}
