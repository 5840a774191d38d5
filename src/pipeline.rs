/// Two-pass collision analysis
///
/// Pass one reads the whole stream and builds every tile index; pass two
/// re-opens the stream and classifies each admitted pair. No query runs
/// until every index is complete.
use log::info;
use noodles::sam::alignment::record::Flags;
use rayon::ThreadPool;

use crate::classify::{Classification, CoincidenceClassifier, CollisionClassifier};
use crate::error::Error;
use crate::io::report::{CoincidenceReport, CollisionReport};
use crate::io::{MatePair, MatePairs, ReadSource};
use crate::metadata::{Interner, NameParser};
use crate::params::{Mode, Parameters};
use crate::record::ReadPairRecord;
use crate::stats::PairStats;
use crate::tiles::TileIndexBuilder;

/// Flag test applied to both mates of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairFilter {
    mask: Flags,
    required: Flags,
}

impl PairFilter {
    fn base_mask() -> Flags {
        Flags::UNMAPPED | Flags::MATE_UNMAPPED | Flags::SECONDARY | Flags::DUPLICATE
    }

    /// Both mates mapped, primary and not duplicates.
    pub fn mapped() -> Self {
        Self {
            mask: Self::base_mask(),
            required: Flags::empty(),
        }
    }

    /// Mapped, and neither mate flagged as properly paired.
    pub fn discordant() -> Self {
        Self {
            mask: Self::base_mask() | Flags::PROPERLY_SEGMENTED,
            required: Flags::empty(),
        }
    }

    /// Mapped, and both mates flagged as properly paired.
    pub fn proper() -> Self {
        let required = Flags::PROPERLY_SEGMENTED;
        Self {
            mask: Self::base_mask() | required,
            required,
        }
    }

    pub fn admits(&self, pair: &MatePair) -> bool {
        (pair.a.flags & self.mask) == self.required && (pair.b.flags & self.mask) == self.required
    }
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum Outcome {
    Collisions(CollisionReport),
    Coincidences(CoincidenceReport),
    /// Nothing qualified for indexing.
    Empty(&'static str),
}

/// Run both passes over `source`.
pub fn run(
    source: &dyn ReadSource,
    parser: &dyn NameParser,
    params: &Parameters,
    pool: &ThreadPool,
) -> Result<Outcome, Error> {
    let (index_filter, query_filter, empty) = match params.mode {
        Mode::All => (PairFilter::mapped(), PairFilter::mapped(), "no mapped read"),
        Mode::Discordant => (
            PairFilter::discordant(),
            PairFilter::proper(),
            "no discordant read",
        ),
    };

    let mut interner = Interner::new();
    let mut stats = PairStats::new();
    let mut builder = TileIndexBuilder::new(params.scale(), params.pivot_sample, params.seed);

    info!("Pass 1: indexing {}", source.name());
    for pair in MatePairs::new(source.open()?) {
        let pair = pair?;
        stats.record_pair();
        if !index_filter.admits(&pair) {
            continue;
        }
        let record = ReadPairRecord::new(&pair, parser, &mut interner)?;
        stats.record_mapped(record.concordant);
        builder.push(record);
    }
    stats.print_summary();

    if builder.is_empty() {
        return Ok(Outcome::Empty(empty));
    }
    let index = builder.build(pool);

    info!("Pass 2: querying {} tiles", index.len());
    let name = source.name().to_string();
    match params.mode {
        Mode::All => {
            let mut classifier = CollisionClassifier::new(&index, params.offsets());
            query_pass(source, parser, &query_filter, &mut interner, |r| {
                classifier.classify(r)
            })?;
            Ok(Outcome::Collisions(CollisionReport {
                name,
                stats,
                counts: classifier.finish(),
            }))
        }
        Mode::Discordant => {
            let mut classifier = CoincidenceClassifier::new(&index, params.offsets());
            query_pass(source, parser, &query_filter, &mut interner, |r| {
                classifier.classify(r)
            })?;
            Ok(Outcome::Coincidences(CoincidenceReport {
                name,
                stats,
                counts: classifier.finish(),
            }))
        }
    }
}

fn query_pass<F>(
    source: &dyn ReadSource,
    parser: &dyn NameParser,
    filter: &PairFilter,
    interner: &mut Interner,
    mut classify: F,
) -> Result<(), Error>
where
    F: FnMut(ReadPairRecord) -> Result<Classification, Error>,
{
    let (mut queried, mut neighbors, mut alone, mut unindexed) = (0u64, 0u64, 0u64, 0u64);
    for pair in MatePairs::new(source.open()?) {
        let pair = pair?;
        if !filter.admits(&pair) {
            continue;
        }
        let record = ReadPairRecord::new(&pair, parser, interner)?;
        queried += 1;
        match classify(record)? {
            Classification::Neighbor { .. } => neighbors += 1,
            Classification::SoleOccupant => alone += 1,
            Classification::Unindexed => unindexed += 1,
        }
    }

    info!(
        "Queried {queried} pairs: {neighbors} with a neighbor, {alone} alone on their tile, {unindexed} on unindexed tiles"
    );
    Ok(())
}
