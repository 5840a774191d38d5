//! Read-pair records: mate intervals plus sequencer metadata.

use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::io::{AlignedRead, MatePair};
use crate::metadata::{Interner, Metadata, NameParser};

/// Hashable unique tile identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileAddress {
    pub flow_cell: Arc<str>,
    pub lane: u8,
    pub tile: u32,
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.flow_cell, self.lane, self.tile)
    }
}

/// Terse representation of one mate's mapping: a 0-based half-open interval
/// on a reference segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub segment: Arc<str>,
    pub start: i64,
    pub end: i64,
}

impl Mapping {
    fn from_read(read: &AlignedRead) -> Result<Self, Error> {
        match (&read.segment, read.start, read.end) {
            (Some(segment), Some(start), Some(end)) => Ok(Mapping {
                segment: Arc::clone(segment),
                start,
                end,
            }),
            _ => Err(Error::malformed(
                &read.name,
                "mapped record has no reference position",
            )),
        }
    }

    /// Whether this interval, widened by `offset` on both edges, intersects
    /// `other` on the same segment. Widening clamps at the `i64` range.
    pub fn overlaps(&self, other: &Mapping, offset: i64) -> bool {
        self.segment == other.segment
            && self.start.saturating_sub(offset) < other.end
            && self.end.saturating_add(offset) > other.start
    }
}

/// Mapping and sequencer metadata for one read pair. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadPairRecord {
    pub a: Mapping,
    pub b: Mapping,
    pub concordant: bool,
    pub metadata: Metadata,
}

impl ReadPairRecord {
    /// Build a record from a mate pair. The pair shares a name, so only the
    /// first mate's name is parsed.
    pub fn new(
        pair: &MatePair,
        parser: &dyn NameParser,
        interner: &mut Interner,
    ) -> Result<Self, Error> {
        let metadata = parser.parse(pair.name())?.intern(interner);
        Ok(ReadPairRecord {
            a: Mapping::from_read(&pair.a)?,
            b: Mapping::from_read(&pair.b)?,
            concordant: pair.is_concordant(),
            metadata,
        })
    }

    pub fn tile_address(&self) -> TileAddress {
        TileAddress {
            flow_cell: Arc::clone(&self.metadata.flow_cell),
            lane: self.metadata.lane,
            tile: self.metadata.tile,
        }
    }

    /// Whether any mate of `self`, widened by `offset`, overlaps any mate of
    /// `other` (A–A, B–B, A–B and B–A).
    pub fn overlaps(&self, other: &ReadPairRecord, offset: i64) -> bool {
        self.a.overlaps(&other.a, offset)
            || self.b.overlaps(&other.b, offset)
            || self.a.overlaps(&other.b, offset)
            || self.b.overlaps(&other.a, offset)
    }
}
