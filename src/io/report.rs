/// Tab-separated collision and coincidence reports
use std::io::{self, Write};

use crate::classify::{CoincidenceCounts, CollisionCounts};
use crate::stats::{fraction, PairStats};

/// Result of an all-pairs run.
#[derive(Debug, Clone)]
pub struct CollisionReport {
    /// Input name printed in the first column of every line.
    pub name: String,
    pub stats: PairStats,
    pub counts: CollisionCounts,
}

/// Result of a discordant run.
#[derive(Debug, Clone)]
pub struct CoincidenceReport {
    pub name: String,
    pub stats: PairStats,
    pub counts: CoincidenceCounts,
}

/// Write the summary line, one line per offset and one line per non-zero
/// histogram bucket.
pub fn write_collisions<W: Write>(out: &mut W, report: &CollisionReport) -> io::Result<()> {
    let CollisionReport {
        name,
        stats,
        counts,
    } = report;

    writeln!(
        out,
        "# {name}\t{}\t{}\t{:.6}\t{}\t{:.6}\t{}\t{:.6}",
        stats.total,
        stats.mapped,
        stats.mapped_fraction(),
        stats.concordant,
        stats.concordant_fraction(),
        stats.discordant,
        stats.discordant_fraction(),
    )?;

    for (i, offset) in counts.offsets.iter().enumerate() {
        let (c, d) = (counts.concordant[i], counts.discordant[i]);
        writeln!(
            out,
            "{name}\t{}\t{}\t{:.6}\t{c}\t{:.6}\t{d}\t{:.6}",
            offset.label,
            c + d,
            fraction(c + d, stats.mapped),
            fraction(c, stats.concordant),
            fraction(d, stats.discordant),
        )?;
    }

    for (tile, histograms) in &counts.tiles {
        for (label, histogram) in histograms.classes() {
            for (dist, count) in histogram.nonzero() {
                writeln!(out, "{name}\t{tile}\t{label}\t{dist}\t{count}")?;
            }
        }
    }

    Ok(())
}

/// Write the summary line and one line per offset.
pub fn write_coincidences<W: Write>(out: &mut W, report: &CoincidenceReport) -> io::Result<()> {
    let CoincidenceReport {
        name,
        stats,
        counts,
    } = report;

    writeln!(
        out,
        "# {name}\t{}\t{}\t{:.6}",
        stats.total,
        stats.discordant,
        stats.discordant_fraction(),
    )?;

    for (offset, &n) in counts.offsets.iter().zip(&counts.coincident) {
        writeln!(
            out,
            "{name}\t{}\t{n}\t{:.6}",
            offset.label,
            fraction(n, stats.discordant),
        )?;
    }

    Ok(())
}
