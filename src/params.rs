use std::path::PathBuf;

use clap::Parser;

use crate::classify::Offset;
use crate::error::Error;
use crate::kdtree::DEFAULT_PIVOT_SAMPLE;
use crate::tiles::Scale;

// ---------------------------------------------------------------------------
// Analysis mode enum
// ---------------------------------------------------------------------------

/// Which population of pairs is indexed and which is queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Index every mapped pair and query each against its own tile.
    All,
    /// Index discordant pairs only and query proper pairs against them.
    Discordant,
}

impl std::str::FromStr for Mode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "discordant" => Ok(Self::Discordant),
            _ => Err(format!(
                "unknown mode '{s}'; expected 'all' or 'discordant'"
            )),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Discordant => write!(f, "discordant"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parameters struct
// ---------------------------------------------------------------------------

/// tilecollide command-line parameters.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tilecollide",
    about = "Find optical collisions between read pairs sharing a flow-cell tile",
    version
)]
pub struct Parameters {
    /// Name-sorted BAM or SAM file (mates must be adjacent)
    pub input: PathBuf,

    /// Analysis mode: all or discordant
    #[arg(long, default_value = "all")]
    pub mode: Mode,

    // ── Physical geometry ───────────────────────────────────────────────
    /// Width of one X coordinate tick in nm
    #[arg(long = "x-unit", default_value_t = 37.5)]
    pub x_unit: f64,

    /// Height of one Y coordinate tick in nm
    #[arg(long = "y-unit", default_value_t = 37.5)]
    pub y_unit: f64,

    // ── Genomic overlap ─────────────────────────────────────────────────
    /// Overlap offsets in bases, ascending; the first must be 0
    #[arg(long, value_delimiter = ',', default_values_t = vec![0, 100, 1000, 10000])]
    pub offsets: Vec<i64>,

    // ── Index construction ──────────────────────────────────────────────
    /// Number of random points used to estimate each split median
    #[arg(long = "pivot-sample", default_value_t = DEFAULT_PIVOT_SAMPLE)]
    pub pivot_sample: usize,

    /// Number of threads for tile index construction; 0 = all cores
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Seed for pivot sampling
    #[arg(long, default_value_t = 1)]
    pub seed: u64,
}

impl Parameters {
    /// Physical size of a coordinate tick on each axis.
    pub fn scale(&self) -> Scale {
        Scale {
            x: self.x_unit,
            y: self.y_unit,
        }
    }

    /// The configured offsets with their report labels.
    pub fn offsets(&self) -> Vec<Offset> {
        self.offsets.iter().map(|&d| Offset::new(d)).collect()
    }

    /// Validate parameter combinations that clap alone cannot enforce.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, unit) in [("--x-unit", self.x_unit), ("--y-unit", self.y_unit)] {
            if !unit.is_finite() || unit <= 0.0 {
                return Err(Error::Parameter(format!(
                    "{name} must be a positive number, got {unit}"
                )));
            }
        }

        match self.offsets.first() {
            None => {
                return Err(Error::Parameter("--offsets must not be empty".into()));
            }
            Some(&first) if first != 0 => {
                return Err(Error::Parameter(format!(
                    "--offsets must start at 0, got {first}"
                )));
            }
            Some(_) => {}
        }
        if self.offsets.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::Parameter(
                "--offsets must be strictly ascending".into(),
            ));
        }

        if self.pivot_sample == 0 {
            return Err(Error::Parameter("--pivot-sample must be >= 1".into()));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
