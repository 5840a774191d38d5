pub mod classify;
pub mod error;
pub mod histogram;
pub mod io;
pub mod kdtree;
pub mod metadata;
pub mod params;
pub mod pipeline;
pub mod record;
pub mod stats;
pub mod tiles;

use std::io::{BufWriter, Write};

use log::{info, warn};

use crate::io::report::{write_coincidences, write_collisions};
use crate::io::AlignmentFile;
use crate::metadata::IlluminaNames;
use crate::params::Parameters;
use crate::pipeline::Outcome;

/// Top-level dispatcher. Called from `main()` after CLI parsing.
pub fn run(params: &Parameters) -> anyhow::Result<()> {
    params.validate()?;

    info!("tilecollide v{}", env!("CARGO_PKG_VERSION"));
    info!("input: {}", params.input.display());
    info!("mode: {}", params.mode);
    info!("units: {} x {} nm", params.x_unit, params.y_unit);
    info!("offsets: {:?}", params.offsets);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(params.threads)
        .build()?;
    let source = AlignmentFile::new(&params.input);

    let outcome = pipeline::run(&source, &IlluminaNames, params, &pool)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match outcome {
        Outcome::Collisions(report) => write_collisions(&mut out, &report)?,
        Outcome::Coincidences(report) => write_coincidences(&mut out, &report)?,
        Outcome::Empty(message) => {
            warn!("{message}");
            return Ok(());
        }
    }
    out.flush()?;

    info!("Done");
    Ok(())
}
