/// BAM/SAM input with noodles (streaming)
use crate::error::Error;
use crate::io::{AlignedRead, ReadSource, Records};
use flate2::read::MultiGzDecoder;
use noodles::bam;
use noodles::sam;
use noodles::sam::alignment::RecordBuf;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An alignment file on disk. BAM is detected by the `.bam` extension;
/// anything else is read as SAM, gzip-compressed if it ends in `.gz`.
#[derive(Debug, Clone)]
pub struct AlignmentFile {
    path: PathBuf,
    name: String,
}

impl AlignmentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    fn is_bam(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("bam"))
    }

    fn is_gzipped(&self) -> bool {
        let path_str = self.path.to_string_lossy();
        path_str.ends_with(".gz") || path_str.ends_with(".gzip")
    }
}

impl ReadSource for AlignmentFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> Result<Records<'_>, Error> {
        let file = File::open(&self.path).map_err(|e| Error::stream_open(e, &self.path))?;

        let reader = if self.is_bam() {
            let mut reader = bam::io::Reader::new(file);
            let header = reader
                .read_header()
                .map_err(|e| Error::stream_open(e, &self.path))?;
            AlignmentReader::Bam { reader, header }
        } else {
            let inner: Box<dyn BufRead + Send> = if self.is_gzipped() {
                Box::new(BufReader::new(MultiGzDecoder::new(file)))
            } else {
                Box::new(BufReader::new(file))
            };
            let mut reader = sam::io::Reader::new(inner);
            let header = reader
                .read_header()
                .map_err(|e| Error::stream_open(e, &self.path))?;
            AlignmentReader::Sam { reader, header }
        };

        log::debug!(
            "Opened {} ({} reference sequences)",
            self.name,
            reader.header().reference_sequences().len()
        );

        Ok(Box::new(AlignedReads::new(reader, &self.path)))
    }
}

enum AlignmentReader {
    Bam {
        reader: bam::io::Reader<noodles::bgzf::Reader<File>>,
        header: sam::Header,
    },
    Sam {
        reader: sam::io::Reader<Box<dyn BufRead + Send>>,
        header: sam::Header,
    },
}

impl AlignmentReader {
    fn header(&self) -> &sam::Header {
        match self {
            Self::Bam { header, .. } | Self::Sam { header, .. } => header,
        }
    }

    /// Read the next record into `record`; returns 0 at end of stream.
    fn read_record_buf(&mut self, record: &mut RecordBuf) -> std::io::Result<usize> {
        match self {
            Self::Bam { reader, header } => reader.read_record_buf(header, record),
            Self::Sam { reader, header } => reader.read_record_buf(header, record),
        }
    }
}

/// Iterator converting noodles records into [`AlignedRead`]s.
struct AlignedReads {
    reader: AlignmentReader,
    segments: Vec<Arc<str>>,
    record: RecordBuf,
    path: PathBuf,
    done: bool,
}

impl AlignedReads {
    fn new(reader: AlignmentReader, path: &Path) -> Self {
        let segments: Vec<Arc<str>> = reader
            .header()
            .reference_sequences()
            .keys()
            .map(|name| Arc::from(name.to_string()))
            .collect();

        Self {
            reader,
            segments,
            record: RecordBuf::default(),
            path: path.to_path_buf(),
            done: false,
        }
    }

    fn convert(&self) -> Result<AlignedRead, Error> {
        let record = &self.record;
        let name = record
            .name()
            .map(|n| n.to_string())
            .unwrap_or_default();

        let segment = match record.reference_sequence_id() {
            Some(id) => Some(Arc::clone(self.segments.get(id).ok_or_else(|| {
                Error::malformed(&name, format!("reference sequence id {id} not in header"))
            })?)),
            None => None,
        };

        // noodles positions are 1-based inclusive.
        let start = record.alignment_start().map(|p| usize::from(p) as i64 - 1);
        let end = record.alignment_end().map(|p| usize::from(p) as i64);

        Ok(AlignedRead {
            name,
            flags: record.flags(),
            segment,
            start,
            end,
        })
    }
}

impl Iterator for AlignedReads {
    type Item = Result<AlignedRead, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.read_record_buf(&mut self.record) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                let read = self.convert();
                self.done = read.is_err();
                Some(read)
            }
            Err(e) => {
                self.done = true;
                Some(Err(Error::io(e, &self.path)))
            }
        }
    }
}
