/// Aligned-read input and report output
pub mod alignment;
pub mod report;

pub use alignment::AlignmentFile;

use std::sync::Arc;

use noodles::sam::alignment::record::Flags;

use crate::error::Error;

/// The parts of one alignment record the collision analysis needs.
///
/// `start` and `end` are 0-based, half-open reference coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRead {
    pub name: String,
    pub flags: Flags,
    pub segment: Option<Arc<str>>,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl AlignedRead {
    /// An unplaced record carrying only a name and flags.
    pub fn unplaced(name: impl Into<String>, flags: Flags) -> Self {
        Self {
            name: name.into(),
            flags,
            segment: None,
            start: None,
            end: None,
        }
    }

    /// A record aligned to `[start, end)` on `segment`.
    pub fn placed(name: impl Into<String>, flags: Flags, segment: &str, start: i64, end: i64) -> Self {
        Self {
            name: name.into(),
            flags,
            segment: Some(Arc::from(segment)),
            start: Some(start),
            end: Some(end),
        }
    }
}

/// Two adjacent records sharing a read name.
#[derive(Debug, Clone)]
pub struct MatePair {
    pub a: AlignedRead,
    pub b: AlignedRead,
}

impl MatePair {
    pub fn name(&self) -> &str {
        &self.a.name
    }

    /// Both mates carry the proper-pair flag.
    pub fn is_concordant(&self) -> bool {
        (self.a.flags & self.b.flags).is_properly_segmented()
    }
}

/// Groups a name-sorted record stream into mate pairs.
///
/// Adjacent records with different names, or a trailing record with no
/// mate, end the stream with [`Error::PairingInvariant`].
pub struct MatePairs<I> {
    inner: I,
    failed: bool,
}

impl<I> MatePairs<I>
where
    I: Iterator<Item = Result<AlignedRead, Error>>,
{
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            failed: false,
        }
    }
}

impl<I> Iterator for MatePairs<I>
where
    I: Iterator<Item = Result<AlignedRead, Error>>,
{
    type Item = Result<MatePair, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let result = match self.inner.next()? {
            Err(e) => Err(e),
            Ok(a) => match self.inner.next() {
                None => Err(Error::PairingInvariant {
                    first: a.name,
                    second: "<end of stream>".to_string(),
                }),
                Some(Err(e)) => Err(e),
                Some(Ok(b)) if a.name != b.name => Err(Error::PairingInvariant {
                    first: a.name,
                    second: b.name,
                }),
                Some(Ok(b)) => Ok(MatePair { a, b }),
            },
        };

        self.failed = result.is_err();
        Some(result)
    }
}

/// Boxed stream of alignment records.
pub type Records<'a> = Box<dyn Iterator<Item = Result<AlignedRead, Error>> + 'a>;

/// A re-readable source of aligned reads. Every call to `open` starts a fresh,
/// independent stream from the first record.
pub trait ReadSource {
    /// Name used in reports.
    fn name(&self) -> &str;

    fn open(&self) -> Result<Records<'_>, Error>;
}

/// In-memory read source.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub name: String,
    pub reads: Vec<AlignedRead>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, reads: Vec<AlignedRead>) -> Self {
        Self {
            name: name.into(),
            reads,
        }
    }
}

impl ReadSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> Result<Records<'_>, Error> {
        Ok(Box::new(self.reads.iter().cloned().map(Ok)))
    }
}
