use std::path::PathBuf;

/// Errors that can occur in tilecollide.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    Parameter(String),

    #[error("could not open file: {source} ({path})")]
    StreamOpen {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("I/O error: {source} ({path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("name mismatch: file not sorted for name pairs ({first} / {second})")]
    PairingInvariant { first: String, second: String },

    #[error("could not parse read name '{name}': {reason}")]
    Metadata { name: String, reason: String },

    #[error("malformed record '{name}': {reason}")]
    MalformedRecord { name: String, reason: String },

    #[error("internal inconsistency: {0}")]
    InternalConsistency(String),
}

impl Error {
    /// Convenience for wrapping an `io::Error` with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }

    /// Wrap a failure to open or decode the head of an input stream.
    pub fn stream_open(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::StreamOpen {
            source,
            path: path.into(),
        }
    }

    pub fn metadata(name: &str, reason: impl Into<String>) -> Self {
        Self::Metadata {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn malformed(name: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
