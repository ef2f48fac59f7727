//! Error types for the classpeek-core library.
//!
//! Failures are split into two layers. [`Error`] is what every public entry
//! point returns: it separates transport faults ([`Error::Io`]) from class
//! files that cannot be processed ([`Error::Unprocessable`]). The latter wraps
//! a [`ReadError`], whose four variants are the user-actionable categories.
//!
//! [`PoolError`] and [`DescriptorError`] are raised by the constant pool and
//! the descriptor parser when used on their own; inside a decode they are
//! folded into [`ReadError::InvalidData`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for classpeek operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause attached to [`ReadError::InvalidData`]
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all classpeek operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Transport fault from the underlying byte source, never reinterpreted
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failed to open or read an input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to enumerate a directory
    #[error("failed to read directory '{path}': {source}")]
    DirectoryRead {
        /// Path to the directory that failed to enumerate
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to open or index a class archive
    #[error("failed to read archive '{path}': {source}")]
    ArchiveRead {
        /// Path to the archive
        path: PathBuf,
        /// Underlying archive error
        #[source]
        source: zip::result::ZipError,
    },

    /// The data is not a processable class file
    #[error("unprocessable class file: {0}")]
    Unprocessable(#[from] ReadError),
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory read error
    pub fn directory_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new archive read error
    pub fn archive_read(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::ArchiveRead {
            path: path.into(),
            source,
        }
    }

    /// Returns the class file fault if this error is one
    pub fn as_read_error(&self) -> Option<&ReadError> {
        match self {
            Self::Unprocessable(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true if the input was reachable but is not a valid class file
    pub fn is_unprocessable(&self) -> bool {
        matches!(self, Self::Unprocessable(_))
    }
}

impl From<PoolError> for Error {
    fn from(e: PoolError) -> Self {
        Self::Unprocessable(e.into())
    }
}

impl From<DescriptorError> for Error {
    fn from(e: DescriptorError) -> Self {
        Self::Unprocessable(e.into())
    }
}

/// A class file that cannot be processed
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReadError {
    /// The magic constant is absent or wrong
    #[error("malformed header at offset {offset}: {details}")]
    MalformedHeader {
        /// Offset of the offending magic byte
        offset: usize,
        /// Detailed description of the mismatch
        details: String,
    },

    /// The stream ended inside a fixed-size field or declared-length block
    #[error("incomplete data at offset {offset}: {details}")]
    IncompleteData {
        /// Number of bytes consumed before the stream ran dry
        offset: u64,
        /// What was being read
        details: String,
    },

    /// A field was read successfully but holds a value the grammar forbids
    #[error("invalid data: {details}")]
    InvalidData {
        /// Detailed description of the issue
        details: String,
        /// Lower-level fault, if any
        #[source]
        source: Option<BoxedCause>,
    },

    /// The major version is newer than the configured ceiling
    #[error("unsupported class file major version {major} (expected at most {max})")]
    UnsupportedVersion {
        /// Major version found in the header
        major: u16,
        /// Configured maximum
        max: u16,
    },
}

impl ReadError {
    /// Creates a new malformed header error
    pub fn malformed_header(offset: usize, details: impl Into<String>) -> Self {
        Self::MalformedHeader {
            offset,
            details: details.into(),
        }
    }

    /// Creates a new incomplete data error
    pub fn incomplete(offset: u64, details: impl Into<String>) -> Self {
        Self::IncompleteData {
            offset,
            details: details.into(),
        }
    }

    /// Creates a new invalid data error without a cause
    pub fn invalid_data(details: impl Into<String>) -> Self {
        Self::InvalidData {
            details: details.into(),
            source: None,
        }
    }

    /// Creates a new invalid data error wrapping a lower-level fault
    pub fn invalid_data_caused_by(
        details: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InvalidData {
            details: details.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<PoolError> for ReadError {
    fn from(e: PoolError) -> Self {
        Self::invalid_data_caused_by(format!("illegal constant pool: {}", e), e)
    }
}

impl From<DescriptorError> for ReadError {
    fn from(e: DescriptorError) -> Self {
        let details = format!("invalid descriptor \"{}\"", e.descriptor);
        Self::invalid_data_caused_by(details, e)
    }
}

/// Illegal access to the constant pool
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PoolError {
    /// Index 0, or an index past the end of the pool
    #[error("invalid constant pool entry #{index}")]
    InvalidEntry {
        /// The offending index
        index: u16,
    },

    /// The slot holds an entry that is neither a string nor an indirection
    #[error("constant pool entry #{origin} refers to a non-string (entry #{index})")]
    NotAString {
        /// The unset slot that was reached
        index: u16,
        /// The index originally requested
        origin: u16,
    },

    /// An indirection chain led back to the index originally requested
    #[error("constant pool entry #{index} refers to itself")]
    SelfReference {
        /// The index originally requested
        index: u16,
    },
}

/// A descriptor or class notation string that does not follow the grammar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid descriptor \"{descriptor}\" ({details})")]
pub struct DescriptorError {
    /// The offending descriptor string
    pub descriptor: String,
    /// What is wrong with it
    pub details: String,
}

impl DescriptorError {
    /// Creates a new descriptor error
    pub fn new(descriptor: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
            details: details.into(),
        }
    }
}
