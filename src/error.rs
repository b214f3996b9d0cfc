//! Error types for multi-part stream operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when reading across a sequence of parts, along with a
//! convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! Inherent methods on [`SourceStream`](crate::SourceStream) return
//! `Result<T, Error>`. The [`std::io::Read`] and [`std::io::Seek`]
//! implementations return [`std::io::Error`]; the originating [`Error`] is
//! kept as the inner payload and can be recovered with [`Error::from_io`]:
//!
//! ```rust
//! use partstream::{Error, SourceStream};
//! use std::io::{Cursor, Seek, SeekFrom};
//!
//! let mut stream =
//!     SourceStream::from_streams(Cursor::new(vec![0u8; 10]), |_| Ok(None), Default::default())
//!         .unwrap();
//!
//! let err = stream.seek(SeekFrom::Start(50)).unwrap_err();
//! assert!(matches!(
//!     Error::from_io(&err),
//!     Some(Error::SeekBeyondEnd { target: 50, length: 10 })
//! ));
//! ```
//!
//! ## Distinguishing a short set from a broken part
//!
//! A resolver that simply has no further part is not an error. A part that
//! exists but cannot be opened is reported as [`Error::PartOpen`]:
//!
//! ```rust,no_run
//! use partstream::{Error, SourceStream};
//!
//! match SourceStream::open_numbered("backup.bin.001") {
//!     Ok(mut stream) => {
//!         stream.load_all_parts()?;
//!         println!("{} parts, {} bytes", stream.part_count(), stream.len());
//!     }
//!     Err(Error::PartOpen { index, path, source }) => {
//!         eprintln!("part {} ({}) exists but cannot be opened: {}", index, path, source);
//!     }
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), Error>(())
//! ```

use std::io;

/// The main error type for multi-part stream operations.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io] | A part failed to read or seek |
/// | Availability | [`PartUnavailable`][Self::PartUnavailable], [`PartOpen`][Self::PartOpen] | Missing or unreadable part |
/// | Caller misuse | [`SeekBeforeStart`][Self::SeekBeforeStart], [`SeekBeyondEnd`][Self::SeekBeyondEnd] | Invalid seek target |
/// | Unsupported | [`Unsupported`][Self::Unsupported] | Write or length mutation |
/// | Lifecycle | [`Closed`][Self::Closed] | Use after `close()` |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while reading or seeking within a part.
    ///
    /// Errors from an individual part are never retried; they are passed
    /// through unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The resolver reported that no part exists at the given index.
    ///
    /// Reaching the end of the sequence is ordinary. This error is only
    /// produced when an operation explicitly requires the part, such as
    /// [`SourceStream::select`](crate::SourceStream::select).
    #[error("Part {index} is not available (the sequence ends before it)")]
    PartUnavailable {
        /// The 0-based index of the part that was requested.
        index: usize,
    },

    /// A part exists but could not be opened.
    ///
    /// This is distinct from [`PartUnavailable`][Self::PartUnavailable]: the
    /// resolver located the part, but opening or measuring it failed.
    #[error("Part {index} could not be opened at '{path}': {source}")]
    PartOpen {
        /// The 0-based index of the part.
        index: usize,
        /// Diagnostic location of the part (file path or stream description).
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A path does not follow the numbered split-file convention.
    ///
    /// Returned by [`NumberedParts::detect`](crate::NumberedParts::detect)
    /// when the last extension is not a part number such as `.001`.
    #[error("Cannot derive part names from '{path}' (expected a numeric extension such as .001)")]
    InvalidPartName {
        /// The path that was given.
        path: String,
    },

    /// A seek resolved to a position before the start of the stream.
    #[error("Cannot seek before start of stream (offset {offset})")]
    SeekBeforeStart {
        /// The relative offset that was requested.
        offset: i64,
    },

    /// A seek resolved to a position past every resolvable part.
    ///
    /// The stream never clamps such a seek, so a truncated multi-part set
    /// is detectable by the caller.
    #[error("Cannot seek to {target}: only {length} bytes are reachable")]
    SeekBeyondEnd {
        /// The absolute target position.
        target: u64,
        /// The number of bytes reachable through the opened parts.
        length: u64,
    },

    /// The operation is not supported by a read-only stream.
    #[error("Unsupported operation: {operation}")]
    Unsupported {
        /// The name of the operation that was attempted.
        operation: &'static str,
    },

    /// The stream was already closed.
    #[error("Stream is closed")]
    Closed,
}

impl Error {
    /// Returns `true` if this error might be recoverable.
    ///
    /// - `PartUnavailable`: the caller can supply the missing part and retry
    /// - `Io` (transient kinds only): retry may succeed for `WouldBlock`,
    ///   `Interrupted`, `TimedOut`
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::PartUnavailable { .. } => true,
            Error::Io(e) | Error::PartOpen { source: e, .. } => matches!(
                e.kind(),
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }

    /// Returns `true` if this error was caused by the caller rather than by a part.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidPartName { .. }
                | Error::SeekBeforeStart { .. }
                | Error::SeekBeyondEnd { .. }
                | Error::Unsupported { .. }
                | Error::Closed
        )
    }

    /// Returns the part index associated with this error, if any.
    pub fn part_index(&self) -> Option<usize> {
        match self {
            Error::PartUnavailable { index } => Some(*index),
            Error::PartOpen { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Returns the diagnostic path associated with this error, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::PartOpen { path, .. } => Some(path.as_str()),
            Error::InvalidPartName { path } => Some(path.as_str()),
            _ => None,
        }
    }

    /// Recovers the [`Error`] carried inside an [`io::Error`] produced by
    /// the `Read` or `Seek` implementations.
    pub fn from_io(err: &io::Error) -> Option<&Error> {
        err.get_ref().and_then(|inner| inner.downcast_ref::<Error>())
    }

    /// Returns the [`io::ErrorKind`] this error maps to.
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            Error::Io(e) => e.kind(),
            Error::PartOpen { source, .. } => source.kind(),
            Error::PartUnavailable { .. } => io::ErrorKind::NotFound,
            Error::InvalidPartName { .. }
            | Error::SeekBeforeStart { .. }
            | Error::SeekBeyondEnd { .. } => io::ErrorKind::InvalidInput,
            Error::Unsupported { .. } => io::ErrorKind::Unsupported,
            Error::Closed => io::ErrorKind::NotConnected,
        }
    }

    /// Creates an Unsupported error.
    pub fn unsupported(operation: &'static str) -> Self {
        Error::Unsupported { operation }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            other => io::Error::new(other.io_kind(), other),
        }
    }
}

/// A specialized Result type for multi-part stream operations.
pub type Result<T> = std::result::Result<T, Error>;
