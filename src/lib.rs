//! # partstream
//!
//! A seekable, read-only byte stream over a sequence of independently opened
//! parts, such as split files (`backup.tar.001`, `backup.tar.002`, ...) or
//! arbitrary caller-supplied readers.
//!
//! The caller never needs to know in advance how many parts exist: the first
//! part is opened up front, and every further part is requested from a
//! resolver the moment a read or seek needs it.
//!
//! ## Quick Start
//!
//! ### Reading Split Files
//!
//! ```rust,no_run
//! use partstream::{Result, SourceStream};
//! use std::io::{Read, Seek, SeekFrom};
//!
//! fn main() -> Result<()> {
//!     let mut stream = SourceStream::open_numbered("backup.tar.001")?;
//!
//!     // Discover every part up front to learn the total length
//!     stream.load_all_parts()?;
//!     println!("{} parts, {} bytes", stream.part_count(), stream.len());
//!
//!     // Random access across part boundaries
//!     stream.seek(SeekFrom::Start(1_000_000))?;
//!     let mut block = [0u8; 512];
//!     stream.read_exact(&mut block)?;
//!     Ok(())
//! }
//! ```
//!
//! ### Reading Caller-Supplied Streams
//!
//! ```rust
//! use partstream::{SourceOptions, SourceStream};
//! use std::io::{Cursor, Read};
//!
//! let chunks = vec![b"two ".to_vec(), b"three".to_vec()];
//! let mut stream = SourceStream::from_streams(
//!     Cursor::new(b"one ".to_vec()),
//!     move |index| Ok(chunks.get(index - 1).cloned().map(Cursor::new)),
//!     SourceOptions::default(),
//! )
//! .unwrap();
//!
//! let mut text = String::new();
//! stream.read_to_string(&mut text).unwrap();
//! assert_eq!(text, "one two three");
//! ```
//!
//! ### Volume Mode
//!
//! In [`AddressingMode::Volumes`] only the selected part is addressable.
//! Reading past its end returns a short read, and the caller switches parts
//! explicitly:
//!
//! ```rust
//! use partstream::{AddressingMode, SourceOptions, SourceStream};
//! use std::io::{Cursor, Read};
//!
//! let options = SourceOptions::new().mode(AddressingMode::Volumes);
//! let mut stream = SourceStream::from_streams(
//!     Cursor::new(b"abc".to_vec()),
//!     |index| Ok((index == 1).then(|| Cursor::new(b"defg".to_vec()))),
//!     options,
//! )
//! .unwrap();
//!
//! let mut buf = [0u8; 8];
//! assert_eq!(stream.read(&mut buf).unwrap(), 3);
//! assert_eq!(stream.read(&mut buf).unwrap(), 0);
//!
//! stream.select(1).unwrap();
//! assert_eq!(stream.len(), 4);
//! assert_eq!(stream.read(&mut buf).unwrap(), 4);
//! ```
//!
//! ## Error Handling
//!
//! Inherent methods return [`Result<T>`]. The [`std::io::Read`] and
//! [`std::io::Seek`] implementations carry the same [`Error`] inside the
//! returned [`std::io::Error`]; see [`Error::from_io`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | No | Command-line interface tool |
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

/// Default buffer size for file-backed parts (8 KiB).
pub(crate) const READ_BUFFER_SIZE: usize = 8192;

pub mod error;
pub mod naming;
pub mod part;
pub mod source;

pub use error::{Error, Result};
pub use naming::NumberedParts;
pub use part::{FileParts, NoMoreParts, Part, PartInfo, PartOrigin, PartResolver, StreamParts};
pub use source::{AddressingMode, SeekPastEnd, SourceOptions, SourceStream};
