//! The composite stream.
//!
//! [`SourceStream`] presents a sequence of independently opened parts as one
//! logical, seekable, read-only stream. It supports two addressing modes:
//!
//! - [`AddressingMode::Concatenated`]: parts are consecutive byte ranges and
//!   reads and seeks cross part boundaries automatically.
//! - [`AddressingMode::Volumes`]: only the selected part is addressable, and
//!   the caller switches parts with [`SourceStream::set_current`].
//!
//! # Reading split files
//!
//! ```rust,no_run
//! use partstream::SourceStream;
//! use std::io::Read;
//!
//! // Open the first part - the others are discovered while reading
//! let mut stream = SourceStream::open_numbered("backup.tar.001")?;
//!
//! let mut data = Vec::new();
//! stream.read_to_end(&mut data)?;
//! println!("read {} bytes from {} parts", data.len(), stream.part_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod options;
mod stream;

pub use options::{AddressingMode, SeekPastEnd, SourceOptions};
pub use stream::SourceStream;
