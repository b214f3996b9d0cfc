//! Options for opening a [`SourceStream`](super::SourceStream).

use crate::READ_BUFFER_SIZE;

/// How the logical stream is addressed across parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressingMode {
    /// Parts are consecutive byte ranges of one logical stream.
    ///
    /// Reads and seeks cross part boundaries automatically.
    #[default]
    Concatenated,
    /// Only the selected part is addressable.
    ///
    /// Length and position refer to that part alone. Reading past its end
    /// returns a short read; switching parts is explicit via
    /// [`SourceStream::set_current`](super::SourceStream::set_current).
    Volumes,
}

/// Policy for seeks whose target lies past every resolvable part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeekPastEnd {
    /// Fail with [`Error::SeekBeyondEnd`](crate::Error::SeekBeyondEnd).
    #[default]
    Error,
    /// Accept the seek like [`std::fs::File`] does; later reads return 0 bytes.
    Allow,
}

/// Options controlling a [`SourceStream`](super::SourceStream).
///
/// # Example
///
/// ```rust
/// use partstream::{AddressingMode, SeekPastEnd, SourceOptions};
///
/// let options = SourceOptions::new()
///     .mode(AddressingMode::Volumes)
///     .leave_stream_open(true)
///     .seek_past_end(SeekPastEnd::Allow);
/// assert!(options.leave_stream_open);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceOptions {
    /// Addressing mode; fixed once the stream is constructed.
    pub mode: AddressingMode,
    /// Hand caller-supplied streams back on close instead of releasing them.
    ///
    /// Ignored for file-backed parts, whose handles are always released.
    pub leave_stream_open: bool,
    /// Behavior of seeks past the last resolvable part.
    pub seek_past_end: SeekPastEnd,
    /// Read buffer size for file-backed parts.
    pub buffer_capacity: usize,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            mode: AddressingMode::default(),
            leave_stream_open: false,
            seek_past_end: SeekPastEnd::default(),
            buffer_capacity: READ_BUFFER_SIZE,
        }
    }
}

impl SourceOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the addressing mode.
    pub fn mode(mut self, mode: AddressingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets whether caller-supplied streams are handed back on close.
    pub fn leave_stream_open(mut self, leave_open: bool) -> Self {
        self.leave_stream_open = leave_open;
        self
    }

    /// Sets the policy for seeks past the last resolvable part.
    pub fn seek_past_end(mut self, policy: SeekPastEnd) -> Self {
        self.seek_past_end = policy;
        self
    }

    /// Sets the read buffer size for file-backed parts (minimum 1 byte).
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(1);
        self
    }
}
