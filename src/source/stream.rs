//! Composite stream over a lazily extended sequence of parts.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::{AddressingMode, SeekPastEnd, SourceOptions};
use crate::naming::NumberedParts;
use crate::part::{FileParts, NoMoreParts, Part, PartInfo, PartOrigin, PartResolver, StreamParts};
use crate::{Error, Result};

/// A read-only, seekable stream over an ordered sequence of parts.
///
/// Part 0 is opened at construction. Further parts are requested from the
/// resolver only when a read or seek needs them, strictly in index order,
/// and stay open until the whole stream is closed.
///
/// # Example
///
/// ```rust
/// use partstream::{SourceOptions, SourceStream};
/// use std::io::{Cursor, Read, Seek, SeekFrom};
///
/// let rest = vec![b"world".to_vec()];
/// let mut stream = SourceStream::from_streams(
///     Cursor::new(b"hello ".to_vec()),
///     move |index| Ok(rest.get(index - 1).cloned().map(Cursor::new)),
///     SourceOptions::default(),
/// )?;
///
/// let mut text = String::new();
/// stream.read_to_string(&mut text)?;
/// assert_eq!(text, "hello world");
///
/// stream.seek(SeekFrom::Start(6))?;
/// let mut word = [0u8; 5];
/// stream.read_exact(&mut word)?;
/// assert_eq!(&word, b"world");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct SourceStream<R> {
    /// Opened parts, append-only until close.
    parts: Vec<Part<R>>,
    /// Supplier of parts beyond those opened.
    resolver: Box<dyn PartResolver<R>>,
    /// Whether parts are files opened here or caller-supplied streams.
    origin: PartOrigin,
    options: SourceOptions,
    /// Index of the active part.
    current: usize,
    /// Total length of the parts before the active one (0 in volume mode).
    preceding: u64,
    closed: bool,
}

impl SourceStream<BufReader<File>> {
    /// Opens a file-backed stream.
    ///
    /// `first` is opened immediately as part 0. `next_path` maps each further
    /// index to the path of that part, or `None` when there are no more parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PartOpen`] if the first file cannot be opened.
    pub fn from_files<F>(first: impl AsRef<Path>, next_path: F, options: SourceOptions) -> Result<Self>
    where
        F: FnMut(usize) -> Option<PathBuf> + 'static,
    {
        let first = first.as_ref();
        let part = Part::open(first, options.buffer_capacity).map_err(|source| Error::PartOpen {
            index: 0,
            path: first.to_string_lossy().to_string(),
            source,
        })?;
        let resolver = FileParts::new(next_path, options.buffer_capacity);
        Ok(Self::with_resolver(part, resolver, PartOrigin::Files, options))
    }

    /// Opens numbered split files (`name.001`, `name.002`, ...) with default options.
    ///
    /// Parts after the first are discovered on demand; the sequence ends at
    /// the first number with no file on disk.
    pub fn open_numbered(first: impl AsRef<Path>) -> Result<Self> {
        Self::open_numbered_with(first, SourceOptions::default())
    }

    /// Opens numbered split files with the given options.
    pub fn open_numbered_with(first: impl AsRef<Path>, options: SourceOptions) -> Result<Self> {
        let naming = NumberedParts::detect(first.as_ref())?;
        Self::from_files(first, move |index| naming.existing_path(index), options)
    }
}

impl<R: Read + Seek> SourceStream<R> {
    /// Opens a stream over caller-supplied readers.
    ///
    /// `first` becomes part 0. `next_stream` maps each further index to a
    /// reader, `Ok(None)` when there are no more parts, or `Err` when the
    /// part exists but cannot be produced.
    pub fn from_streams<F>(first: R, next_stream: F, options: SourceOptions) -> Result<Self>
    where
        F: FnMut(usize) -> io::Result<Option<R>> + 'static,
    {
        let part = Part::new(first).map_err(|source| Error::PartOpen {
            index: 0,
            path: "stream part 0".to_string(),
            source,
        })?;
        Ok(Self::with_resolver(
            part,
            StreamParts::new(next_stream),
            PartOrigin::Streams,
            options,
        ))
    }

    /// Opens a stream consisting of a single caller-supplied part.
    pub fn single(part: Part<R>, options: SourceOptions) -> Self {
        Self::with_resolver(part, NoMoreParts, PartOrigin::Streams, options)
    }

    /// Creates a stream from an opened first part and an arbitrary resolver.
    pub fn with_resolver<P>(first: Part<R>, resolver: P, origin: PartOrigin, options: SourceOptions) -> Self
    where
        P: PartResolver<R> + 'static,
    {
        log::debug!(
            "Opened part 0 ({} bytes, {:?} mode, {:?})",
            first.len(),
            origin,
            options.mode
        );
        Self {
            parts: vec![first],
            resolver: Box::new(resolver),
            origin,
            options,
            current: 0,
            preceding: 0,
            closed: false,
        }
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }
        Ok(())
    }

    /// Makes `index` the active part and recomputes the preceding length.
    fn place(&mut self, index: usize) {
        self.current = index;
        self.preceding = match self.options.mode {
            AddressingMode::Concatenated => self.parts[..index].iter().map(|p| p.len()).sum(),
            AddressingMode::Volumes => 0,
        };
    }

    /// Ensures parts `0..=index` are open.
    ///
    /// Returns `Ok(false)` when the resolver reports that the sequence ends
    /// before `index`; the active part is then parked at the last opened one.
    /// Calling this for an index that is already open does nothing.
    pub fn load_part(&mut self, index: usize) -> Result<bool> {
        self.check_open()?;
        while self.parts.len() <= index {
            let next = self.parts.len();
            match self.resolver.resolve(next)? {
                Some(part) => {
                    log::debug!(
                        "Opened part {} ({} bytes{})",
                        next,
                        part.len(),
                        part.path()
                            .map(|p| format!(", {}", p.display()))
                            .unwrap_or_default()
                    );
                    self.parts.push(part);
                }
                None => {
                    log::debug!("No part at index {}; the sequence has {} parts", next, next);
                    self.place(next - 1);
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Makes part `index` the active part, opening it on demand.
    ///
    /// Returns `Ok(false)` if no such part exists; the active part is then
    /// the last one that could be opened.
    pub fn set_current(&mut self, index: usize) -> Result<bool> {
        if self.load_part(index)? {
            self.place(index);
            return Ok(true);
        }
        Ok(false)
    }

    /// Makes part `index` the active part, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PartUnavailable`] when the sequence ends before `index`.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if self.set_current(index)? {
            return Ok(());
        }
        Err(Error::PartUnavailable { index })
    }

    /// Opens every reachable part, then makes part 0 the active part.
    ///
    /// Use this before [`len`](Self::len) when the true total length is
    /// needed up front, or to detect an unreadable part before reading.
    pub fn load_all_parts(&mut self) -> Result<()> {
        let mut index = self.parts.len();
        while self.load_part(index)? {
            index += 1;
        }
        self.place(0);
        log::debug!("Loaded {} parts, {} bytes", self.parts.len(), self.len());
        Ok(())
    }

    /// Returns the logical length.
    ///
    /// In concatenated mode this is the sum of the *opened* parts; call
    /// [`load_all_parts`](Self::load_all_parts) first for the true total.
    /// In volume mode it is the length of the active part.
    pub fn len(&self) -> u64 {
        if self.closed {
            return 0;
        }
        match self.options.mode {
            AddressingMode::Concatenated => self.parts.iter().map(|p| p.len()).sum(),
            AddressingMode::Volumes => self.parts[self.current].len(),
        }
    }

    /// Returns `true` if the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the logical position.
    pub fn position(&self) -> u64 {
        if self.closed {
            return 0;
        }
        self.preceding + self.parts[self.current].position()
    }

    /// Moves to an absolute logical position. Equivalent to seeking from the start.
    pub fn set_position(&mut self, pos: u64) -> Result<u64> {
        self.seek_to(SeekFrom::Start(pos))
    }

    /// Seeks like [`Seek::seek`], returning a typed error.
    ///
    /// In concatenated mode the containing part is located from part 0
    /// onwards, opening parts on demand. In volume mode the target is
    /// interpreted within the active part only.
    ///
    /// # Errors
    ///
    /// - [`Error::SeekBeforeStart`] if the target is negative
    /// - [`Error::SeekBeyondEnd`] if the target lies past every resolvable
    ///   part and [`SeekPastEnd::Error`] is configured
    ///
    /// On error the position is left unchanged.
    pub fn seek_to(&mut self, pos: SeekFrom) -> Result<u64> {
        self.check_open()?;
        let target = self.resolve_target(pos)?;
        let (current, preceding) = (self.current, self.preceding);
        if let Err(e) = self.locate(target) {
            self.current = current;
            self.preceding = preceding;
            return Err(e);
        }
        Ok(target)
    }

    fn resolve_target(&self, pos: SeekFrom) -> Result<u64> {
        let (base, offset) = match pos {
            SeekFrom::Start(p) => return Ok(p),
            SeekFrom::Current(offset) => (self.position(), offset),
            SeekFrom::End(offset) => (self.len(), offset),
        };
        match base.checked_add_signed(offset) {
            Some(target) => Ok(target),
            None if offset < 0 => Err(Error::SeekBeforeStart { offset }),
            None => Err(Error::SeekBeyondEnd {
                target: u64::MAX,
                length: self.len(),
            }),
        }
    }

    fn locate(&mut self, target: u64) -> Result<()> {
        let allow_past_end = self.options.seek_past_end == SeekPastEnd::Allow;

        match self.options.mode {
            AddressingMode::Concatenated => {
                self.place(0);
                loop {
                    let end = self.preceding + self.parts[self.current].len();
                    if target <= end {
                        break;
                    }
                    let next = self.current + 1;
                    if !self.load_part(next)? {
                        if allow_past_end {
                            break;
                        }
                        return Err(Error::SeekBeyondEnd {
                            target,
                            length: end,
                        });
                    }
                    self.preceding = end;
                    self.current = next;
                }
            }
            AddressingMode::Volumes => {
                let len = self.parts[self.current].len();
                if target > len && !allow_past_end {
                    return Err(Error::SeekBeyondEnd {
                        target,
                        length: len,
                    });
                }
            }
        }

        let offset = target - self.preceding;
        let part = &mut self.parts[self.current];
        if part.position() != offset {
            part.seek_to(offset)?;
        }
        log::trace!(
            "Seek to {} resolved to part {} offset {}",
            target,
            self.current,
            offset
        );
        Ok(())
    }

    /// Moves to the start of the next part after the active one is exhausted.
    ///
    /// Never advances in volume mode.
    fn advance(&mut self) -> Result<bool> {
        if self.options.mode == AddressingMode::Volumes {
            return Ok(false);
        }
        let next = self.current + 1;
        if !self.load_part(next)? {
            return Ok(false);
        }
        let exhausted = self.parts[self.current].len();
        self.parts[next].seek_to(0)?;
        self.preceding += exhausted;
        self.current = next;
        log::debug!(
            "Crossed into part {} at logical offset {}",
            next,
            self.preceding
        );
        Ok(true)
    }

    fn read_parts(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.check_open()?;
        let mut filled = 0;
        while filled < buf.len() {
            let part = &mut self.parts[self.current];
            let remaining = part.remaining();
            if remaining == 0 {
                match self.advance() {
                    Ok(true) => continue,
                    Ok(false) => break,
                    // Hand back what was read; the next call reports the failure
                    Err(_) if filled > 0 => break,
                    Err(e) => return Err(e),
                }
            }
            let want = (buf.len() - filled).min(usize::try_from(remaining).unwrap_or(usize::MAX));
            match part.read(&mut buf[filled..filled + want]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(_) if filled > 0 => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    /// Always fails: the stream is read-only.
    pub fn set_len(&mut self, _len: u64) -> Result<()> {
        Err(Error::unsupported("set_len"))
    }

    /// Releases every opened part and empties the registry.
    ///
    /// When the stream was built over caller-supplied streams with
    /// [`leave_stream_open`](SourceOptions::leave_stream_open) set, the
    /// streams are returned to the caller instead of being released, in
    /// part order. File-backed parts are always released. Every later
    /// operation fails with [`Error::Closed`]; closing twice is a no-op.
    pub fn close(&mut self) -> Vec<R> {
        if self.closed {
            return Vec::new();
        }
        self.closed = true;
        self.current = 0;
        self.preceding = 0;
        self.resolver = Box::new(NoMoreParts);
        let parts = std::mem::take(&mut self.parts);

        if self.origin == PartOrigin::Streams && self.options.leave_stream_open {
            log::debug!("Leaving {} caller-supplied streams open", parts.len());
            return parts.into_iter().map(Part::into_inner).collect();
        }

        log::debug!("Releasing {} parts", parts.len());
        drop(parts);
        Vec::new()
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the number of opened parts.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Returns the 0-based index of the active part.
    pub fn current_part(&self) -> usize {
        self.current
    }

    /// Returns an opened part by index.
    pub fn part(&self, index: usize) -> Option<&Part<R>> {
        self.parts.get(index)
    }

    /// Returns a snapshot of every opened part.
    pub fn parts(&self) -> Vec<PartInfo> {
        self.parts
            .iter()
            .enumerate()
            .map(|(index, part)| PartInfo::of(index, part))
            .collect()
    }

    /// Returns the paths of opened parts that have one.
    pub fn paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.parts.iter().filter_map(|part| part.path())
    }

    /// Returns whether parts are files opened by the stream.
    pub fn is_file_mode(&self) -> bool {
        self.origin == PartOrigin::Files
    }

    /// Returns how parts are obtained.
    pub fn origin(&self) -> PartOrigin {
        self.origin
    }

    /// Returns the addressing mode.
    pub fn mode(&self) -> AddressingMode {
        self.options.mode
    }

    /// Returns the options the stream was opened with.
    pub fn options(&self) -> &SourceOptions {
        &self.options
    }
}

impl<R: Read + Seek> Read for SourceStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_parts(buf)?)
    }
}

impl<R: Read + Seek> Seek for SourceStream<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Ok(self.seek_to(pos)?)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        self.check_open()?;
        Ok(self.position())
    }
}

impl<R: Read + Seek> Write for SourceStream<R> {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(Error::unsupported("write").into())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<R> std::fmt::Debug for SourceStream<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceStream")
            .field("origin", &self.origin)
            .field("mode", &self.options.mode)
            .field("part_count", &self.parts.len())
            .field("current_part", &self.current)
            .field("preceding", &self.preceding)
            .field("closed", &self.closed)
            .finish()
    }
}
