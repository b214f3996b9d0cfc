//! Parts: the physical sources behind a [`SourceStream`](crate::SourceStream).
//!
//! A [`Part`] is one independently opened byte source, either a file opened
//! by the stream itself or a caller-supplied reader. Its length is measured
//! once when the part is created and never changes afterwards.
//!
//! Further parts are discovered through a [`PartResolver`], which is asked
//! for indices in strictly increasing order, one at a time.

mod resolver;

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

pub use resolver::{FileParts, NoMoreParts, PartResolver, StreamParts};

/// How the parts of a stream are obtained.
///
/// Fixed for the lifetime of a stream. File-backed parts are opened by the
/// stream and therefore always released on close; stream-backed parts belong
/// to the caller and may be handed back instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOrigin {
    /// Parts are files opened from paths supplied by the resolver.
    Files,
    /// Parts are readers supplied directly by the caller.
    Streams,
}

/// One opened physical source.
pub struct Part<R> {
    reader: R,
    len: u64,
    pos: u64,
    path: Option<PathBuf>,
}

impl<R: Read + Seek> Part<R> {
    /// Wraps an already opened reader.
    ///
    /// The total length is measured by seeking to the end; the reader's
    /// current position is preserved and becomes the part's position.
    pub fn new(mut reader: R) -> io::Result<Self> {
        let pos = reader.stream_position()?;
        let len = reader.seek(SeekFrom::End(0))?;
        if pos != len {
            reader.seek(SeekFrom::Start(pos))?;
        }
        Ok(Self {
            reader,
            len,
            pos,
            path: None,
        })
    }

    /// Reads from the current part position, advancing it.
    pub(crate) fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }

    /// Moves the part position to `offset` bytes from the start of the part.
    pub(crate) fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(offset))?;
        self.pos = offset;
        Ok(())
    }
}

impl Part<BufReader<File>> {
    /// Opens a file-backed part.
    ///
    /// `capacity` is the read buffer size used for the file.
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            reader: BufReader::with_capacity(capacity, file),
            len,
            pos: 0,
            path: Some(path.to_path_buf()),
        })
    }
}

impl<R> Part<R> {
    /// Attaches a diagnostic path to a stream-backed part.
    ///
    /// The path is only used for enumeration and error messages.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Returns the total length of the part in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns `true` if the part holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the position within the part.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Returns the number of bytes between the position and the end of the part.
    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.pos)
    }

    /// Returns the originating path, if the part is file-backed or was given one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Consumes the part, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R> std::fmt::Debug for Part<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Part")
            .field("len", &self.len)
            .field("pos", &self.pos)
            .field("path", &self.path)
            .finish()
    }
}

/// Diagnostic snapshot of an opened part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartInfo {
    /// 0-based index of the part.
    pub index: usize,
    /// Length of the part in bytes.
    pub len: u64,
    /// Originating path, if known.
    pub path: Option<PathBuf>,
}

impl PartInfo {
    pub(crate) fn of<R>(index: usize, part: &Part<R>) -> Self {
        Self {
            index,
            len: part.len,
            path: part.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;

    #[test]
    fn test_new_measures_length() {
        let part = Part::new(Cursor::new(vec![7u8; 42])).unwrap();
        assert_eq!(part.len(), 42);
        assert_eq!(part.position(), 0);
        assert_eq!(part.remaining(), 42);
        assert!(part.path().is_none());
    }

    #[test]
    fn test_new_preserves_position() {
        let mut cursor = Cursor::new(b"0123456789".to_vec());
        cursor.set_position(4);
        let mut part = Part::new(cursor).unwrap();
        assert_eq!(part.len(), 10);
        assert_eq!(part.position(), 4);

        let mut buf = [0u8; 3];
        assert_eq!(part.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"456");
        assert_eq!(part.position(), 7);
    }

    #[test]
    fn test_seek_to_and_remaining() {
        let mut part = Part::new(Cursor::new(b"abcdef".to_vec())).unwrap();
        part.seek_to(5).unwrap();
        assert_eq!(part.remaining(), 1);
        part.seek_to(9).unwrap();
        assert_eq!(part.remaining(), 0);
    }

    #[test]
    fn test_open_file_part() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin.001");
        File::create(&path).unwrap().write_all(b"hello").unwrap();

        let part = Part::open(&path, 16).unwrap();
        assert_eq!(part.len(), 5);
        assert_eq!(part.path(), Some(path.as_path()));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Part::open(dir.path().join("absent"), 16).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_with_path_and_info() {
        let part = Part::new(Cursor::new(vec![0u8; 3]))
            .unwrap()
            .with_path("memory://part0");
        let info = PartInfo::of(0, &part);
        assert_eq!(info.len, 3);
        assert_eq!(info.path, Some(PathBuf::from("memory://part0")));
    }
}
