//! The part resolver contract and its file-mode and stream-mode adapters.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::PathBuf;

use super::Part;
use crate::{Error, Result};

/// Supplies parts beyond those already opened.
///
/// `resolve` is always called with the next index in sequence, i.e. the
/// number of parts opened so far. It never skips ahead.
///
/// Returning `Ok(None)` means the sequence has ended; this is an ordinary
/// outcome, not a failure. Any failure to open an existing part must be
/// returned as an error (typically [`Error::PartOpen`]) so that callers can
/// tell a short set from a broken one.
///
/// Closures of the right shape implement this trait directly:
///
/// ```rust
/// use partstream::{Part, PartResolver, Result};
/// use std::io::Cursor;
///
/// let chunks = vec![b"abc".to_vec(), b"def".to_vec()];
/// let mut resolver = move |index: usize| -> Result<Option<Part<Cursor<Vec<u8>>>>> {
///     match chunks.get(index) {
///         Some(data) => Ok(Some(Part::new(Cursor::new(data.clone()))?)),
///         None => Ok(None),
///     }
/// };
/// assert!(resolver.resolve(1).unwrap().is_some());
/// assert!(resolver.resolve(2).unwrap().is_none());
/// ```
pub trait PartResolver<R> {
    /// Opens the part at `index`, or reports that there is none.
    fn resolve(&mut self, index: usize) -> Result<Option<Part<R>>>;
}

impl<R, F> PartResolver<R> for F
where
    F: FnMut(usize) -> Result<Option<Part<R>>>,
{
    fn resolve(&mut self, index: usize) -> Result<Option<Part<R>>> {
        self(index)
    }
}

/// A resolver for single-part streams: there is never a next part.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMoreParts;

impl<R> PartResolver<R> for NoMoreParts {
    fn resolve(&mut self, _index: usize) -> Result<Option<Part<R>>> {
        Ok(None)
    }
}

/// File-mode resolver: maps an index to a path, then opens that file.
///
/// The wrapped function returns `None` when there is no further part. A
/// path that is returned but cannot be opened yields [`Error::PartOpen`].
pub struct FileParts<F> {
    next_path: F,
    capacity: usize,
}

impl<F> FileParts<F>
where
    F: FnMut(usize) -> Option<PathBuf>,
{
    /// Creates a file-mode resolver using `capacity` bytes of read buffer per file.
    pub fn new(next_path: F, capacity: usize) -> Self {
        Self {
            next_path,
            capacity,
        }
    }
}

impl<F> PartResolver<BufReader<File>> for FileParts<F>
where
    F: FnMut(usize) -> Option<PathBuf>,
{
    fn resolve(&mut self, index: usize) -> Result<Option<Part<BufReader<File>>>> {
        let Some(path) = (self.next_path)(index) else {
            return Ok(None);
        };
        Part::open(&path, self.capacity)
            .map(Some)
            .map_err(|source| Error::PartOpen {
                index,
                path: path.to_string_lossy().to_string(),
                source,
            })
    }
}

/// Stream-mode resolver: maps an index to a caller-supplied reader.
///
/// The wrapped function returns `Ok(None)` when there is no further part and
/// `Err` when the part exists but could not be produced.
pub struct StreamParts<F> {
    next_stream: F,
}

impl<F> StreamParts<F> {
    /// Creates a stream-mode resolver.
    pub fn new(next_stream: F) -> Self {
        Self { next_stream }
    }
}

impl<R, F> PartResolver<R> for StreamParts<F>
where
    R: Read + Seek,
    F: FnMut(usize) -> io::Result<Option<R>>,
{
    fn resolve(&mut self, index: usize) -> Result<Option<Part<R>>> {
        let describe = || format!("stream part {}", index);
        match (self.next_stream)(index) {
            Ok(None) => Ok(None),
            Ok(Some(reader)) => Part::new(reader).map(Some).map_err(|source| Error::PartOpen {
                index,
                path: describe(),
                source,
            }),
            Err(source) => Err(Error::PartOpen {
                index,
                path: describe(),
                source,
            }),
        }
    }
}

impl<F> std::fmt::Debug for FileParts<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileParts")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<F> std::fmt::Debug for StreamParts<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamParts").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;

    #[test]
    fn test_no_more_parts() {
        let mut resolver = NoMoreParts;
        let part: Option<Part<Cursor<Vec<u8>>>> = resolver.resolve(1).unwrap();
        assert!(part.is_none());
    }

    #[test]
    fn test_file_parts_end_of_sequence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.001");
        File::create(&path).unwrap().write_all(b"xyz").unwrap();

        let mut resolver = FileParts::new(
            move |index| (index == 1).then(|| path.clone()),
            1024,
        );
        assert_eq!(resolver.resolve(1).unwrap().unwrap().len(), 3);
        assert!(resolver.resolve(2).unwrap().is_none());
    }

    #[test]
    fn test_file_parts_open_failure_is_distinct() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("a.002");

        let mut resolver = FileParts::new(move |_| Some(missing.clone()), 1024);
        let err = resolver.resolve(1).unwrap_err();
        assert!(matches!(err, Error::PartOpen { index: 1, .. }));
        assert!(err.path().unwrap().ends_with("a.002"));
    }

    #[test]
    fn test_stream_parts() {
        let mut resolver = StreamParts::new(|index: usize| match index {
            1 => Ok(Some(Cursor::new(vec![1u8; 4]))),
            2 => Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            _ => Ok(None),
        });

        assert_eq!(resolver.resolve(1).unwrap().unwrap().len(), 4);
        let err = resolver.resolve(2).unwrap_err();
        assert_eq!(err.part_index(), Some(2));
        assert_eq!(err.io_kind(), io::ErrorKind::PermissionDenied);
        assert!(resolver.resolve(3).unwrap().is_none());
    }
}
