//! Numbered split-file naming.
//!
//! Split files commonly share a base name and carry a zero-padded part
//! number as their last extension:
//! - `backup.tar.001` - First part
//! - `backup.tar.002` - Second part
//! - `backup.tar.003` - Third part
//! - etc.
//!
//! [`NumberedParts`] derives the sibling paths from any one of them and can
//! serve as the path function of a file-mode [`SourceStream`](crate::SourceStream).

use std::io;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Naming scheme for numbered split files.
///
/// # Example
///
/// ```rust
/// use partstream::NumberedParts;
/// use std::path::PathBuf;
///
/// let naming = NumberedParts::detect("data/backup.tar.001").unwrap();
/// assert_eq!(naming.path_for(0), Some(PathBuf::from("data/backup.tar.001")));
/// assert_eq!(naming.path_for(9), Some(PathBuf::from("data/backup.tar.010")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedParts {
    /// Path of the part the scheme was detected from.
    base: PathBuf,
    /// Number carried by part 0.
    first: u64,
    /// Minimum digit count of the part number.
    width: usize,
}

impl NumberedParts {
    /// Derives the naming scheme from the path of the first part.
    ///
    /// The last extension must consist of ASCII digits only. The number it
    /// carries becomes part 0, and its digit count becomes the padding width.
    /// The rest of the path is kept as-is, so non-UTF-8 names are supported.
    pub fn detect(first_part: impl AsRef<Path>) -> Result<Self> {
        let base = first_part.as_ref();
        let invalid = || Error::InvalidPartName {
            path: base.to_string_lossy().to_string(),
        };

        let digits = base
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(invalid)?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let first = digits.parse::<u64>().map_err(|_| invalid())?;

        Ok(Self {
            base: base.to_path_buf(),
            first,
            width: digits.len(),
        })
    }

    /// Returns the path of the part at the 0-based `index`.
    ///
    /// Returns `None` when the part number would not fit in a `u64`.
    pub fn path_for(&self, index: usize) -> Option<PathBuf> {
        let number = self.first.checked_add(u64::try_from(index).ok()?)?;
        Some(
            self.base
                .with_extension(format!("{:0width$}", number, width = self.width)),
        )
    }

    /// Returns the path of the part at `index` if it can exist on disk.
    ///
    /// A missing file ends the sequence, as does running out of part
    /// numbers. Any other metadata failure still yields the path so that
    /// opening it reports the real error.
    pub fn existing_path(&self, index: usize) -> Option<PathBuf> {
        let path = self.path_for(index)?;
        match std::fs::metadata(&path) {
            Ok(_) => Some(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(_) => Some(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_detect_three_digit() {
        let naming = NumberedParts::detect("archive.7z.001").unwrap();
        assert_eq!(naming.path_for(0), Some(PathBuf::from("archive.7z.001")));
        assert_eq!(naming.path_for(1), Some(PathBuf::from("archive.7z.002")));
        assert_eq!(naming.path_for(99), Some(PathBuf::from("archive.7z.100")));
        assert_eq!(naming.path_for(999), Some(PathBuf::from("archive.7z.1000")));
    }

    #[test]
    fn test_detect_keeps_starting_number() {
        let naming = NumberedParts::detect("/path/to/disk.img.0").unwrap();
        assert_eq!(naming.path_for(0), Some(PathBuf::from("/path/to/disk.img.0")));
        assert_eq!(naming.path_for(12), Some(PathBuf::from("/path/to/disk.img.12")));

        let naming = NumberedParts::detect("movie.mkv.05").unwrap();
        assert_eq!(naming.path_for(0), Some(PathBuf::from("movie.mkv.05")));
        assert_eq!(naming.path_for(5), Some(PathBuf::from("movie.mkv.10")));
    }

    #[test]
    fn test_detect_rejects_unnumbered() {
        for name in ["archive.7z", "noextension", "archive.7z.", "file.0a1"] {
            let err = NumberedParts::detect(name).unwrap_err();
            assert!(
                matches!(err, Error::InvalidPartName { .. }),
                "expected InvalidPartName for {}",
                name
            );
        }
    }

    #[test]
    fn test_existing_path() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("split.bin.001");
        File::create(&first).unwrap();
        File::create(dir.path().join("split.bin.002")).unwrap();

        let naming = NumberedParts::detect(&first).unwrap();
        assert_eq!(naming.existing_path(0), Some(first.clone()));
        assert!(naming.existing_path(1).is_some());
        assert_eq!(naming.existing_path(2), None);
    }

    #[test]
    fn test_number_overflow_ends_sequence() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join(format!("edge.bin.{}", u64::MAX - 1));
        File::create(&first).unwrap();

        let naming = NumberedParts::detect(&first).unwrap();
        assert_eq!(naming.path_for(0), Some(first.clone()));
        assert!(naming.path_for(1).is_some());
        assert_eq!(naming.path_for(2), None);
        assert_eq!(naming.existing_path(2), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_base_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let first = dir.path().join(OsStr::from_bytes(b"d\xffta.bin.001"));
        let second = dir.path().join(OsStr::from_bytes(b"d\xffta.bin.002"));
        File::create(&first).unwrap();
        File::create(&second).unwrap();

        let naming = NumberedParts::detect(&first).unwrap();
        assert_eq!(naming.path_for(1), Some(second.clone()));
        assert_eq!(naming.existing_path(1), Some(second));
        assert_eq!(naming.existing_path(2), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_extension_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"data.bin.0\xff1"));
        let err = NumberedParts::detect(path).unwrap_err();
        assert!(matches!(err, Error::InvalidPartName { .. }));
    }
}
