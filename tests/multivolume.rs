//! Split-file integration tests.
//!
//! These tests verify:
//! - Lazy discovery of numbered parts on disk (`.001`, `.002`, ...)
//! - Reads and seeks that cross part boundaries
//! - The difference between a short set and a part that cannot be opened
//! - Volume-mode addressing over file-backed parts

use std::io::{self, Read, Seek, SeekFrom};
use std::path::PathBuf;

use partstream::{AddressingMode, Error, NumberedParts, SeekPastEnd, SourceOptions, SourceStream};
use tempfile::tempdir;

mod common;

use common::write_split_set;

// ============================================================================
// Concatenated Mode
// ============================================================================

#[test]
fn test_three_parts_read_in_one_call() {
    let dir = tempdir().unwrap();
    let (paths, expected) = write_split_set(dir.path(), "data.bin", &[10, 10, 5]);

    let mut stream = SourceStream::open_numbered(&paths[0]).unwrap();
    assert_eq!(stream.part_count(), 1);
    assert_eq!(stream.len(), 10);

    let mut buf = [0u8; 25];
    assert_eq!(stream.read(&mut buf).unwrap(), 25);
    assert_eq!(&buf[..], &expected[..]);
    assert_eq!(stream.position(), 25);
    assert_eq!(stream.part_count(), 3);
    assert_eq!(stream.len(), 25);
}

#[test]
fn test_seek_into_second_part() {
    let dir = tempdir().unwrap();
    let (paths, expected) = write_split_set(dir.path(), "data.bin", &[10, 10, 5]);

    let mut stream = SourceStream::open_numbered(&paths[0]).unwrap();
    stream.seek(SeekFrom::Start(19)).unwrap();
    assert_eq!(stream.current_part(), 1);

    let mut byte = [0u8; 1];
    assert_eq!(stream.read(&mut byte).unwrap(), 1);
    assert_eq!(byte[0], expected[19]);
    assert_eq!(stream.position(), 20);
}

#[test]
fn test_seek_past_last_part_fails() {
    let dir = tempdir().unwrap();
    let (paths, _) = write_split_set(dir.path(), "data.bin", &[10, 10, 5]);

    let mut stream = SourceStream::open_numbered(&paths[0]).unwrap();
    let err = stream.seek_to(SeekFrom::Start(30)).unwrap_err();
    assert!(matches!(
        err,
        Error::SeekBeyondEnd {
            target: 30,
            length: 25
        }
    ));
    assert!(err.is_caller_error());
    assert_eq!(stream.position(), 0);
    assert_eq!(stream.part_count(), 3);
}

#[test]
fn test_seek_past_last_part_allowed() {
    let dir = tempdir().unwrap();
    let (paths, _) = write_split_set(dir.path(), "data.bin", &[10, 10, 5]);

    let options = SourceOptions::new().seek_past_end(SeekPastEnd::Allow);
    let mut stream = SourceStream::open_numbered_with(&paths[0], options).unwrap();
    assert_eq!(stream.seek(SeekFrom::Start(30)).unwrap(), 30);

    let mut buf = [0u8; 8];
    assert_eq!(stream.read(&mut buf).unwrap(), 0);
}

#[test]
fn test_read_to_end_matches_concatenation() {
    let dir = tempdir().unwrap();
    let (paths, expected) = write_split_set(dir.path(), "big.img", &[4096, 1, 0, 9000, 17]);

    let mut stream = SourceStream::open_numbered(&paths[0]).unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).unwrap();
    assert_eq!(out, expected);
    assert_eq!(stream.part_count(), 5);
}

#[test]
fn test_small_buffer_capacity() {
    let dir = tempdir().unwrap();
    let (paths, expected) = write_split_set(dir.path(), "data.bin", &[7, 3, 11]);

    let options = SourceOptions::new().buffer_capacity(2);
    let mut stream = SourceStream::open_numbered_with(&paths[0], options).unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).unwrap();
    assert_eq!(out, expected);
}

#[test]
fn test_load_all_parts_reports_total() {
    let dir = tempdir().unwrap();
    let (paths, _) = write_split_set(dir.path(), "data.bin", &[10, 10, 5]);

    let mut stream = SourceStream::open_numbered(&paths[0]).unwrap();
    stream.load_all_parts().unwrap();
    assert_eq!(stream.len(), 25);
    assert_eq!(stream.position(), 0);

    let listed: Vec<PathBuf> = stream.paths().map(|p| p.to_path_buf()).collect();
    assert_eq!(listed, paths);

    let parts = stream.parts();
    assert_eq!(parts.iter().map(|p| p.len).collect::<Vec<_>>(), [10, 10, 5]);
    assert_eq!(parts[2].path.as_deref(), Some(paths[2].as_path()));
}

// ============================================================================
// Discovery and Failures
// ============================================================================

#[test]
fn test_gap_in_numbering_ends_sequence() {
    let dir = tempdir().unwrap();
    let (paths, expected) = write_split_set(dir.path(), "data.bin", &[5, 5, 5]);
    std::fs::rename(&paths[2], dir.path().join("data.bin.004")).unwrap();

    let mut stream = SourceStream::open_numbered(&paths[0]).unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).unwrap();
    assert_eq!(out, &expected[..10]);
    assert_eq!(stream.part_count(), 2);
}

#[test]
fn test_missing_part_is_not_an_open_failure() {
    let dir = tempdir().unwrap();
    let (paths, _) = write_split_set(dir.path(), "data.bin", &[5, 5]);

    let mut stream = SourceStream::open_numbered(&paths[0]).unwrap();
    assert!(!stream.set_current(3).unwrap());
    assert_eq!(stream.current_part(), 1);

    let err = stream.select(3).unwrap_err();
    assert!(matches!(err, Error::PartUnavailable { index: 3 }));
    assert_eq!(err.part_index(), Some(3));
}

#[test]
fn test_unopenable_part_reports_part_open() {
    let dir = tempdir().unwrap();
    let (paths, _) = write_split_set(dir.path(), "data.bin", &[5]);
    let ghost = dir.path().join("does-not-exist.bin");

    let next = ghost.clone();
    let mut stream = SourceStream::from_files(
        &paths[0],
        move |index| (index == 1).then(|| next.clone()),
        SourceOptions::default(),
    )
    .unwrap();

    let mut buf = [0u8; 16];
    assert_eq!(stream.read(&mut buf).unwrap(), 5);
    let err = stream.read(&mut buf).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
    match Error::from_io(&err) {
        Some(Error::PartOpen { index, path, .. }) => {
            assert_eq!(*index, 1);
            assert_eq!(path, &ghost.to_string_lossy().to_string());
        }
        other => panic!("Expected PartOpen, got {:?}", other),
    }
    assert_eq!(stream.part_count(), 1);
}

#[test]
fn test_missing_first_part() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("absent.bin.001");

    let err = SourceStream::open_numbered(&first).unwrap_err();
    assert!(matches!(err, Error::PartOpen { index: 0, .. }));
    assert!(!err.is_caller_error());
}

#[test]
fn test_non_numeric_extension_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.bin");
    std::fs::write(&path, b"abc").unwrap();

    let err = SourceStream::open_numbered(&path).unwrap_err();
    assert!(matches!(err, Error::InvalidPartName { .. }));
    assert_eq!(
        err.path().map(str::to_string),
        Some(path.to_string_lossy().to_string())
    );
}

#[test]
fn test_numbering_starting_above_one() {
    let dir = tempdir().unwrap();
    let (paths, expected) = write_split_set(dir.path(), "data.bin", &[3, 4, 5]);

    let mut stream = SourceStream::open_numbered(&paths[1]).unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).unwrap();
    assert_eq!(out, &expected[3..]);
    assert_eq!(stream.part_count(), 2);
}

#[test]
fn test_custom_naming_scheme() {
    let dir = tempdir().unwrap();
    let chunks = common::chunked(&[6, 6]);
    let paths: Vec<PathBuf> = ["chunk-a.dat", "chunk-b.dat"]
        .iter()
        .zip(&chunks)
        .map(|(name, data)| {
            let path = dir.path().join(name);
            std::fs::write(&path, data).unwrap();
            path
        })
        .collect();

    let rest = paths.clone();
    let mut stream = SourceStream::from_files(
        &paths[0],
        move |index| rest.get(index).cloned(),
        SourceOptions::default(),
    )
    .unwrap();

    assert_eq!(stream.len(), 6);
    stream.seek(SeekFrom::Start(8)).unwrap();
    assert_eq!(stream.paths().count(), 2);
    let mut buf = [0u8; 4];
    stream.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, &chunks[1][2..]);
}

#[cfg(unix)]
#[test]
fn test_non_utf8_split_set_reads_every_part() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    let first = dir.path().join(OsStr::from_bytes(b"d\xffta.bin.001"));
    std::fs::write(&first, b"abc").unwrap();
    std::fs::write(dir.path().join(OsStr::from_bytes(b"d\xffta.bin.002")), b"def").unwrap();

    let mut stream = SourceStream::open_numbered(&first).unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"abcdef");
    assert_eq!(stream.part_count(), 2);
}

#[test]
fn test_naming_round_trips_width() {
    let naming = NumberedParts::detect("set/archive.7z.0001").unwrap();
    assert_eq!(naming.path_for(0), Some(PathBuf::from("set/archive.7z.0001")));
    assert_eq!(naming.path_for(41), Some(PathBuf::from("set/archive.7z.0042")));
}

// ============================================================================
// Volume Mode
// ============================================================================

#[test]
fn test_volume_mode_over_files() {
    let dir = tempdir().unwrap();
    let (paths, expected) = write_split_set(dir.path(), "data.bin", &[10, 10, 5]);

    let options = SourceOptions::new().mode(AddressingMode::Volumes);
    let mut stream = SourceStream::open_numbered_with(&paths[0], options).unwrap();

    let mut buf = [0u8; 32];
    assert_eq!(stream.read(&mut buf).unwrap(), 10);
    assert_eq!(&buf[..10], &expected[..10]);
    assert_eq!(stream.read(&mut buf).unwrap(), 0);
    assert_eq!(stream.part_count(), 1);

    stream.select(2).unwrap();
    assert_eq!(stream.len(), 5);
    assert_eq!(stream.position(), 0);
    assert_eq!(stream.read(&mut buf).unwrap(), 5);
    assert_eq!(&buf[..5], &expected[20..]);

    stream.select(1).unwrap();
    stream.seek(SeekFrom::End(-3)).unwrap();
    assert_eq!(stream.read(&mut buf).unwrap(), 3);
    assert_eq!(&buf[..3], &expected[17..20]);
}

#[test]
fn test_close_releases_files() {
    let dir = tempdir().unwrap();
    let (paths, _) = write_split_set(dir.path(), "data.bin", &[4, 4]);

    let options = SourceOptions::new().leave_stream_open(true);
    let mut stream = SourceStream::open_numbered_with(&paths[0], options).unwrap();
    stream.load_all_parts().unwrap();

    assert!(stream.close().is_empty());
    assert!(stream.is_closed());
    assert_eq!(stream.part_count(), 0);

    let mut buf = [0u8; 1];
    let err = stream.read(&mut buf).unwrap_err();
    assert!(matches!(Error::from_io(&err), Some(Error::Closed)));
}
