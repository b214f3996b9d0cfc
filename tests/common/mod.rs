//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};

use partstream::{SourceOptions, SourceStream};

/// Returns `len` bytes whose values encode their logical offset.
///
/// Byte `i` of the result is `(start + i) % 251`, so any byte read back from
/// a joined stream can be checked against its expected position.
pub fn pattern(start: usize, len: usize) -> Vec<u8> {
    (start..start + len).map(|i| (i % 251) as u8).collect()
}

/// Splits the pattern of `sizes.iter().sum()` bytes into consecutive chunks.
pub fn chunked(sizes: &[usize]) -> Vec<Vec<u8>> {
    let mut offset = 0;
    sizes
        .iter()
        .map(|&size| {
            let chunk = pattern(offset, size);
            offset += size;
            chunk
        })
        .collect()
}

/// Writes numbered split files `base.001`, `base.002`, ... into `dir`.
///
/// Returns the part paths and the full logical contents.
pub fn write_split_set(dir: &Path, base: &str, sizes: &[usize]) -> (Vec<PathBuf>, Vec<u8>) {
    let chunks = chunked(sizes);
    let paths: Vec<PathBuf> = chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let path = dir.join(format!("{}.{:03}", base, i + 1));
            std::fs::write(&path, chunk).expect("Failed to write part");
            path
        })
        .collect();
    (paths, chunks.concat())
}

/// Opens an in-memory stream-mode source over `chunks`.
pub fn memory_stream(
    chunks: Vec<Vec<u8>>,
    options: SourceOptions,
) -> SourceStream<Cursor<Vec<u8>>> {
    let mut iter = chunks.into_iter();
    let first = iter.next().unwrap_or_default();
    let rest: Vec<Vec<u8>> = iter.collect();
    SourceStream::from_streams(
        Cursor::new(first),
        move |index| Ok(rest.get(index - 1).cloned().map(Cursor::new)),
        options,
    )
    .expect("Failed to open memory stream")
}
