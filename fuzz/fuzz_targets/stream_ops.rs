//! Fuzz target driving random reads and seeks over a multi-part stream.
//!
//! The input is split into a part layout and an operation script. Every
//! read is checked against the plain concatenation of the parts, so the
//! fuzzer finds wrong bytes as well as panics.
//!
//! Run with: cargo +nightly fuzz run stream_ops

#![no_main]

use libfuzzer_sys::fuzz_target;
use partstream::{AddressingMode, SeekPastEnd, SourceOptions, SourceStream};
use std::io::{Cursor, Read, Seek, SeekFrom};

fuzz_target!(|data: &[u8]| {
    let Some((&header, rest)) = data.split_first() else {
        return;
    };

    // Low bits: part count; high bits: mode and seek policy
    let part_count = (header & 0x07) as usize + 1;
    if rest.len() < part_count {
        return;
    }
    let (sizes, script) = rest.split_at(part_count);

    let mut offset = 0usize;
    let chunks: Vec<Vec<u8>> = sizes
        .iter()
        .map(|&size| {
            let chunk = (offset..offset + size as usize).map(|i| i as u8).collect();
            offset += size as usize;
            chunk
        })
        .collect();
    let joined = chunks.concat();

    let mode = if header & 0x08 != 0 {
        AddressingMode::Volumes
    } else {
        AddressingMode::Concatenated
    };
    let policy = if header & 0x10 != 0 {
        SeekPastEnd::Allow
    } else {
        SeekPastEnd::Error
    };
    let options = SourceOptions::new().mode(mode).seek_past_end(policy);

    let mut iter = chunks.clone().into_iter();
    let first = iter.next().unwrap_or_default();
    let others: Vec<Vec<u8>> = iter.collect();
    let Ok(mut stream) = SourceStream::from_streams(
        Cursor::new(first),
        move |index| Ok(others.get(index - 1).cloned().map(Cursor::new)),
        options,
    ) else {
        return;
    };

    let mut buf = [0u8; 256];
    for op in script.chunks(2) {
        let (kind, arg) = (op[0], op.get(1).copied().unwrap_or(0));
        match kind % 5 {
            0 => {
                let want = arg as usize;
                let before = stream.position();
                if let Ok(n) = stream.read(&mut buf[..want]) {
                    if n > 0 && mode == AddressingMode::Concatenated {
                        let start = before as usize;
                        assert_eq!(&buf[..n], &joined[start..start + n]);
                    }
                }
            }
            1 => {
                let _ = stream.seek(SeekFrom::Start(arg as u64 * 3));
            }
            2 => {
                let _ = stream.seek(SeekFrom::Current(arg as i8 as i64));
            }
            3 => {
                let _ = stream.seek(SeekFrom::End(-(arg as i64 % 64)));
            }
            _ => {
                let _ = stream.set_current(arg as usize % 10);
            }
        }
        assert!(stream.current_part() < stream.part_count());
    }

    let _ = stream.load_all_parts();
    if mode == AddressingMode::Concatenated {
        assert_eq!(stream.len(), joined.len() as u64);
    }
    stream.close();
});
