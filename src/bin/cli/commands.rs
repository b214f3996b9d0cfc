//! Command implementations for the CLI tool.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use partstream::{AddressingMode, Error, NumberedParts, SourceOptions, SourceStream};

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::{ChecksumResult, CopyResult, SetInfo, create_formatter};
use crate::progress::SimpleProgress;

/// Chunk size for copy and checksum passes.
const COPY_BUFFER_SIZE: usize = 64 * 1024;

type FileStream = SourceStream<BufReader<File>>;

/// Configuration for the cat command.
pub struct CatConfig<'a> {
    pub first: &'a Path,
    pub output: Option<&'a Path>,
    pub offset: u64,
    pub length: Option<u64>,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Info command implementation
pub fn info(first: &Path, format: OutputFormat) -> ExitCode {
    let formatter = create_formatter(format);

    let mut stream = match open_set(first, SourceOptions::default()) {
        Ok(s) => s,
        Err(code) => return code,
    };
    if let Err(e) = stream.load_all_parts() {
        eprintln!("Error: {}", e);
        return error_to_exit_code(&e);
    }

    let info = SetInfo {
        parts: stream.parts(),
        total_size: stream.len(),
    };
    print!("{}", formatter.format_info(&info));
    ExitCode::Success
}

/// Cat command implementation
pub fn cat(config: &CatConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);

    let mut stream = match open_set(config.first, SourceOptions::default()) {
        Ok(s) => s,
        Err(code) => return code,
    };
    if let Err(e) = stream.load_all_parts() {
        eprintln!("Error: {}", e);
        return error_to_exit_code(&e);
    }

    if let Err(e) = stream.set_position(config.offset) {
        eprintln!("Error: {}", e);
        return error_to_exit_code(&e);
    }

    let available = stream.len() - config.offset;
    let length = config.length.map_or(available, |n| n.min(available));

    let (mut writer, destination) = match open_output(config.output) {
        Ok(w) => w,
        Err(code) => return code,
    };

    // Keep the summary off stdout when the payload goes there
    let report = config.output.is_some() || config.format == OutputFormat::Json;
    let progress = SimpleProgress::new(length, config.quiet || config.output.is_none());

    let copied = match copy_range(&mut stream, &mut writer, length, &progress) {
        Ok(n) => n,
        Err(code) => return code,
    };
    progress.finish();

    if let Err(e) = writer.flush() {
        eprintln!("Error writing output: {}", e);
        return ExitCode::IoError;
    }

    if report {
        let result = CopyResult {
            bytes_copied: copied,
            start_offset: config.offset,
            parts_opened: stream.part_count(),
            destination,
        };
        report_result(&formatter.format_copy_result(&result), config.output.is_none());
    }
    ExitCode::Success
}

/// Checksum command implementation
pub fn checksum(first: &Path, format: OutputFormat, quiet: bool) -> ExitCode {
    let formatter = create_formatter(format);

    let mut stream = match open_set(first, SourceOptions::default()) {
        Ok(s) => s,
        Err(code) => return code,
    };
    if let Err(e) = stream.load_all_parts() {
        eprintln!("Error: {}", e);
        return error_to_exit_code(&e);
    }

    let total = stream.len();
    let progress = SimpleProgress::new(total, quiet);
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut bytes = 0u64;

    loop {
        let n = match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => return report_io_error(&e),
        };
        hasher.update(&buf[..n]);
        bytes += n as u64;
        progress.inc(n as u64);
        progress.set_message(format!("part {}", stream.current_part()));
    }
    progress.finish();

    let result = ChecksumResult {
        crc32: hasher.finalize(),
        bytes,
        part_count: stream.part_count(),
    };
    print!("{}", formatter.format_checksum(&result));
    ExitCode::Success
}

/// Volume command implementation
pub fn volume(
    first: &Path,
    part: usize,
    output: Option<&Path>,
    format: OutputFormat,
    quiet: bool,
) -> ExitCode {
    let formatter = create_formatter(format);
    let options = SourceOptions::new().mode(AddressingMode::Volumes);

    let mut stream = match open_set(first, options) {
        Ok(s) => s,
        Err(code) => return code,
    };
    if let Err(e) = stream.select(part) {
        eprintln!("Error: {}", e);
        return error_to_exit_code(&e);
    }

    let length = stream.len();
    let (mut writer, destination) = match open_output(output) {
        Ok(w) => w,
        Err(code) => return code,
    };

    let progress = SimpleProgress::new(length, quiet || output.is_none());
    let copied = match copy_range(&mut stream, &mut writer, length, &progress) {
        Ok(n) => n,
        Err(code) => return code,
    };
    progress.finish();

    if let Err(e) = writer.flush() {
        eprintln!("Error writing output: {}", e);
        return ExitCode::IoError;
    }

    if output.is_some() || format == OutputFormat::Json {
        let result = CopyResult {
            bytes_copied: copied,
            start_offset: 0,
            parts_opened: stream.part_count(),
            destination,
        };
        report_result(&formatter.format_copy_result(&result), output.is_none());
    }
    ExitCode::Success
}

/// Opens a split set from its first part.
///
/// Paths with a numeric extension are treated as numbered parts; anything
/// else is read as a single-part set.
pub(crate) fn open_set(first: &Path, options: SourceOptions) -> Result<FileStream, ExitCode> {
    let opened = match NumberedParts::detect(first) {
        Ok(_) => SourceStream::open_numbered_with(first, options),
        Err(Error::InvalidPartName { .. }) => SourceStream::from_files(first, |_| None, options),
        Err(e) => Err(e),
    };

    opened.map_err(|e| {
        eprintln!("Error opening {}: {}", first.display(), e);
        error_to_exit_code(&e)
    })
}

/// Copies up to `length` bytes from the current position of `stream`.
fn copy_range(
    stream: &mut FileStream,
    writer: &mut dyn Write,
    length: u64,
    progress: &SimpleProgress,
) -> Result<u64, ExitCode> {
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut copied = 0u64;

    while copied < length {
        let want = (length - copied).min(buf.len() as u64) as usize;
        let n = match stream.read(&mut buf[..want]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => return Err(report_io_error(&e)),
        };
        if let Err(e) = writer.write_all(&buf[..n]) {
            eprintln!("Error writing output: {}", e);
            return Err(ExitCode::IoError);
        }
        copied += n as u64;
        progress.inc(n as u64);
        progress.set_message(format!("part {}", stream.current_part()));
    }

    Ok(copied)
}

fn open_output(path: Option<&Path>) -> Result<(Box<dyn Write>, String), ExitCode> {
    match path {
        Some(path) => match File::create(path) {
            Ok(file) => Ok((
                Box::new(BufWriter::new(file)),
                path.display().to_string(),
            )),
            Err(e) => {
                eprintln!("Error creating {}: {}", path.display(), e);
                Err(ExitCode::IoError)
            }
        },
        None => Ok((Box::new(BufWriter::new(io::stdout().lock())), "stdout".to_string())),
    }
}

/// Prints a result summary, moving it to stderr when stdout carries data.
fn report_result(text: &str, stdout_is_payload: bool) {
    if stdout_is_payload {
        eprint!("{}", text);
    } else {
        print!("{}", text);
    }
}

fn report_io_error(e: &io::Error) -> ExitCode {
    eprintln!("Error reading: {}", e);
    match Error::from_io(e) {
        Some(inner) => error_to_exit_code(inner),
        None => ExitCode::IoError,
    }
}
