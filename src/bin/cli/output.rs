//! Output formatting for CLI operations.

use serde_json::json;
use partstream::PartInfo;

/// Summary of a split set, produced by the `info` command.
pub struct SetInfo {
    pub parts: Vec<PartInfo>,
    pub total_size: u64,
}

/// Result of copying bytes out of the joined stream.
pub struct CopyResult {
    pub bytes_copied: u64,
    pub start_offset: u64,
    pub parts_opened: usize,
    pub destination: String,
}

/// Result of the `checksum` command.
pub struct ChecksumResult {
    pub crc32: u32,
    pub bytes: u64,
    pub part_count: usize,
}

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats a split set summary
    fn format_info(&self, info: &SetInfo) -> String;

    /// Formats a copy result
    fn format_copy_result(&self, result: &CopyResult) -> String;

    /// Formats a checksum result
    fn format_checksum(&self, result: &ChecksumResult) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_info(&self, info: &SetInfo) -> String {
        let mut output = String::new();

        output.push_str(&format!("{:>6} {:>12} {:>14} {}\n", "Part", "Size", "Offset", "Path"));
        output.push_str(&"-".repeat(70));
        output.push('\n');

        let mut offset = 0u64;
        for part in &info.parts {
            let path = part
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "{:>6} {:>12} {:>14} {}\n",
                part.index,
                humanize_bytes(part.len),
                offset,
                path
            ));
            offset += part.len;
        }

        output.push_str(&"-".repeat(70));
        output.push('\n');
        output.push_str(&format!(
            "{} parts, {} total ({} bytes)\n",
            info.parts.len(),
            humanize_bytes(info.total_size),
            info.total_size
        ));

        output
    }

    fn format_copy_result(&self, result: &CopyResult) -> String {
        format!(
            "Copied {} from offset {} to {} ({} parts opened)\n",
            humanize_bytes(result.bytes_copied),
            result.start_offset,
            result.destination,
            result.parts_opened
        )
    }

    fn format_checksum(&self, result: &ChecksumResult) -> String {
        format!(
            "CRC32: {:08X} ({} over {} parts)\n",
            result.crc32,
            humanize_bytes(result.bytes),
            result.part_count
        )
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_info(&self, info: &SetInfo) -> String {
        let parts: Vec<_> = info
            .parts
            .iter()
            .map(|p| {
                json!({
                    "index": p.index,
                    "size": p.len,
                    "path": p.path.as_ref().map(|path| path.display().to_string()),
                })
            })
            .collect();
        let obj = json!({
            "part_count": info.parts.len(),
            "total_size": info.total_size,
            "parts": parts,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_copy_result(&self, result: &CopyResult) -> String {
        let obj = json!({
            "bytes_copied": result.bytes_copied,
            "start_offset": result.start_offset,
            "parts_opened": result.parts_opened,
            "destination": result.destination,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_checksum(&self, result: &ChecksumResult) -> String {
        let obj = json!({
            "crc32": format!("{:08X}", result.crc32),
            "bytes": result.bytes,
            "part_count": result.part_count,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Converts bytes to a human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
