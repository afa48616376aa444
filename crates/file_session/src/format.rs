//! Display formatting for sizes and ingestion dates.

use chrono::DateTime;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Formats a byte count with a 1024 base and at most two decimals (`1.5 KB`, `0 Bytes`).
///
/// Sizes beyond the largest unit stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < SIZE_UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", SIZE_UNITS[unit])
}

/// Formats a unix-millisecond timestamp as `MMM dd, yyyy` in UTC.
pub fn format_upload_date(unix_ms: u64) -> String {
    i64::try_from(unix_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|date| date.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "Unknown date".to_string())
}
