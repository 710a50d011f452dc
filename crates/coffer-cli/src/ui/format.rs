//! String formatting utilities for UI rendering.

use chrono::{DateTime, Utc};

/// Format an optional timestamp; legacy backups have none.
pub fn format_datetime(dt: Option<&DateTime<Utc>>, pretty: bool) -> String {
    match dt {
        Some(dt) if pretty => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        Some(dt) => dt.to_rfc3339(),
        None => "-".to_string(),
    }
}

/// Format bytes as human-readable size.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format an optional size, raw bytes in plain mode.
pub fn format_size(bytes: Option<u64>, pretty: bool) -> String {
    match bytes {
        Some(b) if pretty => format_bytes(b),
        Some(b) => b.to_string(),
        None => "-".to_string(),
    }
}
