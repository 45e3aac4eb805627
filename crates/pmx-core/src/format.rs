//! Formatting helpers for document output

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Convert a byte count to a human-readable size ("32.00 GB").
pub fn format_bytes(bytes: Option<u64>) -> String {
    let Some(bytes) = bytes else {
        return "N/A".to_string();
    };

    let mut value = bytes as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if value < 1024.0 {
            return format!("{value:.2} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.2} PB")
}

/// Convert a megabyte count to a human-readable size ("4.00 GB").
pub fn format_memory_mb(mb: Option<u64>) -> String {
    let Some(mb) = mb else {
        return "N/A".to_string();
    };

    if mb < 1024 {
        format!("{mb} MB")
    } else {
        format!("{:.2} GB", mb as f64 / 1024.0)
    }
}

/// Sanitize a resource name for use as a file or directory name.
pub fn sanitize_filename(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Current UTC time as an RFC 3339 string, for `generated` front matter.
pub fn utc_timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_walk_up_units() {
        assert_eq!(format_bytes(None), "N/A");
        assert_eq!(format_bytes(Some(512)), "512.00 B");
        assert_eq!(format_bytes(Some(2048)), "2.00 KB");
        assert_eq!(format_bytes(Some(34_359_738_368)), "32.00 GB");
    }

    #[test]
    fn memory_switches_to_gb() {
        assert_eq!(format_memory_mb(None), "N/A");
        assert_eq!(format_memory_mb(Some(512)), "512 MB");
        assert_eq!(format_memory_mb(Some(4096)), "4.00 GB");
    }

    #[test]
    fn filenames_are_safe() {
        assert_eq!(sanitize_filename("Web Server 01"), "web-server-01");
        assert_eq!(sanitize_filename("db/primary!"), "dbprimary");
        assert_eq!(sanitize_filename("pve-node_1"), "pve-node_1");
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let ts = utc_timestamp();
        assert!(ts.contains('T'));
        assert!(ts.ends_with('Z') || ts.contains('+'));
    }
}
