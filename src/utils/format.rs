//! Human-readable rendering of capture counters and durations.
//!
//! Every threshold comparison is strict, so a value sitting exactly on a
//! boundary (1024, 1_048_576, 1000, ...) is shown in the larger unit.

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

const KILO: u64 = 1000;
const MEGA: u64 = KILO * 1000;
const GIGA: u64 = MEGA * 1000;

/// Format a byte count with binary divisors
///
/// ```text
/// 500       -> "500 B"
/// 1536      -> "1.5 KB"
/// 1_048_576 -> "1.0 MB"
/// ```
pub fn format_bytes(bytes: u64) -> String {
    if bytes < KB {
        return format!("{} B", bytes);
    }

    let (divisor, suffix) = if bytes < MB {
        (KB, "KB")
    } else if bytes < GB {
        (MB, "MB")
    } else {
        (GB, "GB")
    };

    format!("{:.1} {}", bytes as f64 / divisor as f64, suffix)
}

/// Format a packet count with decimal divisors, bare integer below 1000
pub fn format_packets(packets: u64) -> String {
    if packets < KILO {
        return packets.to_string();
    }

    let (divisor, suffix) = if packets < MEGA {
        (KILO, "K")
    } else if packets < GIGA {
        (MEGA, "M")
    } else {
        (GIGA, "G")
    };

    format!("{:.1} {}", packets as f64 / divisor as f64, suffix)
}

/// Format an elapsed time as an approximate lower bound
///
/// Minutes and hours are floored and prefixed with `"> "`.
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        "< 1 s".to_string()
    } else if seconds < 60 {
        format!("{} s", seconds)
    } else if seconds < 3600 {
        format!("> {} m", seconds / 60)
    } else {
        format!("> {} h", seconds / 3600)
    }
}
