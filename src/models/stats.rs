use serde::{Deserialize, Serialize};

use crate::utils::format::{format_bytes, format_duration, format_packets};

/// Counters pushed by the capture engine
///
/// Each snapshot replaces the previous one; counters are monotonic within a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Bytes sent by the device
    pub bytes_sent: u64,

    /// Bytes received by the device
    pub bytes_received: u64,

    /// Packets sent by the device
    pub packets_sent: u64,

    /// Packets received by the device
    pub packets_received: u64,
}

impl StatsSnapshot {
    pub fn total_bytes(&self) -> u64 {
        self.bytes_sent.saturating_add(self.bytes_received)
    }

    pub fn total_packets(&self) -> u64 {
        self.packets_sent.saturating_add(self.packets_received)
    }
}

/// Display-ready version of the latest snapshot
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StatsSummary {
    pub bytes_sent: String,
    pub bytes_received: String,
    pub total_bytes: String,
    pub packets_sent: String,
    pub packets_received: String,
    pub total_packets: String,

    /// Time since the capture entered the running state
    pub duration: String,
}

impl StatsSummary {
    /// Build a summary for a snapshot taken `elapsed_secs` into the session
    pub fn from_snapshot(stats: &StatsSnapshot, elapsed_secs: u64) -> Self {
        Self {
            bytes_sent: format_bytes(stats.bytes_sent),
            bytes_received: format_bytes(stats.bytes_received),
            total_bytes: format_bytes(stats.total_bytes()),
            packets_sent: format_packets(stats.packets_sent),
            packets_received: format_packets(stats.packets_received),
            total_packets: format_packets(stats.total_packets()),
            duration: format_duration(elapsed_secs),
        }
    }
}
