use log::debug;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::models::config::AppConfig;
use crate::models::stats::StatsSnapshot;
use crate::models::status::DumpMode;
use crate::prefs::PreferenceStore;

/// Queries the status view makes against the capture engine
pub trait CaptureEngine: Send + Sync {
    /// Bytes sent plus received in the current session
    fn total_bytes(&self) -> u64;

    /// Dump mode the engine will use for the next session
    fn dump_mode(&self) -> DumpMode;

    fn http_server_port(&self) -> u16;

    fn collector_address(&self) -> String;

    fn collector_port(&self) -> u16;

    /// Name of the pcap file being written, if known
    fn pcap_file_name(&self) -> Option<String>;
}

/// Engine view built from configuration and the statistics the engine reports
pub struct EngineHandle {
    config: AppConfig,
    prefs: Arc<dyn PreferenceStore>,
    total_bytes: AtomicU64,
    pcap_file: RwLock<Option<String>>,
}

impl EngineHandle {
    pub fn new(config: AppConfig, prefs: Arc<dyn PreferenceStore>) -> Self {
        let pcap_file = config.pcap_file.clone();

        Self {
            config,
            prefs,
            total_bytes: AtomicU64::new(0),
            pcap_file: RwLock::new(pcap_file),
        }
    }

    /// Record the counters of the latest statistics snapshot
    pub fn record_stats(&self, stats: &StatsSnapshot) {
        self.total_bytes.store(stats.total_bytes(), Ordering::SeqCst);
    }

    /// Forget the previous session's counters
    pub fn reset_counters(&self) {
        debug!("Resetting engine byte counters");
        self.total_bytes.store(0, Ordering::SeqCst);
    }

    /// Set the pcap output file announced by the engine
    pub fn set_pcap_file(&self, name: Option<String>) {
        *self.pcap_file.write() = name;
    }
}

impl CaptureEngine for EngineHandle {
    fn total_bytes(&self) -> u64 {
        self.total_bytes.load(Ordering::SeqCst)
    }

    fn dump_mode(&self) -> DumpMode {
        self.prefs.dump_mode()
    }

    fn http_server_port(&self) -> u16 {
        self.config.http_server_port
    }

    fn collector_address(&self) -> String {
        self.config.collector_address.clone()
    }

    fn collector_port(&self) -> u16 {
        self.config.collector_port
    }

    fn pcap_file_name(&self) -> Option<String> {
        self.pcap_file.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefs;

    #[test]
    fn test_engine_handle_tracks_latest_snapshot() {
        let engine = EngineHandle::new(AppConfig::default(), Arc::new(MemoryPrefs::new()));
        assert_eq!(engine.total_bytes(), 0);

        engine.record_stats(&StatsSnapshot {
            bytes_sent: 100,
            bytes_received: 400,
            ..Default::default()
        });
        assert_eq!(engine.total_bytes(), 500);

        engine.reset_counters();
        assert_eq!(engine.total_bytes(), 0);
    }

    #[test]
    fn test_engine_handle_reads_dump_mode_from_prefs() {
        let prefs = Arc::new(MemoryPrefs::new());
        let engine = EngineHandle::new(AppConfig::default(), prefs.clone());
        assert_eq!(engine.dump_mode(), DumpMode::HttpServer);

        prefs.set_dump_mode(DumpMode::None).unwrap();
        assert_eq!(engine.dump_mode(), DumpMode::None);
    }

    #[test]
    fn test_engine_handle_pcap_file() {
        let config = AppConfig {
            pcap_file: Some("capture.pcap".to_string()),
            ..AppConfig::default()
        };
        let engine = EngineHandle::new(config, Arc::new(MemoryPrefs::new()));
        assert_eq!(engine.pcap_file_name().as_deref(), Some("capture.pcap"));

        engine.set_pcap_file(None);
        assert_eq!(engine.pcap_file_name(), None);
    }
}
