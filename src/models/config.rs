use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::path::PathBuf;

/// Address the capture engine assigns to its own tunnel interface
pub const DEFAULT_TUNNEL_ADDRESS: Ipv4Addr = Ipv4Addr::new(10, 215, 173, 1);

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the REST API server
    pub api_port: u16,

    /// Port the engine's HTTP dump server listens on
    pub http_server_port: u16,

    /// Collector receiving exported packets in UDP exporter mode
    pub collector_address: String,

    /// Collector UDP port
    pub collector_port: u16,

    /// Tunnel address excluded from address resolution
    pub tunnel_address: Ipv4Addr,

    /// Output file written in pcap file mode, when already known
    pub pcap_file: Option<String>,

    /// JSON preference file; preferences stay in memory when unset
    pub prefs_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: 3000,
            http_server_port: 8080,
            collector_address: "127.0.0.1".to_string(),
            collector_port: 1234,
            tunnel_address: DEFAULT_TUNNEL_ADDRESS,
            pcap_file: None,
            prefs_file: None,
        }
    }
}
