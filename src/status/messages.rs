//! User-facing strings of the status panel.

use std::fmt::Display;

pub const READY: &str = "Ready";
pub const NO_DUMP_INFO: &str = "Packets are not being dumped";
pub const PCAP_FILE_INFO: &str = "Packets are being written to a PCAP file";
pub const NO_APP_FILTER: &str = "No app filter";
pub const APPS_LOADING: &str = "Loading apps, please wait";

/// Where the HTTP dump server can be reached
pub fn http_server_status(address: impl Display, port: u16) -> String {
    format!("HTTP server running at http://{}:{}", address, port)
}

/// Where the UDP exporter sends packets
pub fn collector_info(address: &str, port: u16) -> String {
    format!("Sending packets to {}:{}", address, port)
}
