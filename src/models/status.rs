use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::app::AppIcon;
use crate::utils::error::AppError;

/// Lifecycle state pushed by the capture engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    Ready,
    Running,
    /// Stopping, starting or any other state the status view has no layout for
    #[serde(other)]
    Stopped,
}

/// Output sink for captured traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DumpMode {
    None,
    #[default]
    HttpServer,
    PcapFile,
    UdpExporter,
}

impl DumpMode {
    /// Preference key for this mode
    pub fn key(&self) -> &'static str {
        match self {
            DumpMode::None => "none",
            DumpMode::HttpServer => "http_server",
            DumpMode::PcapFile => "pcap_file",
            DumpMode::UdpExporter => "udp_exporter",
        }
    }
}

impl fmt::Display for DumpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DumpMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(DumpMode::None),
            "http_server" => Ok(DumpMode::HttpServer),
            "pcap_file" => Ok(DumpMode::PcapFile),
            "udp_exporter" => Ok(DumpMode::UdpExporter),
            other => Err(AppError::InvalidDumpMode(other.to_string())),
        }
    }
}

/// Everything the rendering layer needs to draw the status panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    /// Main status line ("Ready" or the traffic volume)
    pub status_text: String,

    /// Where the captured traffic goes
    pub collector_info_text: String,

    pub inspector_link_visible: bool,
    pub collector_info_visible: bool,
    pub quick_settings_visible: bool,

    /// Icon of the filtered app, drawn next to the collector info
    pub filter_icon: Option<AppIcon>,
}

impl StatusView {
    /// Layout shown before any capture has started
    pub fn ready(status_text: impl Into<String>) -> Self {
        Self {
            status_text: status_text.into(),
            collector_info_text: String::new(),
            inspector_link_visible: false,
            collector_info_visible: false,
            quick_settings_visible: true,
            filter_icon: None,
        }
    }
}
