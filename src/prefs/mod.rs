//! Persisted user choices: the app filter and the dump mode.

mod file;

pub use file::JsonFilePrefs;

use log::warn;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::models::status::DumpMode;
use crate::utils::error::AppResult;

pub const PREF_APP_FILTER: &str = "app_filter";
pub const PREF_DUMP_MODE: &str = "pcap_dump_mode";

/// Key/value preference backend
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value. The new value is visible to `get` even when persisting it fails.
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Package name of the filtered app, empty string means unset
    fn app_filter(&self) -> Option<String> {
        self.get(PREF_APP_FILTER).filter(|pkg| !pkg.is_empty())
    }

    fn set_app_filter(&self, package_name: Option<&str>) -> AppResult<()> {
        self.set(PREF_APP_FILTER, package_name.unwrap_or(""))
    }

    fn dump_mode(&self) -> DumpMode {
        match self.get(PREF_DUMP_MODE) {
            Some(key) => key.parse().unwrap_or_else(|e| {
                warn!("{}, using default dump mode", e);
                DumpMode::default()
            }),
            None => DumpMode::default(),
        }
    }

    fn set_dump_mode(&self, mode: DumpMode) -> AppResult<()> {
        self.set(PREF_DUMP_MODE, mode.key())
    }
}

/// Preferences that live only as long as the process
#[derive(Default)]
pub struct MemoryPrefs {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_reads_as_unset() {
        let prefs = MemoryPrefs::new();
        assert_eq!(prefs.app_filter(), None);

        prefs.set_app_filter(Some("com.maps")).unwrap();
        assert_eq!(prefs.app_filter().as_deref(), Some("com.maps"));

        prefs.set_app_filter(None).unwrap();
        assert_eq!(prefs.get(PREF_APP_FILTER).as_deref(), Some(""));
        assert_eq!(prefs.app_filter(), None);
    }

    #[test]
    fn test_dump_mode_defaults() {
        let prefs = MemoryPrefs::new();
        assert_eq!(prefs.dump_mode(), DumpMode::HttpServer);

        prefs.set(PREF_DUMP_MODE, "carrier_pigeon").unwrap();
        assert_eq!(prefs.dump_mode(), DumpMode::HttpServer);

        prefs.set_dump_mode(DumpMode::UdpExporter).unwrap();
        assert_eq!(prefs.dump_mode(), DumpMode::UdpExporter);
    }
}
