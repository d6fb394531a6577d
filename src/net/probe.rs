//! Live queries against the platform's network state.

use log::{debug, warn};
use std::net::Ipv4Addr;
use std::path::PathBuf;

use crate::models::interface::NetInterface;
use crate::utils::error::{AppError, AppResult};

/// Name prefixes used by wireless drivers when sysfs is unavailable
const WIRELESS_PREFIXES: &[&str] = &["wlan", "wlp", "wlx", "wifi"];

/// Read-only view of the device's network interfaces
pub trait NetworkProbe: Send + Sync {
    /// Address assigned to the wireless interface, if connected
    fn wireless_address(&self) -> Option<Ipv4Addr>;

    /// All interfaces with their bound addresses
    fn interfaces(&self) -> AppResult<Vec<NetInterface>>;
}

/// Probe backed by `pnet_datalink`
pub struct PnetProbe {
    /// Kernel directory listing network devices
    sys_class_net: PathBuf,
}

impl PnetProbe {
    pub fn new() -> Self {
        Self {
            sys_class_net: PathBuf::from("/sys/class/net"),
        }
    }

    fn is_wireless(&self, name: &str) -> bool {
        self.sys_class_net.join(name).join("wireless").exists()
            || WIRELESS_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
    }

    /// Convert a pnet interface to our `NetInterface`
    fn convert(&self, iface: pnet_datalink::NetworkInterface) -> NetInterface {
        let is_wireless = self.is_wireless(&iface.name);

        NetInterface {
            addresses: iface.ips.iter().map(|net| net.ip()).collect(),
            is_loopback: iface.is_loopback(),
            is_point_to_point: iface.is_point_to_point(),
            is_up: iface.is_up(),
            is_wireless,
            name: iface.name,
        }
    }
}

impl Default for PnetProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkProbe for PnetProbe {
    fn wireless_address(&self) -> Option<Ipv4Addr> {
        let interfaces = match self.interfaces() {
            Ok(interfaces) => interfaces,
            Err(e) => {
                warn!("Cannot query wireless interface: {}", e);
                return None;
            }
        };

        interfaces
            .iter()
            .filter(|iface| iface.is_wireless && iface.is_up)
            .find_map(|iface| {
                let addr = iface.ipv4_addresses().next();
                debug!("Wireless interface '{}' has address {:?}", iface.name, addr);
                addr
            })
    }

    fn interfaces(&self) -> AppResult<Vec<NetInterface>> {
        // pnet_datalink is known to panic on some platforms while enumerating
        let raw = std::panic::catch_unwind(pnet_datalink::interfaces).map_err(|_| {
            AppError::NetworkError("pnet_datalink panicked while listing interfaces".to_string())
        })?;

        debug!("Found {} network interfaces", raw.len());
        Ok(raw.into_iter().map(|iface| self.convert(iface)).collect())
    }
}
