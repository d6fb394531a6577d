use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// A network interface and the addresses bound to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetInterface {
    /// Device system name
    pub name: String,

    /// Bound addresses, in the order the platform reports them
    pub addresses: Vec<IpAddr>,

    /// Whether this is a loopback interface
    pub is_loopback: bool,

    /// Whether this is a point-to-point (tunnel) interface
    pub is_point_to_point: bool,

    /// Whether this interface is up/active
    pub is_up: bool,

    /// Whether this is a wireless interface
    pub is_wireless: bool,
}

impl NetInterface {
    /// Loopback, tunnels and aliases (`eth0:1`) are not physical interfaces
    pub fn is_virtual(&self) -> bool {
        self.is_loopback || self.is_point_to_point || self.name.contains(':')
    }

    /// IPv4 addresses only
    pub fn ipv4_addresses(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.addresses.iter().filter_map(|addr| match addr {
            IpAddr::V4(v4) => Some(*v4),
            IpAddr::V6(_) => None,
        })
    }
}

// Builders for canned interfaces
#[cfg(test)]
impl NetInterface {
    /// Create a new interface with just the device name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            addresses: Vec::new(),
            is_loopback: false,
            is_point_to_point: false,
            is_up: true,
            is_wireless: false,
        }
    }

    /// Add a bound address
    pub fn with_address(mut self, addr: IpAddr) -> Self {
        self.addresses.push(addr);
        self
    }

    /// Set the loopback flag
    pub fn with_loopback(mut self, is_loopback: bool) -> Self {
        self.is_loopback = is_loopback;
        self
    }

    /// Set the point-to-point flag
    pub fn with_point_to_point(mut self, is_point_to_point: bool) -> Self {
        self.is_point_to_point = is_point_to_point;
        self
    }
}
