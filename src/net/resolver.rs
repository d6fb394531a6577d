//! Best-effort lookup of the address other hosts on the LAN can reach us at.
//!
//! Resolution walks an ordered list of strategies and the first one that
//! yields an address wins. The default pipeline ends with the loopback
//! address, so it always produces a concrete value.

use log::{debug, info, warn};
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::net::probe::NetworkProbe;

/// Outcome of an address resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedAddress {
    Address(Ipv4Addr),
    /// Every strategy came up empty
    Unresolved,
}

impl fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedAddress::Address(addr) => write!(f, "{}", addr),
            ResolvedAddress::Unresolved => f.write_str("unresolved"),
        }
    }
}

/// One tier of the resolution pipeline
pub trait AddressStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Produce a candidate address, or `None` to defer to the next tier
    fn candidate(&self, probe: &dyn NetworkProbe) -> Option<Ipv4Addr>;
}

/// Address assigned to the wireless interface
pub struct WirelessAddress;

impl AddressStrategy for WirelessAddress {
    fn name(&self) -> &'static str {
        "wireless"
    }

    fn candidate(&self, probe: &dyn NetworkProbe) -> Option<Ipv4Addr> {
        probe
            .wireless_address()
            .filter(|addr| !addr.is_unspecified())
    }
}

/// First private IPv4 address on a physical interface
pub struct InterfaceScan {
    /// The capture engine's own tunnel address, never a candidate
    pub tunnel: Ipv4Addr,
}

impl InterfaceScan {
    fn qualifies(&self, addr: &Ipv4Addr) -> bool {
        !addr.is_loopback() && addr.is_private() && *addr != self.tunnel && !addr.is_unspecified()
    }
}

impl AddressStrategy for InterfaceScan {
    fn name(&self) -> &'static str {
        "interface-scan"
    }

    fn candidate(&self, probe: &dyn NetworkProbe) -> Option<Ipv4Addr> {
        let interfaces = match probe.interfaces() {
            Ok(interfaces) => interfaces,
            Err(e) => {
                warn!("Interface enumeration failed, skipping scan: {}", e);
                return None;
            }
        };

        interfaces
            .iter()
            .filter(|iface| !iface.is_virtual())
            .find_map(|iface| {
                let found = iface.ipv4_addresses().find(|addr| self.qualifies(addr));
                if let Some(addr) = found {
                    debug!("Using interface '{}' IP: {}", iface.name, addr);
                }
                found
            })
    }
}

/// Terminal tier, always answers with 127.0.0.1
pub struct LoopbackFallback;

impl AddressStrategy for LoopbackFallback {
    fn name(&self) -> &'static str {
        "loopback-fallback"
    }

    fn candidate(&self, _probe: &dyn NetworkProbe) -> Option<Ipv4Addr> {
        Some(Ipv4Addr::LOCALHOST)
    }
}

/// Resolves the device's externally visible IPv4 address
pub struct AddressResolver {
    probe: Arc<dyn NetworkProbe>,
    strategies: Vec<Box<dyn AddressStrategy>>,
}

impl AddressResolver {
    /// Default pipeline: wireless, interface scan, loopback
    pub fn new(probe: Arc<dyn NetworkProbe>, tunnel: Ipv4Addr) -> Self {
        Self::with_strategies(
            probe,
            vec![
                Box::new(WirelessAddress),
                Box::new(InterfaceScan { tunnel }),
                Box::new(LoopbackFallback),
            ],
        )
    }

    pub fn with_strategies(
        probe: Arc<dyn NetworkProbe>,
        strategies: Vec<Box<dyn AddressStrategy>>,
    ) -> Self {
        Self { probe, strategies }
    }

    pub fn resolve(&self) -> ResolvedAddress {
        for strategy in &self.strategies {
            if let Some(addr) = strategy.candidate(self.probe.as_ref()) {
                info!("Resolved local address {} via {}", addr, strategy.name());
                return ResolvedAddress::Address(addr);
            }
            debug!("Address strategy '{}' found no candidate", strategy.name());
        }

        warn!("No address strategy produced a candidate");
        ResolvedAddress::Unresolved
    }
}
