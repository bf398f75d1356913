//! OS-backed connectivity source
//!
//! Polls the system's network interfaces and diffs successive snapshots
//! into appear/disappear events. An up, non-loopback, non-virtual adapter
//! with an IPv4 assignment counts as an active network; a routable
//! (non-link-local) address maps to the internet capability.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Duration;

use anyhow::Result;
use pnet::datalink;

use crate::config::{DEFAULT_POLL_INTERVAL, MAX_POLL_INTERVAL, MIN_POLL_INTERVAL};
use crate::models::{CapabilitySet, NetworkId};
use crate::source::{ConnectivitySource, EventSink, SourceSubscription};

fn is_virtual_adapter_name(name_lower: &str) -> bool {
    name_lower.contains("hyper-v")
        || name_lower.contains("vmware")
        || name_lower.contains("virtualbox")
        || name_lower.contains("docker")
        || name_lower.contains("vethernet")
        || name_lower.contains("wsl")
}

fn is_link_local(octets: [u8; 4]) -> bool {
    octets[0] == 169 && octets[1] == 254
}

/// Interface summary for the `interfaces` CLI command.
#[derive(Debug, Clone, serde::Serialize)]
pub struct InterfaceSummary {
    pub name: String,
    pub ipv4: Vec<String>,
    pub internet: bool,
}

impl std::fmt::Display for InterfaceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] internet={}",
            self.name,
            self.ipv4.join(", "),
            self.internet
        )
    }
}

/// Snapshot currently active networks from the OS interface table.
fn snapshot_networks() -> Vec<(NetworkId, CapabilitySet)> {
    let mut networks = Vec::new();

    for iface in datalink::interfaces() {
        if iface.is_loopback() {
            continue;
        }
        if is_virtual_adapter_name(&iface.name.to_lowercase()) {
            continue;
        }

        let mut has_v4 = false;
        let mut has_routable_v4 = false;
        for ip_network in &iface.ips {
            if let IpAddr::V4(ipv4) = ip_network.ip() {
                if ipv4.is_unspecified() || ip_network.prefix() == 0 {
                    continue;
                }
                has_v4 = true;
                if !is_link_local(ipv4.octets()) {
                    has_routable_v4 = true;
                }
            }
        }

        // On Windows/Npcap, `is_up()` can be false even for usable
        // adapters; accept those when they carry a routable IPv4.
        if !iface.is_up() && !(cfg!(target_os = "windows") && has_routable_v4) {
            continue;
        }
        if !has_v4 {
            continue;
        }

        let capabilities = if has_routable_v4 {
            CapabilitySet::internet()
        } else {
            // Link-local only: the network exists but has no internet route.
            CapabilitySet::local_only()
        };
        networks.push((NetworkId::new(&iface.name), capabilities));
    }

    networks
}

/// List candidate interfaces with their addresses.
pub fn list_interfaces() -> Vec<InterfaceSummary> {
    datalink::interfaces()
        .iter()
        .filter(|iface| !iface.is_loopback() && iface.is_up())
        .map(|iface| {
            let ipv4: Vec<String> = iface
                .ips
                .iter()
                .filter_map(|ip_network| match ip_network.ip() {
                    IpAddr::V4(v4) if !v4.is_unspecified() => Some(v4.to_string()),
                    _ => None,
                })
                .collect();
            let internet = iface.ips.iter().any(|ip_network| match ip_network.ip() {
                IpAddr::V4(v4) => {
                    !v4.is_unspecified() && ip_network.prefix() > 0 && !is_link_local(v4.octets())
                }
                IpAddr::V6(_) => false,
            });
            InterfaceSummary {
                name: iface.name.clone(),
                ipv4,
                internet,
            }
        })
        .collect()
}

/// Polling connectivity source over the OS interface table.
pub struct SystemSource {
    poll_interval: Duration,
}

impl SystemSource {
    /// Create a source polling at `interval_secs`, clamped to the
    /// configured bounds. `None` uses the default.
    pub fn new(interval_secs: Option<u64>) -> Self {
        let secs = interval_secs
            .unwrap_or(DEFAULT_POLL_INTERVAL)
            .clamp(MIN_POLL_INTERVAL, MAX_POLL_INTERVAL);
        Self {
            poll_interval: Duration::from_secs(secs),
        }
    }
}

impl Default for SystemSource {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ConnectivitySource for SystemSource {
    fn active_networks(&self) -> Result<Vec<(NetworkId, CapabilitySet)>> {
        Ok(snapshot_networks())
    }

    fn subscribe(&self, sink: EventSink) -> Result<SourceSubscription> {
        let interval = self.poll_interval;
        let initial: HashMap<NetworkId, CapabilitySet> =
            snapshot_networks().into_iter().collect();

        let task = tokio::spawn(async move {
            tracing::debug!(
                interval_secs = interval.as_secs(),
                known = initial.len(),
                "system source polling started"
            );
            let mut known = initial;

            loop {
                tokio::time::sleep(interval).await;
                if sink.is_closed() {
                    break;
                }

                let current: HashMap<NetworkId, CapabilitySet> =
                    snapshot_networks().into_iter().collect();

                for (id, capabilities) in &current {
                    if !known.contains_key(id) {
                        tracing::debug!(network = %id, "interface appeared");
                        sink.network_appeared(id.clone(), *capabilities);
                    }
                }
                for id in known.keys() {
                    if !current.contains_key(id) {
                        tracing::debug!(network = %id, "interface disappeared");
                        sink.network_lost(id.clone());
                    }
                }

                known = current;
            }

            tracing::debug!("system source polling stopped");
        });

        Ok(SourceSubscription::new(task))
    }
}
