//! Data models for the network reachability monitor

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for one active network, as supplied by the event
/// source. Equality-comparable only; no ordering is defined or relied on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(String);

impl NetworkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NetworkId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Capabilities reported for a network by the event source.
///
/// Only `internet` participates in the availability decision; the rest is
/// carried through for event consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    /// The network provides a route to the internet (not local-only).
    pub internet: bool,
    /// The connection is metered (mobile data, tethering).
    #[serde(default)]
    pub metered: bool,
}

impl CapabilitySet {
    /// Capability set of a network with plain internet access.
    pub fn internet() -> Self {
        Self {
            internet: true,
            metered: false,
        }
    }

    /// Capability set of a local-only network (no internet route).
    pub fn local_only() -> Self {
        Self::default()
    }

    pub fn has_internet(&self) -> bool {
        self.internet
    }
}

/// Coalesced availability signal derived from the valid-network set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReachabilityState {
    Available,
    Unavailable,
}

impl fmt::Display for ReachabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_id_equality() {
        let a = NetworkId::new("wlan0");
        let b = NetworkId::from("wlan0");
        let c = NetworkId::new("eth0");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_capability_set_constructors() {
        assert!(CapabilitySet::internet().has_internet());
        assert!(!CapabilitySet::local_only().has_internet());
        assert!(!CapabilitySet::default().has_internet());
    }

    #[test]
    fn test_reachability_state_serialization() {
        let json = serde_json::to_string(&ReachabilityState::Available).unwrap();
        assert_eq!(json, "\"available\"");

        let state: ReachabilityState = serde_json::from_str("\"unavailable\"").unwrap();
        assert_eq!(state, ReachabilityState::Unavailable);
    }

    #[test]
    fn test_reachability_state_display() {
        assert_eq!(ReachabilityState::Available.to_string(), "available");
        assert_eq!(ReachabilityState::Unavailable.to_string(), "unavailable");
    }
}
