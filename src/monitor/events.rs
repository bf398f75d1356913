//! Reachability monitoring events
//!
//! Event types emitted to subscribers alongside the coalesced state stream

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{CapabilitySet, NetworkId, ReachabilityState};

/// Event callback type
pub type EventCallback = Arc<dyn Fn(ReachabilityEvent) + Send + Sync>;

/// Events emitted while the reachability monitor is running
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ReachabilityEvent {
    /// Monitoring session started; `seeded_networks` is the size of the
    /// initial enumeration snapshot
    MonitorStarted { seeded_networks: usize },

    /// Monitoring session stopped
    MonitorStopped,

    /// A network appeared. `tracked` is false when the network was ignored
    /// for lacking internet capability
    NetworkAppeared {
        id: NetworkId,
        capabilities: CapabilitySet,
        tracked: bool,
    },

    /// A network disappeared. `was_tracked` is false when the handle was
    /// not in the valid set (no-op removal)
    NetworkLost { id: NetworkId, was_tracked: bool },

    /// The coalesced state was republished. Emitted on every ingested
    /// event, including ones that left the derived state unchanged
    StateChanged { state: ReachabilityState },
}

/// Monitoring status snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorStatus {
    pub is_running: bool,
    pub state: ReachabilityState,
    /// Networks currently in the valid set
    pub valid_networks: usize,
    /// Events ingested since the current start cycle began
    pub event_count: u64,
    pub last_event_time: Option<String>,
}

impl Default for MonitorStatus {
    fn default() -> Self {
        Self {
            is_running: false,
            state: ReachabilityState::Available,
            valid_networks: 0,
            event_count: 0,
            last_event_time: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = ReachabilityEvent::StateChanged {
            state: ReachabilityState::Unavailable,
        };
        let json = serde_json::to_string(&event).unwrap();

        assert!(json.contains("\"type\":\"StateChanged\""));
        assert!(json.contains("\"unavailable\""));
    }

    #[test]
    fn test_network_appeared_round_trip() {
        let event = ReachabilityEvent::NetworkAppeared {
            id: NetworkId::new("wlan0"),
            capabilities: CapabilitySet::internet(),
            tracked: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        let parsed: ReachabilityEvent = serde_json::from_str(&json).unwrap();

        match parsed {
            ReachabilityEvent::NetworkAppeared { id, tracked, .. } => {
                assert_eq!(id.as_str(), "wlan0");
                assert!(tracked);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
