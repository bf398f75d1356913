//! Connectivity event sources
//!
//! The monitor core is written against the [`ConnectivitySource`] trait;
//! [`system::SystemSource`] is the OS-backed implementation. Sources deliver
//! appear/disappear events into an [`EventSink`] bound to one monitor start
//! cycle; once that cycle stops, sends into the sink are silently dropped.

pub mod system;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::{CapabilitySet, NetworkId};

/// Raw connectivity event as delivered by a source.
#[derive(Debug, Clone)]
pub(crate) enum RawEvent {
    Appeared {
        id: NetworkId,
        capabilities: CapabilitySet,
    },
    Lost {
        id: NetworkId,
    },
}

/// Write side of one monitor cycle's event channel.
///
/// Cloneable and cheap; a source keeps one for the lifetime of its
/// subscription. Sends are fire-and-forget: they never block the source's
/// delivery task, and events bound to a stopped cycle are discarded.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<RawEvent>,
}

impl EventSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<RawEvent>) -> Self {
        Self { tx }
    }

    /// Report a network that appeared with the given capability set.
    pub fn network_appeared(&self, id: NetworkId, capabilities: CapabilitySet) {
        let _ = self.tx.send(RawEvent::Appeared { id, capabilities });
    }

    /// Report a network that disappeared.
    pub fn network_lost(&self, id: NetworkId) {
        let _ = self.tx.send(RawEvent::Lost { id });
    }

    /// True once the owning monitor cycle has stopped. Polling sources use
    /// this to shut their delivery task down.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Guard for an active source subscription. Dropping it unsubscribes:
/// any delivery task the source spawned is aborted.
pub struct SourceSubscription {
    task: Option<JoinHandle<()>>,
}

impl SourceSubscription {
    /// Subscription backed by a spawned delivery task.
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    /// Subscription with no background task (sources that deliver events
    /// from elsewhere, e.g. test fakes holding the sink directly).
    pub fn detached() -> Self {
        Self { task: None }
    }
}

impl Drop for SourceSubscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Supplier of raw connectivity events.
///
/// `active_networks` is a synchronous point-in-time snapshot used to seed
/// the monitor at start. `subscribe` registers for ongoing delivery and may
/// fail (e.g. the platform denies the capability filter); that failure
/// surfaces synchronously from `ReachabilityMonitor::start`.
pub trait ConnectivitySource: Send + Sync {
    /// Enumerate all currently active networks with their capability sets.
    fn active_networks(&self) -> Result<Vec<(NetworkId, CapabilitySet)>>;

    /// Begin delivering appear/disappear events into `sink`. Delivery runs
    /// on the source's own task, asynchronously to the caller.
    fn subscribe(&self, sink: EventSink) -> Result<SourceSubscription>;
}
