//! Availability aggregator
//!
//! Translates the raw appear/disappear event stream from a
//! [`ConnectivitySource`] into a coalesced two-state reachability signal.
//! All set mutation is funneled through one worker task per start cycle;
//! the derived state is the only thing exposed outside it, through a
//! `tokio::sync::watch` cell (late subscribers see the latest value).

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

use super::events::{EventCallback, MonitorStatus, ReachabilityEvent};
use crate::models::{NetworkId, ReachabilityState};
use crate::source::{ConnectivitySource, EventSink, RawEvent, SourceSubscription};

/// State tied to one start/stop cycle.
struct Cycle {
    worker: JoinHandle<()>,
    callback: EventCallback,
    /// Dropping this unsubscribes from the source.
    _subscription: SourceSubscription,
}

/// Reachability monitor.
///
/// The state stream outlives individual start/stop cycles: it is created
/// once per monitor, initialized optimistically to `Available`, and keeps
/// its last value across a stop. Every start recomputes it immediately
/// from a fresh enumeration.
pub struct ReachabilityMonitor {
    is_running: Arc<AtomicBool>,
    state_tx: watch::Sender<ReachabilityState>,
    state_rx: watch::Receiver<ReachabilityState>,
    event_count: Arc<AtomicU64>,
    valid_count: Arc<AtomicUsize>,
    last_event_time: Arc<Mutex<Option<String>>>,
    cycle: Mutex<Option<Cycle>>,
}

impl ReachabilityMonitor {
    pub fn new() -> Self {
        let (state_tx, state_rx) = watch::channel(ReachabilityState::Available);
        Self {
            is_running: Arc::new(AtomicBool::new(false)),
            state_tx,
            state_rx,
            event_count: Arc::new(AtomicU64::new(0)),
            valid_count: Arc::new(AtomicUsize::new(0)),
            last_event_time: Arc::new(Mutex::new(None)),
            cycle: Mutex::new(None),
        }
    }

    /// Start monitoring with an event callback.
    ///
    /// Subscribes to the source, seeds the valid-network set from a full
    /// enumeration of currently active networks and publishes the
    /// recomputed state immediately. Subscription or enumeration failures
    /// propagate to the caller; the monitor is left stopped in that case.
    ///
    /// Calling start while already running is a no-op.
    pub async fn start<F>(&self, source: &dyn ConnectivitySource, callback: F) -> Result<()>
    where
        F: Fn(ReachabilityEvent) + Send + Sync + 'static,
    {
        let mut cycle = self.cycle.lock().await;
        if cycle.is_some() {
            tracing::debug!("monitor already running, start ignored");
            return Ok(());
        }

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let subscription = source
            .subscribe(EventSink::new(events_tx))
            .context("Failed to subscribe to connectivity source")?;
        let snapshot = source
            .active_networks()
            .context("Failed to enumerate active networks")?;

        // Seed with every handle from the enumeration snapshot. Capability
        // filtering applies to event-driven insertion only.
        let valid: HashSet<NetworkId> = snapshot.into_iter().map(|(id, _)| id).collect();

        let callback: EventCallback = Arc::new(callback);

        self.event_count.store(0, Ordering::SeqCst);
        self.valid_count.store(valid.len(), Ordering::SeqCst);
        *self.last_event_time.lock().await = None;
        self.is_running.store(true, Ordering::SeqCst);

        callback(ReachabilityEvent::MonitorStarted {
            seeded_networks: valid.len(),
        });
        publish(&self.state_tx, &valid, &callback);

        tracing::info!(
            seeded = valid.len(),
            state = %self.current_state(),
            "reachability monitor started"
        );

        let worker = tokio::spawn(run_worker(
            events_rx,
            valid,
            self.state_tx.clone(),
            Arc::clone(&callback),
            Arc::clone(&self.event_count),
            Arc::clone(&self.valid_count),
            Arc::clone(&self.last_event_time),
        ));

        *cycle = Some(Cycle {
            worker,
            callback,
            _subscription: subscription,
        });
        Ok(())
    }

    /// Stop monitoring.
    ///
    /// Cancels the cycle's worker without draining queued events — a
    /// late-arriving event bound to the old cycle never mutates state or
    /// publishes. The valid-network set is discarded with the worker and
    /// the source subscription is released. Stopping an already stopped
    /// monitor is a no-op.
    pub async fn stop(&self) {
        let cycle = { self.cycle.lock().await.take() };
        let Some(cycle) = cycle else {
            tracing::debug!("monitor not running, stop ignored");
            return;
        };

        cycle.worker.abort();
        // Wait for the worker to actually finish so no publish can race
        // past this point.
        let _ = cycle.worker.await;

        self.is_running.store(false, Ordering::SeqCst);
        self.valid_count.store(0, Ordering::SeqCst);
        (cycle.callback)(ReachabilityEvent::MonitorStopped);
        tracing::info!("reachability monitor stopped");
        // _subscription drops here and tears down the source delivery task
    }

    /// Latest published state. Never blocks.
    pub fn current_state(&self) -> ReachabilityState {
        *self.state_rx.borrow()
    }

    /// Subscribe to the state stream. The receiver holds the latest value
    /// immediately; it is woken on every publish, including republishes of
    /// an unchanged state.
    pub fn subscribe(&self) -> watch::Receiver<ReachabilityState> {
        self.state_tx.subscribe()
    }

    /// Check if monitoring is running
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    /// Get current monitoring status
    pub async fn status(&self) -> MonitorStatus {
        MonitorStatus {
            is_running: self.is_running.load(Ordering::SeqCst),
            state: self.current_state(),
            valid_networks: self.valid_count.load(Ordering::SeqCst),
            event_count: self.event_count.load(Ordering::SeqCst),
            last_event_time: self.last_event_time.lock().await.clone(),
        }
    }
}

impl Default for ReachabilityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-writer loop owning the valid-network set for one cycle.
async fn run_worker(
    mut events_rx: mpsc::UnboundedReceiver<RawEvent>,
    mut valid: HashSet<NetworkId>,
    state_tx: watch::Sender<ReachabilityState>,
    callback: EventCallback,
    event_count: Arc<AtomicU64>,
    valid_count: Arc<AtomicUsize>,
    last_event_time: Arc<Mutex<Option<String>>>,
) {
    while let Some(event) = events_rx.recv().await {
        match event {
            RawEvent::Appeared { id, capabilities } => {
                // A network appearing without internet capability is
                // ignored until a later event reports it valid.
                let tracked = capabilities.has_internet();
                if tracked {
                    valid.insert(id.clone());
                }
                tracing::debug!(network = %id, tracked, "network appeared");
                callback(ReachabilityEvent::NetworkAppeared {
                    id,
                    capabilities,
                    tracked,
                });
            }
            RawEvent::Lost { id } => {
                // Unconditional removal; absent handles are a no-op.
                let was_tracked = valid.remove(&id);
                tracing::debug!(network = %id, was_tracked, "network lost");
                callback(ReachabilityEvent::NetworkLost { id, was_tracked });
            }
        }

        valid_count.store(valid.len(), Ordering::SeqCst);
        *last_event_time.lock().await = Some(chrono::Utc::now().to_rfc3339());

        publish(&state_tx, &valid, &callback);

        // Incremented last: once observed, the event's publish is complete.
        event_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Recompute the derived state and publish it unconditionally.
///
/// Redundant publishes are intentional: the aggregator keeps no
/// last-emitted value, and consumers that need edge-triggered behavior
/// de-duplicate themselves.
fn publish(
    state_tx: &watch::Sender<ReachabilityState>,
    valid: &HashSet<NetworkId>,
    callback: &EventCallback,
) {
    let state = if valid.is_empty() {
        ReachabilityState::Unavailable
    } else {
        ReachabilityState::Available
    };
    callback(ReachabilityEvent::StateChanged { state });
    let _ = state_tx.send(state);
}
