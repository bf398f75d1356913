//! Reachability monitoring - availability aggregation and event stream

mod aggregator;
pub mod events;

pub use aggregator::ReachabilityMonitor;
pub use events::{EventCallback, MonitorStatus, ReachabilityEvent};
