//! netreach — Network Reachability Monitor
//!
//! This crate derives a coalesced availability signal from live network
//! connectivity events:
//! - Availability aggregation over the set of internet-capable networks
//! - Watch-channel state stream (latest value + change notifications)
//! - Pluggable connectivity sources behind a trait seam
//! - OS-backed polling source over the system interface table
//! - Structured logging with daily file rotation

pub mod app;
pub mod config;
pub mod logging;
pub mod models;
pub mod monitor;
pub mod source;

mod cli;
mod command_handlers;

pub use config::*;
pub use models::{CapabilitySet, NetworkId, ReachabilityState};
pub use monitor::{EventCallback, MonitorStatus, ReachabilityEvent, ReachabilityMonitor};
pub use source::system::{list_interfaces, InterfaceSummary, SystemSource};
pub use source::{ConnectivitySource, EventSink, SourceSubscription};

// Re-export logging macros for use across crate
pub use crate::logging::macros;
