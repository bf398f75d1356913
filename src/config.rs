//! Configuration constants for the network reachability monitor

// ====== System Source Polling ======

/// Default interface poll interval in seconds
pub const DEFAULT_POLL_INTERVAL: u64 = 5;

/// Minimum interface poll interval in seconds
pub const MIN_POLL_INTERVAL: u64 = 1;

/// Maximum interface poll interval in seconds
pub const MAX_POLL_INTERVAL: u64 = 300;

// ====== Logging ======

/// Application directory name used for the per-platform log location
pub const APP_DIR_NAME: &str = "netreach";
