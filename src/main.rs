//! netreach — Network Reachability Monitor CLI
//!
//! Watches the set of internet-capable networks via the system source and
//! reports every coalesced availability transition.

/// Logs an error message to stderr
macro_rules! log_error {
    ($($arg:tt)*) => {
        netreach::log_error!($($arg)*);
    };
}

#[tokio::main]
async fn main() {
    if let Err(e) = netreach::logging::init_logging() {
        eprintln!("[WARN] Failed to initialize structured logging: {}", e);
    }

    match netreach::app::run(std::env::args()).await {
        Ok(()) => {}
        Err(e) => {
            log_error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
