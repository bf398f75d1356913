use anyhow::{Context, Result};

use crate::monitor::{ReachabilityEvent, ReachabilityMonitor};
use crate::source::system::{list_interfaces, SystemSource};

pub(crate) async fn handle_interfaces() -> Result<()> {
    let interfaces = list_interfaces();
    if interfaces.is_empty() {
        println!("No active network interfaces found.");
    } else {
        for interface in interfaces {
            println!("{}", interface);
        }
    }
    Ok(())
}

pub(crate) async fn handle_watch(interval: Option<u64>, json: bool) -> Result<()> {
    crate::log_stderr!(
        "netreach v{} — watching network reachability (ctrl-c to stop)",
        env!("CARGO_PKG_VERSION")
    );

    let source = SystemSource::new(interval);
    let monitor = ReachabilityMonitor::new();

    let callback = move |event: ReachabilityEvent| {
        if json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => crate::log_error!("Failed to serialize event: {}", e),
            }
        } else if let ReachabilityEvent::StateChanged { state } = event {
            // Republished on every event; duplicates are intentional.
            println!("network is {}", state);
        }
    };

    monitor.start(&source, callback).await?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to wait for shutdown signal")?;

    monitor.stop().await;
    let status = monitor.status().await;
    crate::log_stderr!(
        "Stopped after {} events, final state: {}",
        status.event_count,
        status.state
    );
    Ok(())
}
