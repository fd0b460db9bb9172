//! Process signal hook: Ctrl-C or SIGTERM requests a controller stop.

use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use crate::core::clock::StopSignal;
use crate::core::error::ControllerError;

/// Spawn a detached `signals` thread that requests `stop` on Ctrl-C or
/// SIGTERM.
///
/// The thread drives a single-threaded tokio runtime that only awaits the
/// signals. It is not joined: if no signal ever arrives it ends with the
/// process.
///
/// # Errors
///
/// `ThreadSpawn` if the thread cannot be started.
pub fn spawn_signal_listener(stop: StopSignal) -> Result<JoinHandle<()>, ControllerError> {
    thread::Builder::new()
        .name("signals".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(e) => {
                    warn!(error = %e, "signal listener unavailable");
                    return;
                }
            };
            runtime.block_on(shutdown_signal());
            info!("shutdown signal received");
            stop.request();
        })
        .map_err(|source| ControllerError::ThreadSpawn { name: "signals", source })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sigterm) = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
