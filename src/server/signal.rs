// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful stop
// - SIGINT:  Graceful stop (Ctrl+C)

use std::time::Duration;

use super::ServerHandle;
use crate::logger;

/// Stop the server with `grace` on the first SIGTERM or SIGINT (Unix only)
#[cfg(unix)]
pub fn start_signal_handler(handle: ServerHandle, grace: Duration) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    logger::log_error(&format!("Failed to register signal handlers: {e}"));
                    return;
                }
            };

        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };

        logger::log_signal_received(name);
        handle.stop(grace);
    });
}

/// Stop the server with `grace` on Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handle: ServerHandle, grace: Duration) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                logger::log_signal_received("Ctrl+C");
                handle.stop(grace);
            }
            Err(e) => logger::log_error(&format!("Failed to listen for Ctrl+C: {e}")),
        }
    });
}
