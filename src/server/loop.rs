// Server loop module
// Owns the listener, accepts connections until stopped, then drains them

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;

use super::connection::accept_connection;
use super::listener::create_listener;
use crate::config::{AppState, Config};
use crate::logger;

/// `None` while running, `Some(grace)` once a stop was requested
type StopSignal = Option<Duration>;

/// A bound server, ready to `run`
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    stop_tx: Arc<watch::Sender<StopSignal>>,
    stop_rx: watch::Receiver<StopSignal>,
}

/// Cloneable handle used to stop a running server
#[derive(Clone)]
pub struct ServerHandle {
    stop_tx: Arc<watch::Sender<StopSignal>>,
}

impl ServerHandle {
    /// Stop accepting, give open connections up to `grace` to finish, then close them.
    ///
    /// `Server::run` returns once this completes. A second call made before
    /// the accept loop noticed the first one replaces the grace period.
    pub fn stop(&self, grace: Duration) {
        self.stop_tx.send_replace(Some(grace));
    }
}

impl Server {
    /// Build state and bind the listener; must be called within a Tokio runtime.
    ///
    /// Fails on an invalid address, a duplicate endpoint, or a bind error
    /// such as the port already being in use.
    pub fn bind(config: Config) -> io::Result<Self> {
        let addr = config
            .get_socket_addr()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let state =
            AppState::new(config).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let listener = create_listener(addr)?;
        let (stop_tx, stop_rx) = watch::channel(None);

        Ok(Self {
            listener,
            state: Arc::new(state),
            active_connections: Arc::new(AtomicUsize::new(0)),
            stop_tx: Arc::new(stop_tx),
            stop_rx,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            stop_tx: Arc::clone(&self.stop_tx),
        }
    }

    /// Accept and serve connections until `ServerHandle::stop` is called
    pub async fn run(self) -> io::Result<()> {
        let Self {
            listener,
            state,
            active_connections,
            // Held so `changed()` never sees a closed channel
            stop_tx: _stop_tx,
            mut stop_rx,
        } = self;

        let endpoints: Vec<&str> = state.routes.endpoints().iter().map(|e| e.path()).collect();
        logger::log_server_start(&listener.local_addr()?, &state.config, &endpoints);

        let mut connections = JoinSet::new();
        let grace = loop {
            if let Some(grace) = *stop_rx.borrow_and_update() {
                break grace;
            }

            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            accept_connection(
                                stream,
                                peer_addr,
                                &state,
                                &active_connections,
                                stop_rx.clone(),
                                &mut connections,
                            );
                        }
                        Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                    }
                }

                Some(finished) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = finished {
                        if e.is_panic() {
                            logger::log_error(&format!("Connection task panicked: {e}"));
                        }
                    }
                }

                // Re-checked at the top of the loop
                _ = stop_rx.changed() => {}
            }
        };

        drop(listener);
        logger::log_stop_requested(grace);

        let drained = tokio::time::timeout(grace, async {
            while connections.join_next().await.is_some() {}
        })
        .await
        .is_ok();

        let aborted = if drained {
            0
        } else {
            let remaining = connections.len();
            connections.shutdown().await;
            remaining
        };

        logger::log_server_stopped(aborted);
        Ok(())
    }
}
