// Connection handling module
// Accepts a single TCP connection and serves HTTP/1.1 on it in its own task

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Decrements the active connection counter when the task ends or is aborted
struct ConnectionGuard(Arc<AtomicUsize>);

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Accept a connection, enforcing `max_connections`, and spawn its task into `tasks`.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
/// * `shutdown` - Stop signal; a change asks the connection to wind down
/// * `tasks` - Set owning every connection task of the server
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    shutdown: watch::Receiver<Option<Duration>>,
    tasks: &mut JoinSet<()>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);
    let guard = ConnectionGuard(Arc::clone(conn_counter));

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    tasks.spawn(serve_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        shutdown,
        guard,
    ));
}

/// Serve one connection until the client closes it, the timeout hits, or
/// a stop request has let the in-flight request finish.
async fn serve_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    mut shutdown: watch::Receiver<Option<Duration>>,
    _guard: ConnectionGuard,
) {
    let io = TokioIo::new(stream);
    let timeout_duration = state.config.connection_timeout();

    let keep_alive = state.config.keep_alive_timeout();
    let mut builder = http1::Builder::new();
    builder.timer(TokioTimer::new()).keep_alive(keep_alive.is_some());
    // An idle keep-alive connection is waiting for the next request head
    if let Some(idle) = keep_alive {
        builder.header_read_timeout(idle);
    }

    let service_state = Arc::clone(&state);
    let conn = builder.serve_connection(
        io,
        service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), peer_addr)),
    );
    let mut conn = std::pin::pin!(conn);

    let mut shutting_down = false;
    let served = tokio::time::timeout(timeout_duration, async {
        loop {
            tokio::select! {
                result = conn.as_mut() => break result,
                _ = shutdown.changed(), if !shutting_down => {
                    shutting_down = true;
                    conn.as_mut().graceful_shutdown();
                }
            }
        }
    })
    .await;

    match served {
        Ok(Ok(())) => {}
        Ok(Err(err)) => logger::log_connection_error(&err),
        Err(_) => {
            logger::log_warning(&format!(
                "Connection from {peer_addr} timed out after {} seconds",
                timeout_duration.as_secs()
            ));
        }
    }
}
