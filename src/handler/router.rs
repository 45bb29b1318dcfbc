//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body size validation, body
//! collection, route dispatch and access logging.

use crate::config::AppState;
use crate::http::{Reply, RouteRequest};
use crate::logger::{self, AccessLogEntry};
use crate::routing::Endpoint;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::http::request::Parts;
use hyper::{HeaderMap, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    logger::log_debug(&format!(
        "[Request] {} {} ({} headers)",
        parts.method,
        parts.uri,
        parts.headers.len()
    ));

    let mut entry = state
        .access_log_enabled()
        .then(|| AccessLogEntry::from_parts(peer_addr, &parts));

    // Only a POST to an endpoint that reads bodies is size-checked; everything
    // else goes straight to the method check
    let reads_body = parts.method.as_str().eq_ignore_ascii_case("POST")
        && state
            .routes
            .find(parts.uri.path())
            .is_some_and(Endpoint::reads_body);

    let max_body_size = state.config.http.max_body_size;
    let reply = match read_request(parts, body, reads_body, max_body_size).await {
        Ok(route_req) => state
            .routes
            .dispatch(&route_req)
            .unwrap_or_else(Reply::not_found),
        Err(reply) => reply,
    };

    if let Some(entry) = entry.as_mut() {
        entry.status = reply.status.as_u16();
        entry.body_bytes = reply.body.len();
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(reply.into_response(&state.config.http.server_name))
}

/// Turn hyper's request into a [`RouteRequest`], collecting the body when
/// `reads_body` is set. Failures come back as the reply to send.
async fn read_request(
    parts: Parts,
    body: Incoming,
    reads_body: bool,
    max_body_size: u64,
) -> Result<RouteRequest, Reply> {
    if reads_body {
        if let Some(reply) = check_body_size(&parts.headers, max_body_size) {
            return Err(reply);
        }
    }

    let mut route_req = RouteRequest::new(parts.method, parts.uri.path());
    route_req.query = parts.uri.query().map(ToString::to_string);

    if reads_body {
        route_req.body = collect_body(body, max_body_size).await?;
    }

    Ok(route_req)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Reply> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(Reply::payload_too_large())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Read the whole body, enforcing the limit for bodies without Content-Length
async fn collect_body(body: Incoming, max_body_size: u64) -> Result<Bytes, Reply> {
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!(
                "Request body exceeded {max_body_size} bytes while reading"
            ));
            Err(Reply::payload_too_large())
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(Reply::bad_request())
        }
    }
}
