//! Endpoint implementations
//!
//! Method checks happen in [`Endpoint::handle`](crate::routing::Endpoint::handle)
//! before any of these run.

use hyper::StatusCode;
use serde::Serialize;

use crate::http::json::FlatObject;
use crate::http::{Reply, RouteRequest};

const HELLO_TEXT: &str = "Hello from JDK HTTP Server!";

#[derive(Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Serialize)]
struct StatusBody<'a> {
    message: &'a str,
    status: &'a str,
}

#[derive(Serialize)]
struct ReceivedBody {
    message: String,
    status: &'static str,
}

/// `/hello`
pub fn hello() -> Reply {
    Reply::text(StatusCode::OK, HELLO_TEXT)
}

/// `GET /json`
pub fn json_status() -> Reply {
    Reply::json(
        StatusCode::OK,
        &StatusBody {
            message: "Hello, JSON!",
            status: "success",
        },
    )
}

/// `GET /greet?name=..&age=..`
pub fn greet(req: &RouteRequest) -> Reply {
    let name = req.query_param("name").unwrap_or_else(|| "Guest".to_string());
    let age = req.query_param("age").unwrap_or_else(|| "?".to_string());

    Reply::json(
        StatusCode::OK,
        &MessageBody {
            message: format!("Hello, {name}! You are {age} years old."),
        },
    )
}

/// `POST /receive` with a flat JSON body
pub fn receive(req: &RouteRequest) -> Reply {
    let payload = FlatObject::parse(&req.body);
    if payload.is_none() && !req.body.is_empty() {
        crate::logger::log_debug(&format!(
            "Body of {} is not a JSON object ({} bytes), using defaults",
            req.path,
            req.body.len()
        ));
    }
    let field = |key: &str| payload.as_ref().and_then(|p| p.string(key)).map(ToString::to_string);

    let name = field("name").unwrap_or_else(|| "unknown".to_string());
    let age = field("age").unwrap_or_else(|| "?".to_string());

    Reply::json(
        StatusCode::OK,
        &ReceivedBody {
            message: format!("Received data for {name}, age {age}"),
            status: "ok",
        },
    )
}
