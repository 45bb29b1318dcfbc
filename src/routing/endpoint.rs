//! Endpoint variants
//!
//! One variant per route behavior; the route table is a list of these.

use serde::{Deserialize, Serialize};

use crate::handler::endpoints;
use crate::http::{Reply, RouteRequest};

/// Route behaviors the server knows how to serve
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// `/hello`: plain-text greeting, any method
    Hello,
    /// `/json`: fixed JSON document, GET only
    Json,
    /// `/greet`: greeting built from `name`/`age` query parameters, GET only
    Greet,
    /// `/receive`: echoes `name`/`age` from a flat JSON body, POST only
    Receive,
}

impl Endpoint {
    pub const ALL: [Self; 4] = [Self::Hello, Self::Json, Self::Greet, Self::Receive];

    pub const fn path(self) -> &'static str {
        match self {
            Self::Hello => "/hello",
            Self::Json => "/json",
            Self::Greet => "/greet",
            Self::Receive => "/receive",
        }
    }

    /// The only method accepted, `None` when any method is
    pub const fn allowed_method(self) -> Option<&'static str> {
        match self {
            Self::Hello => None,
            Self::Json | Self::Greet => Some("GET"),
            Self::Receive => Some("POST"),
        }
    }

    /// Whether the endpoint reads the request body (and so enforces its size limit)
    pub const fn reads_body(self) -> bool {
        matches!(self, Self::Receive)
    }

    pub fn handle(self, req: &RouteRequest) -> Reply {
        if let Some(allowed) = self.allowed_method() {
            if !req.method_is(allowed) {
                return Reply::method_not_allowed(allowed);
            }
        }

        match self {
            Self::Hello => endpoints::hello(),
            Self::Json => endpoints::json_status(),
            Self::Greet => endpoints::greet(req),
            Self::Receive => endpoints::receive(req),
        }
    }
}
