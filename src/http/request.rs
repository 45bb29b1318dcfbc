//! Parsed request handed to endpoints
//!
//! Decoupled from hyper's streaming body so endpoints stay synchronous.

use hyper::body::Bytes;
use hyper::Method;

use super::query;

/// Request as seen by an endpoint
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub method: Method,
    pub path: String,
    /// Raw query string (without leading `?`)
    pub query: Option<String>,
    /// Request body, only collected for POST
    pub body: Bytes,
}

impl RouteRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: Bytes::new(),
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Case-insensitive method comparison (`get` counts as `GET`)
    pub fn method_is(&self, name: &str) -> bool {
        self.method.as_str().eq_ignore_ascii_case(name)
    }

    /// Look up a query parameter, see [`query::query_param`]
    pub fn query_param(&self, key: &str) -> Option<String> {
        query::query_param(self.query.as_deref(), key)
    }
}
