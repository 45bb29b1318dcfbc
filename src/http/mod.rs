//! HTTP protocol layer module
//!
//! Request/response types and the small codecs the endpoints rely on,
//! decoupled from routing and from the connection handling.

pub mod json;
pub mod query;
pub mod request;
pub mod response;

// Re-export commonly used types
pub use request::RouteRequest;
pub use response::{Reply, APPLICATION_JSON, TEXT_PLAIN_UTF8};
