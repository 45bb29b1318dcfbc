//! Routing module
//!
//! Maps a request path to one of the fixed endpoints:
//! - `Endpoint` - tagged variant over the route behaviors
//! - `RouteTable` - exact-path lookup over the registered endpoints

mod endpoint;
mod table;

pub use endpoint::Endpoint;
pub use table::RouteTable;
