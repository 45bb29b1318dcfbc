//! A small HTTP server answering a fixed set of endpoints
//! (`/hello`, `/json`, `/greet`, `/receive`) from one route table.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
