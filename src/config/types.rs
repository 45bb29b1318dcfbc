// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

use crate::routing::Endpoint;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Seconds `stop` waits for open connections on SIGINT/SIGTERM
    pub shutdown_grace_period: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
}

/// Registered endpoints, in registration order
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RoutesConfig {
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<Endpoint>,
}

fn default_endpoints() -> Vec<Endpoint> {
    Endpoint::ALL.to_vec()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
        }
    }
}
