// Configuration module entry point
// Loads layered configuration and builds the shared application state

mod state;
mod types;

use std::net::SocketAddr;
use std::time::Duration;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, RoutesConfig, ServerConfig};

/// Prefix for environment overrides, e.g. `SIMPLE_HTTP_SERVER__PORT=9000`
const ENV_PREFIX: &str = "SIMPLE_HTTP";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Missing files are fine; environment variables override the file
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        defaults()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    /// Built-in defaults only, no file and no environment
    pub fn with_defaults() -> Result<Self, ConfigError> {
        defaults()?.build()?.try_deserialize::<Self>()?.validated()
    }

    /// Reject values that deserialize fine but cannot be used
    fn validated(self) -> Result<Self, ConfigError> {
        if self.server.workers == Some(0) {
            return Err(ConfigError::Message(
                "server.workers must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    pub const fn shutdown_grace_period(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_grace_period)
    }

    /// Idle limit between requests on one connection, `None` disables keep-alive
    pub fn keep_alive_timeout(&self) -> Option<Duration> {
        match self.performance.keep_alive_timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Upper bound for a single connection, read and write alike
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(std::cmp::max(
            self.performance.read_timeout,
            self.performance.write_timeout,
        ))
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("server.shutdown_grace_period", 5)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "combined")?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("http.server_name", "simple-http-server")?
        .set_default("http.max_body_size", 10_485_760) // 10MB
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Endpoint;

    #[test]
    fn test_defaults() {
        let cfg = Config::with_defaults().unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.shutdown_grace_period(), Duration::from_secs(5));
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert_eq!(cfg.performance.max_connections, None);
        assert_eq!(cfg.routes.endpoints, Endpoint::ALL.to_vec());
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::with_defaults().unwrap();
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "0.0.0.0:8000".parse::<SocketAddr>().unwrap()
        );

        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }

    #[test]
    fn test_connection_timeout_uses_larger_value() {
        let mut cfg = Config::with_defaults().unwrap();
        cfg.performance.read_timeout = 10;
        cfg.performance.write_timeout = 45;
        assert_eq!(cfg.connection_timeout(), Duration::from_secs(45));
    }

    #[test]
    fn test_keep_alive_timeout() {
        let mut cfg = Config::with_defaults().unwrap();
        assert_eq!(cfg.keep_alive_timeout(), Some(Duration::from_secs(75)));
        cfg.performance.keep_alive_timeout = 0;
        assert_eq!(cfg.keep_alive_timeout(), None);
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("simple-http-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("server.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9123

[routes]
endpoints = ["hello", "json"]
"#,
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9123);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.routes.endpoints, vec![Endpoint::Hello, Endpoint::Json]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_zero_workers_is_rejected() {
        let dir = std::env::temp_dir().join(format!("simple-http-workers-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("workers.toml");
        std::fs::write(&path, "[server]\nworkers = 0\n").unwrap();

        let err = Config::load_from(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("server.workers"));

        std::fs::write(&path, "[server]\nworkers = 2\n").unwrap();
        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.workers, Some(2));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_env_overrides_file_and_defaults() {
        let dir = std::env::temp_dir().join(format!("simple-http-env-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("env.toml");
        std::fs::write(&path, "[http]\nserver_name = \"from-file\"\n").unwrap();

        // Keys no other test asserts on, since the environment is process-wide
        std::env::set_var("SIMPLE_HTTP_HTTP__SERVER_NAME", "from-env");
        std::env::set_var("SIMPLE_HTTP_PERFORMANCE__MAX_CONNECTIONS", "7");
        let loaded = Config::load_from(path.to_str().unwrap());
        std::env::remove_var("SIMPLE_HTTP_HTTP__SERVER_NAME");
        std::env::remove_var("SIMPLE_HTTP_PERFORMANCE__MAX_CONNECTIONS");

        let cfg = loaded.unwrap();
        assert_eq!(cfg.http.server_name, "from-env");
        assert_eq!(cfg.performance.max_connections, Some(7));
        assert_eq!(cfg.server.port, 8000);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_endpoint_is_rejected() {
        let dir = std::env::temp_dir().join(format!("simple-http-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "[routes]\nendpoints = [\"hello\", \"upload\"]\n").unwrap();

        assert!(Config::load_from(path.to_str().unwrap()).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
