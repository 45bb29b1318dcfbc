// Application state module
// Immutable state shared by every connection task

use super::types::Config;
use crate::routing::RouteTable;

/// Application state
pub struct AppState {
    pub config: Config,
    pub routes: RouteTable,
}

impl AppState {
    /// Build the state, rejecting a route table with repeated endpoints
    pub fn new(config: Config) -> Result<Self, String> {
        let routes = RouteTable::new(&config.routes.endpoints)?;
        Ok(Self { config, routes })
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
