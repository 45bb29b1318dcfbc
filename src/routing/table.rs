//! Route table
//!
//! Exact-path lookup over the registered endpoints.

use super::Endpoint;
use crate::http::{Reply, RouteRequest};

/// Registered endpoints in registration order
#[derive(Debug, Clone)]
pub struct RouteTable {
    endpoints: Vec<Endpoint>,
}

impl RouteTable {
    /// Build a table; each endpoint may be registered once
    pub fn new(endpoints: &[Endpoint]) -> Result<Self, String> {
        let mut registered: Vec<Endpoint> = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            if registered.contains(endpoint) {
                return Err(format!(
                    "Endpoint '{}' registered more than once",
                    endpoint.path()
                ));
            }
            registered.push(*endpoint);
        }
        Ok(Self {
            endpoints: registered,
        })
    }

    /// Find the endpoint registered for exactly this path
    pub fn find(&self, path: &str) -> Option<Endpoint> {
        self.endpoints
            .iter()
            .copied()
            .find(|endpoint| endpoint.path() == path)
    }

    /// Run the matching endpoint, `None` when the path is not registered
    pub fn dispatch(&self, req: &RouteRequest) -> Option<Reply> {
        self.find(&req.path).map(|endpoint| endpoint.handle(req))
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::{Method, StatusCode};

    #[test]
    fn test_exact_match_only() {
        let table = RouteTable::new(&Endpoint::ALL).unwrap();
        assert_eq!(table.find("/hello"), Some(Endpoint::Hello));
        assert_eq!(table.find("/receive"), Some(Endpoint::Receive));
        assert_eq!(table.find("/hello/"), None);
        assert_eq!(table.find("/hello/world"), None);
        assert_eq!(table.find("/HELLO"), None);
        assert_eq!(table.find("/"), None);
    }

    #[test]
    fn test_unregistered_endpoint_is_not_found() {
        let table = RouteTable::new(&[Endpoint::Hello]).unwrap();
        let req = RouteRequest::new(Method::GET, "/json");
        assert!(table.dispatch(&req).is_none());

        let req = RouteRequest::new(Method::GET, "/hello");
        assert_eq!(table.dispatch(&req).unwrap().status, StatusCode::OK);
    }

    #[test]
    fn test_duplicate_endpoint_rejected() {
        let err = RouteTable::new(&[Endpoint::Greet, Endpoint::Hello, Endpoint::Greet]).unwrap_err();
        assert!(err.contains("/greet"));
    }

    #[test]
    fn test_registration_order_kept() {
        let table = RouteTable::new(&[Endpoint::Receive, Endpoint::Hello]).unwrap();
        assert_eq!(table.endpoints(), &[Endpoint::Receive, Endpoint::Hello]);
    }
}
