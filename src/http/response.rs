//! HTTP response building module
//!
//! Endpoints produce a [`Reply`]; the connection layer encodes it with hyper.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::json;

pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=UTF-8";
pub const APPLICATION_JSON: &str = "application/json";

const METHOD_NOT_ALLOWED_BODY: &str = r#"{"error": "Method Not Allowed"}"#;
const INTERNAL_ERROR_BODY: &str = r#"{"error": "Internal Server Error"}"#;

/// Status, content type and body of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Bytes,
    /// Value of the `Allow` header on 405 replies
    pub allow: Option<&'static str>,
}

impl Reply {
    pub fn new(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
            allow: None,
        }
    }

    pub fn text(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::new(status, TEXT_PLAIN_UTF8, body)
    }

    /// Serialize `body` as single-line JSON; a serialization failure becomes a 500
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Self {
        match json::to_spaced_vec(body) {
            Ok(bytes) => Self::new(status, APPLICATION_JSON, bytes),
            Err(e) => {
                crate::logger::log_error(&format!("Failed to serialize response: {e}"));
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    APPLICATION_JSON,
                    INTERNAL_ERROR_BODY,
                )
            }
        }
    }

    /// 405 Method Not Allowed with the fixed JSON error body
    pub fn method_not_allowed(allow: &'static str) -> Self {
        Self {
            allow: Some(allow),
            ..Self::new(
                StatusCode::METHOD_NOT_ALLOWED,
                APPLICATION_JSON,
                METHOD_NOT_ALLOWED_BODY,
            )
        }
    }

    /// 404 Not Found for unregistered paths
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "text/plain", "404 Not Found")
    }

    /// 400 Bad Request, used when the request body cannot be read
    pub fn bad_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "text/plain", "400 Bad Request")
    }

    /// 413 Payload Too Large
    pub fn payload_too_large() -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "text/plain",
            "413 Payload Too Large",
        )
    }

    /// Encode as a hyper response
    pub fn into_response(self, server_name: &str) -> Response<Full<Bytes>> {
        let status = self.status;
        let mut builder = Response::builder()
            .status(status)
            .header("Content-Type", self.content_type)
            .header("Server", server_name);
        if let Some(allow) = self.allow {
            builder = builder.header("Allow", allow);
        }

        builder.body(Full::new(self.body)).unwrap_or_else(|e| {
            log_build_error(status, &e);
            let mut fallback = Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!(
        "Failed to build {} response: {error}",
        status.as_u16()
    ));
}
