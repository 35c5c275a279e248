//! Request/response model shared by the store, network, and agent.
//!
//! Responses are single-consumption values: [`Response`] deliberately does
//! not implement `Clone`. Any path that both returns a response and stores it
//! must call [`Response::duplicate`] first, so the dual consumption is
//! explicit at the call site.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP method of an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
    Options,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
        }
    }

    /// Parse a method name, case-insensitively.
    pub fn parse(s: &str) -> Option<Method> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "HEAD" => Some(Method::Head),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "DELETE" => Some(Method::Delete),
            "PATCH" => Some(Method::Patch),
            "OPTIONS" => Some(Method::Options),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An intercepted outbound request. Transient; never persisted itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Request {
    pub method: Method,
    pub url: String,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into() }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }
}

/// Platform classification of a response.
///
/// Only `Basic` responses are eligible for caching; `Opaque` covers
/// cross-origin responses the platform cannot safely inspect, and `Error`
/// covers network-level error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseKind {
    Basic,
    Opaque,
    Error,
}

impl ResponseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseKind::Basic => "basic",
            ResponseKind::Opaque => "opaque",
            ResponseKind::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<ResponseKind> {
        match s {
            "basic" => Some(ResponseKind::Basic),
            "opaque" => Some(ResponseKind::Opaque),
            "error" => Some(ResponseKind::Error),
            _ => None,
        }
    }
}

/// A fetched or stored HTTP response: status, headers, and body.
#[derive(Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub kind: ResponseKind,
}

impl Response {
    /// Whether this response may enter the cache store.
    ///
    /// Only clean 200 responses qualify; redirects, client/server errors, and
    /// opaque/error-type responses are excluded.
    pub fn cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }

    /// Produce an independent copy for dual consumption (store + caller).
    pub fn duplicate(&self) -> Response {
        Response {
            status: self.status,
            status_text: self.status_text.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            kind: self.kind,
        }
    }

    /// First header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The synthesized response served when the network is unreachable and
    /// the store has no match.
    pub fn offline_fallback() -> Response {
        let body = serde_json::json!({
            "error": "offline",
            "message": "You are offline. Please check your internet connection.",
        });

        Response {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: body.to_string().into_bytes(),
            kind: ResponseKind::Basic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!(Method::parse("get"), Some(Method::Get));
        assert_eq!(Method::parse("POST"), Some(Method::Post));
        assert_eq!(Method::parse("TRACE"), None);
    }

    #[test]
    fn test_cacheable_requires_clean_200() {
        let ok = Response {
            status: 200,
            status_text: "OK".to_string(),
            headers: vec![],
            body: b"hello".to_vec(),
            kind: ResponseKind::Basic,
        };
        assert!(ok.cacheable());

        let not_found = Response { status: 404, status_text: "Not Found".to_string(), ..ok.duplicate() };
        assert!(!not_found.cacheable());

        let opaque = Response { kind: ResponseKind::Opaque, ..ok.duplicate() };
        assert!(!opaque.cacheable());
    }

    #[test]
    fn test_duplicate_is_independent() {
        let original = Response {
            status: 200,
            status_text: "OK".to_string(),
            headers: vec![("X-Test".to_string(), "1".to_string())],
            body: b"body".to_vec(),
            kind: ResponseKind::Basic,
        };

        let mut copy = original.duplicate();
        copy.body.clear();
        assert_eq!(original.body, b"body");
    }

    #[test]
    fn test_offline_fallback_contract() {
        let fallback = Response::offline_fallback();
        assert_eq!(fallback.status, 503);
        assert_eq!(fallback.status_text, "Service Unavailable");
        assert_eq!(fallback.header("content-type"), Some("application/json"));
        assert_eq!(
            String::from_utf8(fallback.body).unwrap(),
            r#"{"error":"offline","message":"You are offline. Please check your internet connection."}"#
        );
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let response = Response::offline_fallback();
        assert_eq!(response.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(response.header("etag"), None);
    }
}
