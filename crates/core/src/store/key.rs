//! Content-addressed entry key generation.

use sha2::{Digest, Sha256};

use crate::http::Request;

/// Compute the entry key for a request identity (method + URL).
pub fn entry_key(request: &Request) -> String {
    let mut hasher = Sha256::new();
    hasher.update(request.method.as_str().as_bytes());
    hasher.update(b"\n");
    hasher.update(request.url.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, Request};

    #[test]
    fn test_key_stability() {
        let key1 = entry_key(&Request::get("https://example.com/"));
        let key2 = entry_key(&Request::get("https://example.com/"));
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_key_method_sensitive() {
        let get = entry_key(&Request::get("https://example.com/"));
        let head = entry_key(&Request::new(Method::Head, "https://example.com/"));
        assert_ne!(get, head);
    }

    #[test]
    fn test_key_url_sensitive() {
        let a = entry_key(&Request::get("https://example.com/a"));
        let b = entry_key(&Request::get("https://example.com/b"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_format() {
        let key = entry_key(&Request::get("https://example.com/"));
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
