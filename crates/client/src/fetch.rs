//! Outbound HTTP fetch.
//!
//! Maps any HTTP response, whatever its status, to `Ok(Response)`; only
//! transport-level failures (offline, DNS, refused connections) surface as
//! `Err`, which the agent turns into the offline fallback. Cacheability is
//! the agent's call, not the client's.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use squirrel_core::{Error, Method, Network, Request, Response, ResponseKind};

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User agent string (default: "squirrel/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "squirrel/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20_000),
            max_redirects: 5,
        }
    }
}

/// reqwest-backed [`Network`] implementation.
pub struct HttpClient {
    http: Client,
    config: ClientConfig,
}

impl HttpClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Offline(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Patch => reqwest::Method::PATCH,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

#[async_trait]
impl Network for HttpClient {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        let start = Instant::now();
        let url = Url::parse(&request.url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {e}", request.url)))?;

        let response = self
            .http
            .request(reqwest_method(request.method), url)
            .send()
            .await
            .map_err(|e| Error::Offline(format!("network error: {e}")))?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("").to_string();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.to_string(), v.to_string())))
            .collect();

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::TooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Offline(format!("failed to read response: {e}")))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::TooLarge(format!(
                "{} bytes exceeds {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        tracing::debug!(
            url = %request.url,
            status = status.as_u16(),
            bytes = bytes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fetched"
        );

        Ok(Response {
            status: status.as_u16(),
            status_text,
            headers,
            body: bytes.to_vec(),
            kind: ResponseKind::Basic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.user_agent, "squirrel/0.1");
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(20_000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(reqwest_method(Method::Get), reqwest::Method::GET);
        assert_eq!(reqwest_method(Method::Post), reqwest::Method::POST);
    }

    #[tokio::test]
    async fn test_client_new() {
        let config = ClientConfig::default();
        let client = HttpClient::new(config);
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let client = HttpClient::new(ClientConfig::default()).unwrap();
        let result = client.fetch(&Request::get("not a url")).await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
