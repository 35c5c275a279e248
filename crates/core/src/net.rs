//! Network seam consumed by the agent.

use async_trait::async_trait;

use crate::http::{Request, Response};
use crate::Error;

/// Outbound network access.
///
/// Transport failures (offline, DNS, refused connections) surface as `Err`;
/// any HTTP response, including 4xx/5xx, is `Ok`. The agent decides what is
/// cacheable.
#[async_trait]
pub trait Network: Send + Sync + 'static {
    async fn fetch(&self, request: &Request) -> Result<Response, Error>;
}
