//! Durable cache store keyed by request identity, partitioned by generation.
//!
//! A generation is a named snapshot of the store tied to one deployed version
//! of the agent. The SQLite implementation uses tokio-rusqlite with WAL mode,
//! automatic schema migrations, and content-addressed entry keys.

pub mod connection;
pub mod entries;
pub mod key;
pub mod migrations;

use async_trait::async_trait;

use crate::http::{Request, Response};
use crate::Error;

pub use connection::CacheDb;

/// Durable store seam consumed by the agent.
///
/// Individual operations are atomic; concurrent writes to the same key
/// overwrite each other (last write wins). No further transactional
/// guarantees are offered.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Register a generation, creating it if absent.
    async fn open(&self, generation: &str) -> Result<(), Error>;

    /// Upsert a response under the request identity within a generation.
    async fn put(&self, generation: &str, request: &Request, response: &Response) -> Result<(), Error>;

    /// Search all generations by request identity. The generation is not part
    /// of the caller-visible key; the first match in generation-creation
    /// order wins.
    async fn lookup(&self, request: &Request) -> Result<Option<Response>, Error>;

    /// Enumerate generation names in creation order.
    async fn generations(&self) -> Result<Vec<String>, Error>;

    /// Drop a generation and all of its entries. Returns whether it existed.
    async fn delete(&self, generation: &str) -> Result<bool, Error>;
}
