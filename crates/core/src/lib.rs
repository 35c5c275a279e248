//! Core types and policy for squirrel.
//!
//! This crate provides:
//! - The cache-first `CacheAgent` (install/activate/fetch lifecycle)
//! - Store and network seams, with a SQLite store implementation
//! - Unified error types
//! - Configuration structures

pub mod agent;
pub mod config;
pub mod error;
pub mod http;
pub mod manifest;
pub mod net;
pub mod store;

pub use agent::{ActivateReport, CacheAgent, FetchDecision, InstallReport};
pub use config::AppConfig;
pub use error::Error;
pub use http::{Method, Request, Response, ResponseKind};
pub use manifest::Manifest;
pub use net::Network;
pub use store::{CacheDb, Store};
