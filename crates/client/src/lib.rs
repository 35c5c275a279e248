//! HTTP client for squirrel.
//!
//! This crate provides the reqwest-backed implementation of the core's
//! network seam, used by the host adapter for manifest pre-caching and
//! cache-miss fallback.

pub mod fetch;

pub use fetch::{ClientConfig, HttpClient};
