//! The cache agent: install/activate lifecycle and request interception.
//!
//! The agent owns the cache-first policy: pre-cache the manifest on install,
//! drop stale generations on activate, and answer intercepted GET requests
//! from the store before touching the network. It depends only on the
//! [`Store`] and [`Network`] seams, so the policy is testable with fakes and
//! carries no host-runtime dispatch of its own.

mod writeback;

use std::sync::Arc;

use futures::future::join_all;
use url::Url;

use crate::http::{Method, Request, Response};
use crate::manifest::{self, Manifest};
use crate::net::Network;
use crate::store::Store;
use crate::Error;
use writeback::WriteTracker;

/// Outcome of intercepting one outbound request.
#[derive(Debug)]
pub enum FetchDecision {
    /// The agent answers the request with this response.
    Respond(Response),
    /// Non-GET request; the host lets it proceed by its default path.
    Passthrough,
}

/// Per-entry results of pre-caching the manifest.
#[derive(Debug)]
pub struct InstallReport {
    pub generation: String,
    /// Resolved URLs that were fetched and stored.
    pub cached: Vec<String>,
    /// Manifest entries that failed to resolve, fetch, or store.
    pub failed: Vec<(String, Error)>,
}

/// Results of pruning stale generations.
#[derive(Debug)]
pub struct ActivateReport {
    pub kept: String,
    pub deleted: Vec<String>,
    /// Generations that failed to delete. Not retried; the storage stays
    /// orphaned until the next activation.
    pub failed: Vec<(String, Error)>,
}

/// Offline-caching agent for a static asset bundle.
///
/// The host drives the lifecycle: `on_install` exactly once per deployed
/// version, `on_activate` immediately afterwards (there is no waiting window
/// between versions), then `on_fetch` for every intercepted request.
pub struct CacheAgent<S, N> {
    store: Arc<S>,
    network: Arc<N>,
    generation: String,
    origin: Url,
    manifest: Manifest,
    writes: Arc<WriteTracker>,
}

impl<S: Store, N: Network> CacheAgent<S, N> {
    pub fn new(
        store: S,
        network: N,
        generation: impl Into<String>,
        origin: Url,
        manifest: Manifest,
    ) -> Self {
        Self {
            store: Arc::new(store),
            network: Arc::new(network),
            generation: generation.into(),
            origin,
            manifest,
            writes: Arc::new(WriteTracker::default()),
        }
    }

    /// Name of the generation this agent writes to.
    pub fn generation(&self) -> &str {
        &self.generation
    }

    /// Install: open the current generation and pre-cache the manifest.
    ///
    /// Pre-caching is best-effort. A manifest entry that fails to resolve,
    /// fetch, or store is logged and reported, and install still succeeds;
    /// partial offline support beats none. Install only fails if the store
    /// cannot register the generation.
    pub async fn on_install(&self) -> Result<InstallReport, Error> {
        self.store.open(&self.generation).await?;

        let mut report = InstallReport {
            generation: self.generation.clone(),
            cached: Vec::new(),
            failed: Vec::new(),
        };

        for entry in self.manifest.iter() {
            match self.precache(entry).await {
                Ok(url) => report.cached.push(url),
                Err(err) => {
                    tracing::warn!(entry, error = %err, "manifest entry not pre-cached");
                    report.failed.push((entry.to_string(), err));
                }
            }
        }

        tracing::info!(
            generation = %self.generation,
            cached = report.cached.len(),
            failed = report.failed.len(),
            "install complete"
        );

        Ok(report)
    }

    async fn precache(&self, entry: &str) -> Result<String, Error> {
        let url = manifest::resolve(&self.origin, entry)?;
        let request = Request::get(url.as_str());
        let response = self.network.fetch(&request).await?;
        if !response.cacheable() {
            return Err(Error::NotCacheable { status: response.status });
        }
        self.store.put(&self.generation, &request, &response).await?;
        Ok(request.url)
    }

    /// Activate: delete every generation other than the current one.
    ///
    /// Deletions run concurrently. An individual failure is logged and
    /// reported but does not abort the others, and is not retried.
    pub async fn on_activate(&self) -> Result<ActivateReport, Error> {
        let names = self.store.generations().await?;
        let stale: Vec<String> = names.into_iter().filter(|name| *name != self.generation).collect();

        let results = join_all(stale.iter().map(|name| self.store.delete(name))).await;

        let mut report = ActivateReport {
            kept: self.generation.clone(),
            deleted: Vec::new(),
            failed: Vec::new(),
        };

        for (name, result) in stale.into_iter().zip(results) {
            match result {
                Ok(_) => {
                    tracing::debug!(generation = %name, "stale generation deleted");
                    report.deleted.push(name);
                }
                Err(err) => {
                    tracing::warn!(generation = %name, error = %err, "stale generation left behind");
                    report.failed.push((name, err));
                }
            }
        }

        Ok(report)
    }

    /// Intercept one outbound request.
    ///
    /// Only GET is intercepted. A cache hit is served unconditionally with no
    /// staleness check. A miss falls back to the network; a clean 200 is
    /// duplicated and written back without blocking the caller, anything else
    /// is returned as-is uncached. Transport failure with no cache hit
    /// synthesizes the offline fallback — the interceptor never fails.
    pub async fn on_fetch(&self, request: &Request) -> FetchDecision {
        if request.method != Method::Get {
            return FetchDecision::Passthrough;
        }

        match self.store.lookup(request).await {
            Ok(Some(stored)) => {
                tracing::debug!(url = %request.url, "cache hit");
                return FetchDecision::Respond(stored);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(url = %request.url, error = %err, "store lookup failed, treating as miss");
            }
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.cacheable() {
                    // The stored copy must be an independent duplicate of the
                    // one delivered to the caller.
                    let copy = response.duplicate();
                    self.spawn_write_back(request.clone(), copy);
                }
                FetchDecision::Respond(response)
            }
            Err(err) => {
                tracing::warn!(url = %request.url, error = %err, "network unavailable, serving offline fallback");
                FetchDecision::Respond(Response::offline_fallback())
            }
        }
    }

    fn spawn_write_back(&self, request: Request, response: Response) {
        let store = Arc::clone(&self.store);
        let generation = self.generation.clone();
        let guard = self.writes.begin();

        tokio::spawn(async move {
            let _guard = guard;
            match store.put(&generation, &request, &response).await {
                Ok(()) => tracing::debug!(url = %request.url, "write-back complete"),
                Err(err) => tracing::warn!(url = %request.url, error = %err, "write-back failed"),
            }
        });
    }

    /// Wait for all in-flight write-backs to settle.
    ///
    /// Intended for tests and for hosts that must not exit with writes
    /// pending.
    pub async fn drain_writes(&self) {
        self.writes.drain().await;
    }
}
