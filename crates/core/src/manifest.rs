//! Asset manifest: the fixed list of URLs pre-cached at install time.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::Error;

/// Must-have offline assets for the hosted static bundle.
///
/// Relative entries are resolved against the configured origin; the
/// stylesheet is cross-origin and cached as-is.
pub const DEFAULT_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/emojis.json",
    "/manifest.json",
    "/sw.js",
    "https://fonts.googleapis.com/css2?family=Noto+Color+Emoji&display=swap",
];

/// Ordered list of URLs (absolute or relative) to pre-cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(Vec<String>);

impl Manifest {
    pub fn new(urls: Vec<String>) -> Self {
        Self(urls)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self(DEFAULT_ASSETS.iter().map(|s| s.to_string()).collect())
    }
}

/// Resolve a manifest entry against the deployment origin.
///
/// Absolute entries pass through unchanged; relative entries are joined to
/// the origin.
pub fn resolve(origin: &Url, entry: &str) -> Result<Url, Error> {
    origin.join(entry).map_err(|e| Error::InvalidUrl(format!("{entry}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest_entries() {
        let manifest = Manifest::default();
        assert_eq!(manifest.len(), 6);
        assert_eq!(manifest.iter().next(), Some("/"));
        assert!(manifest.iter().any(|entry| entry.starts_with("https://")));
    }

    #[test]
    fn test_resolve_relative() {
        let origin = Url::parse("https://emoji.example").unwrap();
        let resolved = resolve(&origin, "/emojis.json").unwrap();
        assert_eq!(resolved.as_str(), "https://emoji.example/emojis.json");
    }

    #[test]
    fn test_resolve_absolute_passes_through() {
        let origin = Url::parse("https://emoji.example").unwrap();
        let resolved = resolve(&origin, "https://cdn.example/style.css").unwrap();
        assert_eq!(resolved.as_str(), "https://cdn.example/style.css");
    }
}
