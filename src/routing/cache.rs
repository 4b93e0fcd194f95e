//! Resolution cache.
//!
//! Maps a raw fragment to the route and params it matched. Entries live as
//! long as the router; they are not invalidated when the route table changes.

use std::sync::Arc;

use dashmap::DashMap;

use crate::observability::metrics;
use crate::routing::route::{Route, RouteParams};

/// A cached match.
#[derive(Debug, Clone)]
pub struct CachedMatch {
    pub route: Arc<Route>,
    pub params: RouteParams,
}

/// A thread-safe fragment → match cache.
#[derive(Debug, Clone)]
pub struct ResolutionCache {
    inner: Arc<DashMap<String, CachedMatch>>,
    enabled: bool,
}

impl ResolutionCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            enabled,
        }
    }

    /// Look up a fragment. Always misses when the cache is disabled.
    pub fn get(&self, fragment: &str) -> Option<CachedMatch> {
        if !self.enabled {
            return None;
        }
        let hit = self.inner.get(fragment).map(|r| r.value().clone());
        metrics::record_cache_lookup(hit.is_some());
        hit
    }

    pub fn insert(&self, fragment: &str, route: Arc<Route>, params: RouteParams) {
        if self.enabled {
            self.inner.insert(fragment.to_string(), CachedMatch { route, params });
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new(true)
    }
}
