//! Router metrics.
//!
//! # Metrics
//! - `router_resolutions_total` (counter): resolutions by outcome
//! - `router_cache_lookups_total` (counter): cache lookups by result (hit, miss)
//! - `router_navigations_total` (counter): navigations by kind (assign, replace, traverse)

/// Record a finished resolution.
pub fn record_resolution(outcome: &'static str) {
    metrics::counter!("router_resolutions_total", "outcome" => outcome).increment(1);
}

/// Record a resolution cache lookup.
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!("router_cache_lookups_total", "result" => result).increment(1);
}

/// Record a navigation issued by the router.
pub fn record_navigation(kind: &'static str) {
    metrics::counter!("router_navigations_total", "kind" => kind).increment(1);
}
