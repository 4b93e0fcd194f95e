//! Configuration schema definitions.
//!
//! This module defines the route table file loaded by the router.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the router.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Document URL the hash fragment is appended to (origin + pathname).
    pub base_url: String,

    /// Resolution behavior.
    pub router: RouterSettings,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route table, in match order.
    pub routes: Vec<RouteConfig>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/".to_string(),
            router: RouterSettings::default(),
            observability: ObservabilityConfig::default(),
            routes: Vec::new(),
        }
    }
}

/// Resolution behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterSettings {
    /// Cache matched fragments for the lifetime of the router.
    pub cache_enabled: bool,

    /// Drop the activation of a resolution whose guard settled after a newer
    /// resolution had already started.
    pub discard_stale_resolutions: bool,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            discard_stale_resolutions: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// A single route table entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route name used for URL building.
    #[serde(default)]
    pub name: Option<String>,

    /// Path pattern, e.g. `/users/:id` or `/users/(?<id>[^/]+)`.
    pub path: String,

    /// Screen rendered for this route. `Home` and `404` are reserved.
    pub screen: String,

    /// Static params declared on the route. Read through `Route::params`,
    /// never merged into the params a route is activated with.
    #[serde(default)]
    pub params: BTreeMap<String, String>,

    /// Path template to redirect to, filled from the resolved params.
    #[serde(default)]
    pub redirect: Option<String>,
}
