//! Route resolution and the current-route slot.
//!
//! # Responsibilities
//! - Resolve the navigator's fragment into an active route
//! - Run resolve guards and redirects in order
//! - Hold the current route and notify subscribers on change
//! - Build and navigate to hash URLs
//!
//! # Design Decisions
//! - `activate_route` is the only writer of the current-route slot
//! - Resolution never fails; anything unresolvable lands on the 404 route
//! - Home and 404 routes are captured at construction and survive table swaps
//! - Change handlers are spawned independently, in registration order

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use futures_util::future::{BoxFuture, FutureExt};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::config::RouterSettings;
use crate::error::RouterError;
use crate::lifecycle::ShutdownSignal;
use crate::navigation::{NavigationEvent, Navigator};
use crate::observability::metrics;
use crate::routing::cache::ResolutionCache;
use crate::routing::fragment;
use crate::routing::route::{ActiveRoute, Redirect, Route, RouteParams};
use crate::routing::table::RouteTable;

/// Callback fired with the new and previous active routes.
pub type RouteChangedHandler =
    Arc<dyn Fn(Arc<ActiveRoute>, Arc<ActiveRoute>) -> BoxFuture<'static, ()> + Send + Sync>;

/// What a call to [`Router::resolve`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    /// The fragment was empty; the location was replaced with the home route.
    Home { to: String },
    /// Nothing matched.
    NotFound,
    /// A guard rejected the matched route.
    Denied { route: String },
    /// A redirect hook sent the location elsewhere.
    Redirected { to: String },
    /// A route was activated.
    Activated {
        screen: String,
        name: Option<String>,
        params: RouteParams,
    },
    /// A newer resolution started while this one awaited its guard.
    Superseded,
}

impl Resolution {
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Home { .. } => "home",
            Resolution::NotFound => "not_found",
            Resolution::Denied { .. } => "denied",
            Resolution::Redirected { .. } => "redirected",
            Resolution::Activated { .. } => "activated",
            Resolution::Superseded => "superseded",
        }
    }

    fn activated(active: &ActiveRoute) -> Self {
        Resolution::Activated {
            screen: active.screen().to_string(),
            name: active.name().map(str::to_string),
            params: active.params.clone(),
        }
    }
}

/// Hash-based router.
pub struct Router {
    table: ArcSwap<RouteTable>,
    home: Arc<Route>,
    not_found: Arc<Route>,
    cache: ResolutionCache,
    current: watch::Sender<Arc<ActiveRoute>>,
    handlers: ArcSwap<Vec<RouteChangedHandler>>,
    navigator: Arc<dyn Navigator>,
    sequence: AtomicU64,
    discard_stale: bool,
}

impl Router {
    /// Create a router with default settings.
    pub fn new(table: RouteTable, navigator: Arc<dyn Navigator>) -> Result<Self, RouterError> {
        Self::with_settings(table, navigator, &RouterSettings::default())
    }

    /// Create a router. Fails when the table has no Home or no 404 route,
    /// or when the Home route sits at the root fragment.
    pub fn with_settings(
        table: RouteTable,
        navigator: Arc<dyn Navigator>,
        settings: &RouterSettings,
    ) -> Result<Self, RouterError> {
        let home = table.home().cloned().ok_or(RouterError::MissingHomeRoute)?;
        if home.pattern().is_root() {
            return Err(RouterError::HomeIsRoot(home.path().to_string()));
        }
        let not_found = table.not_found().cloned().ok_or(RouterError::MissingNotFoundRoute)?;

        let (current, _) = watch::channel(Arc::new(ActiveRoute::new(home.clone(), RouteParams::new())));

        tracing::debug!(
            routes = table.len(),
            home = %home.path(),
            not_found = %not_found.path(),
            cache_enabled = settings.cache_enabled,
            "Router initialized"
        );

        Ok(Self {
            table: ArcSwap::from_pointee(table),
            home,
            not_found,
            cache: ResolutionCache::new(settings.cache_enabled),
            current,
            handlers: ArcSwap::from_pointee(Vec::new()),
            navigator,
            sequence: AtomicU64::new(0),
            discard_stale: settings.discard_stale_resolutions,
        })
    }

    /// The active route.
    pub fn current(&self) -> Arc<ActiveRoute> {
        self.current.borrow().clone()
    }

    /// Watch the active route.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ActiveRoute>> {
        self.current.subscribe()
    }

    pub fn home_route(&self) -> &Arc<Route> {
        &self.home
    }

    pub fn not_found_route(&self) -> &Arc<Route> {
        &self.not_found
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Number of cached fragment matches.
    pub fn cached_fragments(&self) -> usize {
        self.cache.len()
    }

    /// Swap the route table used for matching and URL building.
    ///
    /// Cached matches are kept, so fragments seen before keep resolving to
    /// the routes they matched in the previous table.
    pub fn replace_table(&self, table: RouteTable) {
        tracing::info!(routes = table.len(), "Route table replaced");
        self.table.store(Arc::new(table));
    }

    /// Register a callback fired on every change of the active route.
    pub fn on_route_changed<F, Fut>(&self, handler: F) -> usize
    where
        F: Fn(Arc<ActiveRoute>, Arc<ActiveRoute>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: RouteChangedHandler = Arc::new(move |new, old| handler(new, old).boxed());
        let previous = self.handlers.rcu(|handlers| {
            let mut next = (**handlers).clone();
            next.push(handler.clone());
            next
        });
        previous.len() + 1
    }

    /// Resolve the navigator's current fragment.
    pub async fn resolve(&self) -> Resolution {
        let hash = self.navigator.hash();
        let resolution = self.resolve_fragment(&hash).await;

        tracing::debug!(fragment = %hash, outcome = resolution.label(), "Resolved");
        metrics::record_resolution(resolution.label());
        resolution
    }

    async fn resolve_fragment(&self, hash: &str) -> Resolution {
        let token = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        if fragment::is_root(hash) {
            return self.go_home();
        }

        let Some((route, params)) = self.try_match_route(hash) else {
            tracing::debug!(fragment = %hash, "No route matched");
            self.trigger_not_found();
            return Resolution::NotFound;
        };

        if let Some(verdict) = route.check_guard(&params).await {
            let allowed = verdict.unwrap_or_else(|e| {
                tracing::warn!(route = %route.label(), error = %e, "Resolve guard failed");
                false
            });

            if self.is_stale(token) {
                tracing::debug!(route = %route.label(), "Resolution superseded while guard was pending");
                return Resolution::Superseded;
            }

            if !allowed {
                tracing::info!(route = %route.label(), "Resolve guard rejected route");
                self.trigger_not_found();
                return Resolution::Denied {
                    route: route.label().to_string(),
                };
            }
        }

        match route.redirect(&params) {
            Some(Redirect::Path(path)) => match self.go(&path, false) {
                Ok(()) => Resolution::Redirected {
                    to: fragment::to_fragment(&path),
                },
                Err(e) => {
                    tracing::warn!(route = %route.label(), to = %path, error = %e, "Redirect failed");
                    self.trigger_not_found();
                    Resolution::NotFound
                }
            },
            Some(Redirect::Route(target)) => {
                tracing::debug!(from = %route.label(), to = %target.label(), "Redirecting to route");
                Resolution::activated(&self.activate_route(target, params))
            }
            None => Resolution::activated(&self.activate_route(route, params)),
        }
    }

    fn go_home(&self) -> Resolution {
        let to = fragment::to_fragment(self.home.path());
        let href = format!("{}{}{}", self.navigator.origin(), self.navigator.pathname(), to);

        tracing::debug!(to = %to, "Empty fragment, replacing with home route");
        metrics::record_navigation("replace");
        if let Err(e) = self.navigator.replace(&href) {
            tracing::warn!(href = %href, error = %e, "Failed to navigate home");
            self.activate_route(self.home.clone(), RouteParams::new());
        }
        Resolution::Home { to }
    }

    fn is_stale(&self, token: u64) -> bool {
        self.discard_stale && self.sequence.load(Ordering::SeqCst) != token
    }

    fn try_match_route(&self, hash: &str) -> Option<(Arc<Route>, RouteParams)> {
        if let Some(hit) = self.cache.get(hash) {
            tracing::trace!(fragment = %hash, route = %hit.route.label(), "Resolution cache hit");
            return Some((hit.route, hit.params));
        }

        let (route, params) = self.table.load().match_fragment(hash)?;
        tracing::debug!(fragment = %hash, route = %route.label(), "Matched route");
        self.cache.insert(hash, route.clone(), params.clone());
        Some((route, params))
    }

    /// Make `route` the active route. The only writer of the slot.
    pub fn activate_route(&self, route: Arc<Route>, params: RouteParams) -> Arc<ActiveRoute> {
        let active = Arc::new(ActiveRoute::new(route, params));
        let previous = self.current.send_replace(active.clone());

        tracing::info!(
            screen = %active.screen(),
            route = %active.route.label(),
            params = ?active.params,
            "Route activated"
        );

        let handlers = self.handlers.load();
        if !handlers.is_empty() {
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    for handler in handlers.iter() {
                        runtime.spawn(handler(active.clone(), previous.clone()));
                    }
                }
                Err(_) => tracing::warn!(
                    handlers = handlers.len(),
                    "No async runtime, route change handlers skipped"
                ),
            }
        }

        active
    }

    /// Activate the 404 route with empty params.
    pub fn trigger_not_found(&self) -> Arc<ActiveRoute> {
        self.activate_route(self.not_found.clone(), RouteParams::new())
    }

    /// Navigate to `path`, normalized into a hash URL.
    ///
    /// With `reload`, the document is reloaded after navigating.
    pub fn go(&self, path: &str, reload: bool) -> Result<(), RouterError> {
        let to = fragment::to_fragment(path);
        let href = format!("{}{}{}", self.navigator.origin(), self.navigator.pathname(), to);

        metrics::record_navigation("assign");
        self.navigator.assign(&href)?;
        if reload {
            self.navigator.reload();
        }
        Ok(())
    }

    /// Move `delta` entries through history.
    pub fn go_by(&self, delta: i32) {
        metrics::record_navigation("traverse");
        self.navigator.go(delta);
    }

    /// Build the `/#/...` URL of a named route.
    pub fn url(&self, name: &str, params: &RouteParams) -> Result<String, RouterError> {
        self.table.load().url(name, params)
    }

    /// Resolve the initial location, then re-resolve on every navigation
    /// event until shutdown.
    ///
    /// Each resolution runs as its own task, so a pending guard never holds
    /// up later navigation or shutdown. Unfinished resolutions are aborted
    /// when the loop exits.
    pub async fn run(self: Arc<Self>, mut shutdown: ShutdownSignal) {
        let mut events = self.navigator.subscribe();
        let mut resolutions = JoinSet::new();

        tracing::info!(href = %self.navigator.href(), "Router listening for navigation");
        self.spawn_resolve(&mut resolutions);

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(NavigationEvent::PopState) => self.spawn_resolve(&mut resolutions),
                    Ok(NavigationEvent::Reload) => {
                        tracing::info!("Document reloaded, resolving from scratch");
                        self.spawn_resolve(&mut resolutions);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Missed navigation events, resolving current location");
                        self.spawn_resolve(&mut resolutions);
                    }
                    Err(RecvError::Closed) => break,
                },
                Some(joined) = resolutions.join_next(), if !resolutions.is_empty() => {
                    if let Err(e) = joined {
                        tracing::error!(error = %e, "Resolution task failed");
                    }
                }
                _ = shutdown.wait() => {
                    tracing::info!(pending = resolutions.len(), "Router received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        resolutions.shutdown().await;
    }

    fn spawn_resolve(self: &Arc<Self>, resolutions: &mut JoinSet<Resolution>) {
        let router = self.clone();
        resolutions.spawn(async move { router.resolve().await });
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table.load().len())
            .field("current", &self.current().route.label())
            .field("cached", &self.cache.len())
            .finish()
    }
}
