//! Route descriptors and the hooks attached to them.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};

use crate::config::RouteConfig;
use crate::error::RouterError;
use crate::routing::matcher::{Matcher, PathPattern};

/// Screen identifier of the route shown for the empty fragment.
pub const HOME_SCREEN: &str = "Home";

/// Screen identifier of the fallback route.
pub const NOT_FOUND_SCREEN: &str = "404";

/// Params merged from the query string and path captures.
pub type RouteParams = BTreeMap<String, String>;

/// Async hook that may veto activation of a matched route.
///
/// `Ok(false)` and `Err(_)` both reject; `Ok(true)` lets resolution continue.
pub type ResolveGuard = Arc<dyn Fn(RouteParams) -> BoxFuture<'static, Result<bool, RouterError>> + Send + Sync>;

/// Hook deciding where a matched route sends the user instead.
pub type RedirectHook = Arc<dyn Fn(&RouteParams) -> Redirect + Send + Sync>;

/// Result of a redirect hook.
#[derive(Debug, Clone)]
pub enum Redirect {
    /// Navigate to this path; it is normalized into a hash URL first.
    Path(String),
    /// Activate this route directly with the params of the matched one.
    Route(Arc<Route>),
}

/// A path-pattern-matched navigation target.
#[derive(Clone)]
pub struct Route {
    name: Option<String>,
    pattern: PathPattern,
    screen: String,
    params: RouteParams,
    redirect: Option<RedirectHook>,
    on_resolve: Option<ResolveGuard>,
}

impl Route {
    /// Create a route for `path` rendering `screen`.
    pub fn new(path: &str, screen: impl Into<String>) -> Result<Self, RouterError> {
        Ok(Self {
            name: None,
            pattern: PathPattern::parse(path)?,
            screen: screen.into(),
            params: RouteParams::new(),
            redirect: None,
            on_resolve: None,
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Static params declared on the route. Activation never merges them in.
    pub fn with_params(mut self, params: RouteParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_redirect<F>(mut self, redirect: F) -> Self
    where
        F: Fn(&RouteParams) -> Redirect + Send + Sync + 'static,
    {
        self.redirect = Some(Arc::new(redirect));
        self
    }

    /// Redirect to a path template, filling its placeholders from the params.
    pub fn redirect_to(self, template: &str) -> Result<Self, RouterError> {
        let target = PathPattern::parse(template)?;
        Ok(self.with_redirect(move |params| Redirect::Path(target.render(params))))
    }

    pub fn with_guard<F, Fut>(mut self, guard: F) -> Self
    where
        F: Fn(RouteParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, RouterError>> + Send + 'static,
    {
        self.on_resolve = Some(Arc::new(move |params| guard(params).boxed()));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn path(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn screen(&self) -> &str {
        &self.screen
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    pub fn is_home(&self) -> bool {
        self.screen == HOME_SCREEN
    }

    pub fn is_not_found(&self) -> bool {
        self.screen == NOT_FOUND_SCREEN
    }

    /// Name for logs: the route name, else its path.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.pattern.as_str())
    }

    /// Run the resolve guard, if any.
    pub(crate) async fn check_guard(&self, params: &RouteParams) -> Option<Result<bool, RouterError>> {
        match &self.on_resolve {
            Some(guard) => Some(guard(params.clone()).await),
            None => None,
        }
    }

    pub(crate) fn redirect(&self, params: &RouteParams) -> Option<Redirect> {
        self.redirect.as_ref().map(|redirect| redirect(params))
    }
}

impl Matcher for Route {
    fn captures(&self, path: &str) -> Option<RouteParams> {
        self.pattern.captures(path)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("path", &self.pattern.as_str())
            .field("screen", &self.screen)
            .field("params", &self.params)
            .field("redirect", &self.redirect.is_some())
            .field("on_resolve", &self.on_resolve.is_some())
            .finish()
    }
}

impl TryFrom<&RouteConfig> for Route {
    type Error = RouterError;

    fn try_from(config: &RouteConfig) -> Result<Self, Self::Error> {
        let mut route = Route::new(&config.path, config.screen.clone())?.with_params(config.params.clone());
        if let Some(name) = &config.name {
            route = route.named(name.clone());
        }
        if let Some(template) = &config.redirect {
            route = route.redirect_to(template)?;
        }
        Ok(route)
    }
}

/// A route together with the params it was activated with.
#[derive(Debug, Clone)]
pub struct ActiveRoute {
    pub route: Arc<Route>,
    pub params: RouteParams,
}

impl ActiveRoute {
    /// Attach exactly `params`. The route's declared params are not merged in.
    pub fn new(route: Arc<Route>, params: RouteParams) -> Self {
        Self { route, params }
    }

    pub fn name(&self) -> Option<&str> {
        self.route.name()
    }

    pub fn screen(&self) -> &str {
        self.route.screen()
    }
}
