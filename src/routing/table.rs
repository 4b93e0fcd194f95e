//! The ordered route table.
//!
//! # Responsibilities
//! - Store routes in declaration order
//! - Find the first route matching a fragment
//! - Look up the Home / 404 routes and routes by name
//! - Build hash URLs for named routes
//!
//! # Design Decisions
//! - Declaration order is the only tie-break (first match wins)
//! - Query params are merged first so path captures override them

use std::sync::Arc;

use crate::config::RouteConfig;
use crate::error::RouterError;
use crate::routing::fragment::{self, Fragment};
use crate::routing::matcher::Matcher;
use crate::routing::route::{Route, RouteParams};

/// An immutable, ordered list of routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Arc<Route>>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes: routes.into_iter().map(Arc::new).collect(),
        }
    }

    /// Build the table from configuration entries.
    pub fn from_config(configs: &[RouteConfig]) -> Result<Self, RouterError> {
        let routes = configs
            .iter()
            .map(Route::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(routes))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.routes.iter()
    }

    pub fn home(&self) -> Option<&Arc<Route>> {
        self.routes.iter().find(|route| route.is_home())
    }

    pub fn not_found(&self) -> Option<&Arc<Route>> {
        self.routes.iter().find(|route| route.is_not_found())
    }

    /// Look up a route by name.
    pub fn find(&self, name: &str) -> Option<&Arc<Route>> {
        self.routes.iter().find(|route| route.name() == Some(name))
    }

    /// Match a raw `#...` fragment against the table.
    pub fn match_fragment(&self, hash: &str) -> Option<(Arc<Route>, RouteParams)> {
        let fragment = Fragment::parse(hash)?;

        self.routes.iter().find_map(|route| {
            let captures = route.captures(fragment.path)?;
            let mut params = fragment.query_params();
            params.extend(captures);
            Some((route.clone(), params))
        })
    }

    /// Build the `/#/...` URL of a named route without navigating.
    pub fn url(&self, name: &str, params: &RouteParams) -> Result<String, RouterError> {
        let route = self
            .find(name)
            .ok_or_else(|| RouterError::UnknownRoute(name.to_string()))?;

        Ok(fragment::normalize(&route.pattern().render(params)))
    }
}
