//! Router error types.

use thiserror::Error;

/// Errors surfaced by route table construction, URL building and navigation.
///
/// Resolution itself never fails: unmatched fragments and rejecting guards fall
/// back to the not-found route instead of producing one of these.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("route table has no route for the Home screen")]
    MissingHomeRoute,

    #[error("route table has no route for the 404 screen")]
    MissingNotFoundRoute,

    #[error("home route {0:?} points at the root fragment")]
    HomeIsRoot(String),

    #[error("Route {0} not found")]
    UnknownRoute(String),

    #[error("invalid path pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid navigation target: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("resolve guard failed: {0}")]
    Guard(String),
}
