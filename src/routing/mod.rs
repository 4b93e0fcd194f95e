//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigator fragment (#/users/42?tab=profile)
//!     → router.rs (root check, cache lookup)
//!     → table.rs (first matching route, declaration order)
//!     → matcher.rs (segment-by-segment capture extraction)
//!     → fragment.rs (query string → params)
//!     → guard → redirect → activate_route → subscribers
//!
//! Route Compilation (at startup):
//!     Route[] / RouteConfig[]
//!     → Tokenize path patterns
//!     → Locate Home and 404 routes
//!     → Freeze as RouteTable
//! ```
//!
//! # Design Decisions
//! - No regex: placeholders capture exactly one path segment
//! - Deterministic: same fragment always yields the same match (cached)
//! - First match wins (ordered by declaration)

pub mod cache;
pub mod fragment;
pub mod matcher;
pub mod route;
pub mod router;
pub mod table;

pub use route::{ActiveRoute, Redirect, Route, RouteParams, HOME_SCREEN, NOT_FOUND_SCREEN};
pub use router::{Resolution, Router};
pub use table::RouteTable;
