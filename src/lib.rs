//! Hash-based client-side router library

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod navigation;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use error::RouterError;
pub use lifecycle::Shutdown;
pub use navigation::{MemoryNavigator, NavigationEvent, Navigator};
pub use routing::{ActiveRoute, Redirect, Resolution, Route, RouteParams, RouteTable, Router};
