//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! Router::go / resolve (home redirect)
//!     → Navigator::assign / replace (location)
//!     → Navigator::go (history traversal)
//!     → popstate event broadcast
//!     → Router::run re-enters resolve()
//! ```
//!
//! # Design Decisions
//! - The platform location/history is reached only through the `Navigator` trait
//! - Popstate and reload are the only events a navigator emits
//! - `MemoryNavigator` keeps its own history stack for tests and the CLI

pub mod memory;

use tokio::sync::broadcast;

use crate::error::RouterError;

pub use memory::MemoryNavigator;

/// An event a navigator delivers to the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    /// The fragment changed through navigation or history traversal.
    PopState,
    /// The document was reloaded.
    Reload,
}

/// Browser location and history.
pub trait Navigator: Send + Sync + std::fmt::Debug {
    /// Current fragment including `#`, or empty when there is none.
    fn hash(&self) -> String;

    /// Full current URL.
    fn href(&self) -> String;

    /// Scheme, host and port of the current URL.
    fn origin(&self) -> String;

    /// Path of the current document.
    fn pathname(&self) -> String;

    /// Navigate to `href`, pushing a history entry.
    fn assign(&self, href: &str) -> Result<(), RouterError>;

    /// Navigate to `href`, replacing the current history entry.
    fn replace(&self, href: &str) -> Result<(), RouterError>;

    /// Move `delta` entries through history.
    fn go(&self, delta: i32);

    /// Reload the current document.
    fn reload(&self);

    /// Subscribe to navigation events.
    fn subscribe(&self) -> broadcast::Receiver<NavigationEvent>;
}
