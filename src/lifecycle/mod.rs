//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Build RouteTable → Router → spawn Router::run
//!
//! Shutdown (shutdown.rs):
//!     trigger() → every ShutdownSignal::wait resolves → Router::run returns
//! ```

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownSignal};
