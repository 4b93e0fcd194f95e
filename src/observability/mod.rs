//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router, cache and navigator produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (resolution, cache and navigation counters)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → whatever metrics recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - Structured fields on every resolution step (fragment, route, outcome)
//! - Metrics are cheap counter increments; no recorder means no-ops
//! - Env filter overrides the configured level

pub mod logging;
pub mod metrics;
