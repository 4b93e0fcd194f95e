//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! route table file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → RouteTable::from_config → Router
//! ```
//!
//! # Design Decisions
//! - All fields except the routes themselves have defaults
//! - Validation separates syntactic (serde) from semantic checks
//! - Guards and closure redirects are code-only; files carry path templates

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::RouteConfig;
pub use schema::RouterConfig;
pub use schema::RouterSettings;
