//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Require exactly one Home and one 404 route
//! - Reject duplicate route names and malformed path patterns
//! - Check redirect templates only reference captures of their route
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::matcher::PathPattern;
use crate::routing::route::{HOME_SCREEN, NOT_FOUND_SCREEN};

/// A single semantic problem in a route table file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no route renders the {0} screen")]
    MissingScreen(&'static str),

    #[error("{count} routes render the {screen} screen, expected one")]
    DuplicateScreen { screen: &'static str, count: usize },

    #[error("route name {0:?} is used more than once")]
    DuplicateName(String),

    #[error("route {path:?}: {reason}")]
    InvalidPattern { path: String, reason: String },

    #[error("home route {0:?} points at the root fragment")]
    HomeIsRoot(String),

    #[error("route {path:?} redirects with unknown param {param:?}")]
    UnknownRedirectParam { path: String, param: String },

    #[error("invalid base_url {0:?}")]
    InvalidBaseUrl(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if url::Url::parse(&config.base_url).is_err() {
        errors.push(ValidationError::InvalidBaseUrl(config.base_url.clone()));
    }

    for screen in [HOME_SCREEN, NOT_FOUND_SCREEN] {
        match config.routes.iter().filter(|r| r.screen == screen).count() {
            0 => errors.push(ValidationError::MissingScreen(screen)),
            1 => {}
            count => errors.push(ValidationError::DuplicateScreen { screen, count }),
        }
    }

    let mut names = HashSet::new();
    for route in &config.routes {
        if let Some(name) = &route.name {
            if !names.insert(name.as_str()) {
                errors.push(ValidationError::DuplicateName(name.clone()));
            }
        }

        let pattern = match PathPattern::parse(&route.path) {
            Ok(pattern) => pattern,
            Err(e) => {
                errors.push(ValidationError::InvalidPattern {
                    path: route.path.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if route.screen == HOME_SCREEN && pattern.is_root() {
            errors.push(ValidationError::HomeIsRoot(route.path.clone()));
        }

        if let Some(template) = &route.redirect {
            match PathPattern::parse(template) {
                Ok(target) => {
                    let known: HashSet<&str> = pattern.placeholders().collect();
                    for param in target.placeholders() {
                        if !known.contains(param) {
                            errors.push(ValidationError::UnknownRedirectParam {
                                path: route.path.clone(),
                                param: param.to_string(),
                            });
                        }
                    }
                }
                Err(e) => errors.push(ValidationError::InvalidPattern {
                    path: template.clone(),
                    reason: e.to_string(),
                }),
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
