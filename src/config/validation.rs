//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Feed URLs must be absolute URLs
//! - Endpoints and connection strings must be present
//! - Numeric limits must be in range
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is not a valid URL: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("max-results must not be negative, got {0}")]
    NegativeMaxResults(i64),

    #[error("database-timeout-secs must be greater than zero")]
    ZeroTimeout,
}

/// Check a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let source = &config.source;
    let mut feeds = vec![
        ("countries-url", source.countries_url.as_str()),
        ("regions-url", source.regions_url.as_str()),
        ("airports-url", source.airports_url.as_str()),
        ("runways-url", source.runways_url.as_str()),
    ];
    if let Some(frequencies) = &source.frequencies_url {
        feeds.push(("frequencies-url", frequencies.as_str()));
    }

    for (field, value) in feeds {
        if let Err(e) = Url::parse(value) {
            errors.push(ValidationError::InvalidUrl {
                field,
                reason: e.to_string(),
            });
        }
    }

    if config.storage.server.trim().is_empty() {
        errors.push(ValidationError::Empty("storage.server"));
    }
    if config.database.trim().is_empty() {
        errors.push(ValidationError::Empty("database"));
    }
    if config.max_results < 0 {
        errors.push(ValidationError::NegativeMaxResults(config.max_results));
    }
    if config.database_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
