//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! options file (JSON/TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → split into the pieces each subsystem needs
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never mutated
//! - Optional fields have defaults so older option files keep loading
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, DEFAULT_CONFIG_PATH};
pub use schema::AppConfig;
pub use schema::ObservabilityConfig;
pub use schema::SourceConfig;
pub use schema::StorageConfig;
pub use validation::ValidationError;
