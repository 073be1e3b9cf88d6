//! # Sightline Config
//!
//! Configuration management for the Sightline engine: the TOML settings file
//! and the JSON strategy rule table.

mod error;
mod loader;
mod rules;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use rules::RuleTable;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
