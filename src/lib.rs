//! Router configuration loading and reference generation.

pub mod config;
pub mod docs;
pub mod observability;

pub use config::{load, load_as, load_file, Config, ConfigError, Format};
pub use docs::{document, document_config, SchemaError};
