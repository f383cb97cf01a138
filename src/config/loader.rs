//! Configuration loading.
//!
//! `load` runs the full pipeline: strict parse, validate, default, normalize.
//! The first failing phase stops the pipeline and no config is returned.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::defaults::{apply_defaults, DefaultError};
use crate::config::normalize::{normalize, NormalizeError};
use crate::config::schema::Config;
use crate::config::validation::{validate_config, ValidationErrors};

/// Input document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// YAML. Also accepts JSON documents.
    #[default]
    Yaml,
    Toml,
    Json,
}

impl Format {
    /// Pick a format from a file extension, falling back to YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Format::Toml,
            Some("json") => Format::Json,
            _ => Format::Yaml,
        }
    }
}

/// Malformed document or a value of the wrong shape.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse: {0}")]
    Parse(#[from] ParseError),

    #[error("validation: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("defaults: {0}")]
    Defaults(#[from] DefaultError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

fn parse(bytes: &[u8], format: Format) -> Result<Config, ParseError> {
    let config = match format {
        Format::Yaml => serde_yaml::from_slice(bytes)?,
        Format::Toml => toml::from_str(std::str::from_utf8(bytes)?)?,
        Format::Json => serde_json::from_slice(bytes)?,
    };
    Ok(config)
}

/// Load a YAML (or JSON) document.
pub fn load(bytes: &[u8]) -> Result<Config, ConfigError> {
    load_as(bytes, Format::Yaml)
}

/// Load a document in the given format.
pub fn load_as(bytes: &[u8], format: Format) -> Result<Config, ConfigError> {
    let mut config = parse(bytes, format)?;
    validate_config(&config)?;
    apply_defaults(&mut config)?;
    normalize(&mut config)?;

    tracing::info!(
        asn = config.asn.unwrap_or_default(),
        router_id = %config.router_id,
        peers = config.peers.len(),
        interfaces = config.interfaces.len(),
        vrrp = config.vrrp.len(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Read and load a configuration file, choosing the format by extension.
pub fn load_file(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Read configuration file");
    load_as(&content, Format::from_path(path))
}
