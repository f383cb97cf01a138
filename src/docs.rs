//! Configuration reference generation.
//!
//! # Responsibilities
//! - Render one markdown table per schema entity from the field tables
//! - Recurse into nested entities, depth first, after the parent table
//!
//! # Design Decisions
//! - Works on schema metadata only, never on a loaded config
//! - An empty description is a defect in the schema itself and fails the
//!   whole run; callers treat it as fatal
//! - Output layout is consumed by other tooling and must stay byte-stable

use std::fmt::Write;

use thiserror::Error;

use crate::config::fields::{Entity, CONFIG};

/// The schema is incompletely annotated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("code error: {entity}.{key} doesn't have a description")]
    MissingDescription { entity: &'static str, key: &'static str },

    #[error("formatting failed")]
    Fmt(#[from] std::fmt::Error),
}

const HEADER: &str = "| Option | Type | Default | Validation | Description |";
const DIVIDER: &str = "|--------|------|---------|------------|-------------|";

fn write_entity(entity: &'static Entity, out: &mut String) -> Result<(), SchemaError> {
    let mut children = Vec::new();

    writeln!(out, "## {}", entity.name)?;
    writeln!(out, "{}", HEADER)?;
    writeln!(out, "{}", DIVIDER)?;

    for field in entity.fields {
        if field.description.is_empty() {
            return Err(SchemaError::MissingDescription {
                entity: entity.name,
                key: field.key,
            });
        }
        if field.is_hidden() {
            continue;
        }
        if let Some(nested) = field.nested {
            children.push(nested);
        }

        let default = field
            .default
            .map(|d| format!("`{}`", d))
            .unwrap_or_default();
        writeln!(
            out,
            "| `{}` | `{}` | {} | {} | {} |",
            field.key,
            field.ty,
            default,
            field.rule_string(),
            field.description
        )?;
    }
    out.push('\n');

    for child in children {
        write_entity(child, out)?;
    }
    Ok(())
}

/// Render the reference for `entity` and everything nested under it.
pub fn document(entity: &'static Entity) -> Result<String, SchemaError> {
    let mut out = String::new();
    write_entity(entity, &mut out)?;
    Ok(out)
}

/// Render the reference for the whole configuration schema.
pub fn document_config() -> Result<String, SchemaError> {
    document(&CONFIG)
}
