//! TOML Component Registry
//!
//! Loads component designs from a registry file:
//!
//! ```toml
//! extend_builtin = true
//!
//! [[design]]
//! name = "PricingTable"
//!
//! [[design.field]]
//! key = "heading"
//! kind = "text"
//! default = "Pricing"
//! ```
//!
//! Without `extend_builtin` the file replaces the built-in designs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::entities::{ComponentDesign, ComponentRegistry, FieldSpec, RegistryError};

#[derive(Error, Debug)]
pub enum RegistryLoadError {
    #[error("registry file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read registry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid registry {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid registry {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: RegistryError,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlRegistry {
    #[serde(default)]
    extend_builtin: bool,
    #[serde(default, rename = "design")]
    designs: Vec<TomlDesign>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlDesign {
    name: String,
    #[serde(default, rename = "field")]
    fields: Vec<FieldSpec>,
}

/// Load a component registry from a TOML file.
pub fn load_registry(path: &Path) -> Result<ComponentRegistry, RegistryLoadError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => RegistryLoadError::NotFound(path.to_path_buf()),
        _ => RegistryLoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let registry = parse_registry(&content).map_err(|e| match e {
        ParseFailure::Toml(message) => RegistryLoadError::Parse {
            path: path.to_path_buf(),
            message,
        },
        ParseFailure::Registry(source) => RegistryLoadError::Invalid {
            path: path.to_path_buf(),
            source,
        },
    })?;

    tracing::debug!(path = %path.display(), designs = registry.len(), "component registry loaded");
    Ok(registry)
}

enum ParseFailure {
    Toml(String),
    Registry(RegistryError),
}

fn parse_registry(content: &str) -> Result<ComponentRegistry, ParseFailure> {
    let parsed: TomlRegistry =
        toml::from_str(content).map_err(|e| ParseFailure::Toml(e.to_string()))?;

    let mut designs: Vec<ComponentDesign> = if parsed.extend_builtin {
        let builtin = ComponentRegistry::builtin();
        builtin
            .names()
            .filter_map(|name| builtin.get(name).cloned())
            .collect()
    } else {
        Vec::new()
    };

    for design in parsed.designs {
        // A file design with a built-in name replaces the built-in.
        designs.retain(|d| d.name != design.name);
        designs.push(ComponentDesign::new(design.name, design.fields));
    }

    ComponentRegistry::from_designs(designs).map_err(ParseFailure::Registry)
}
