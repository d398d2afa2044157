//! Typed errors for manifest loading, definitions, and host capabilities.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("manifest not found: {}", .path.display())]
    ManifestMissing { path: PathBuf },
    #[error("manifest unreadable: {}: {source}", .path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest malformed: {}: {source}", .path.display())]
    ManifestMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {kind} key '{key}'")]
    InvalidKey { kind: &'static str, key: String },
    #[error("duplicate {kind} key '{key}'")]
    DuplicateKey { kind: &'static str, key: String },
    #[error("metadata table of '{meta_key}' collides with table of '{table_key}'")]
    NameCollision { meta_key: String, table_key: String },
    #[error("invalid {kind} '{value}' (expected [A-Za-z0-9_])")]
    InvalidIdentifier { kind: &'static str, value: String },
    #[error("invalid {kind} definition '{key}': {reason}")]
    InvalidDefinition {
        kind: &'static str,
        key: String,
        reason: String,
    },
    #[error("settings: {0}")]
    Settings(String),
}

#[derive(Error, Debug)]
pub enum ArchitectureError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{kind} definition '{key}' not found at {}", .path.display())]
    DefinitionNotFound {
        kind: &'static str,
        key: String,
        path: PathBuf,
    },
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("host: {0}")]
    Host(String),
}
