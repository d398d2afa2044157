//! Load the manifest and per-entity definitions from a schema directory.

use crate::config::types::*;
use crate::config::validate_manifest;
use crate::error::{ArchitectureError, ConfigError};
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "config.json";
pub const CUSTOM_DIR: &str = "custom";
pub const CUSTOM_META_DIR: &str = "custom-meta";
pub const CUSTOM_META_KEY: &str = "custom-meta";
pub const POST_TYPE_DIR: &str = "post_type";
pub const TAXONOMY_DIR: &str = "taxonomy";

/// Placeholder substituted with the resolved table name.
pub const TABLE_NAME_PLACEHOLDER: &str = "%s";

/// Handle on a schema directory. Definitions are read on demand.
#[derive(Clone, Debug)]
pub struct SchemaDir {
    root: PathBuf,
}

impl SchemaDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SchemaDir { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read and validate `config.json`.
    pub fn load_manifest(&self) -> Result<Manifest, ConfigError> {
        let path = self.root.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::ManifestMissing { path: path.clone() },
            _ => ConfigError::ManifestUnreadable {
                path: path.clone(),
                source: e,
            },
        })?;
        let file: ManifestFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ManifestMalformed { path: path.clone(), source: e })?;
        let manifest = Manifest::from(file);
        validate_manifest(&manifest)?;
        tracing::debug!(
            path = %path.display(),
            custom_tables = manifest.custom_tables.len(),
            content_types = manifest.content_types.len(),
            taxonomies = manifest.taxonomies.len(),
            "manifest loaded"
        );
        Ok(manifest)
    }

    /// SQL template for one custom table.
    pub fn load_custom_table_definition(&self, key: &str) -> Result<TableDefinition, ArchitectureError> {
        let def: TableDefinition = self.load_definition("custom table", CUSTOM_DIR, key)?;
        check_template("custom table", key, &def)?;
        Ok(def)
    }

    /// SQL template shared by every metadata table.
    pub fn load_custom_meta_definition(&self) -> Result<TableDefinition, ArchitectureError> {
        let def: TableDefinition = self.load_definition("custom meta", CUSTOM_META_DIR, CUSTOM_META_KEY)?;
        check_template("custom meta", CUSTOM_META_KEY, &def)?;
        Ok(def)
    }

    pub fn load_type_definition(&self, key: &str) -> Result<ContentTypeOptions, ArchitectureError> {
        self.load_definition("content type", POST_TYPE_DIR, key)
    }

    pub fn load_taxonomy_definition(&self, key: &str) -> Result<TaxonomyOptions, ArchitectureError> {
        self.load_definition("taxonomy", TAXONOMY_DIR, key)
    }

    fn load_definition<T>(&self, kind: &'static str, dir: &str, key: &str) -> Result<T, ArchitectureError>
    where
        T: DeserializeOwned,
    {
        let path = self.root.join(dir).join(format!("{}.json", key));
        let content = match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ArchitectureError::DefinitionNotFound {
                    kind,
                    key: key.to_string(),
                    path,
                })
            }
            Err(e) => {
                return Err(ConfigError::InvalidDefinition {
                    kind,
                    key: key.to_string(),
                    reason: e.to_string(),
                }
                .into())
            }
        };
        tracing::debug!(kind, key, path = %path.display(), "definition loaded");
        serde_json::from_str(&content).map_err(|e| {
            ConfigError::InvalidDefinition {
                kind,
                key: key.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

fn check_template(kind: &'static str, key: &str, def: &TableDefinition) -> Result<(), ConfigError> {
    let count = def.sql.matches(TABLE_NAME_PLACEHOLDER).count();
    if count == 1 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDefinition {
            kind,
            key: key.to_string(),
            reason: format!(
                "sql must contain the table name placeholder '{}' exactly once (found {})",
                TABLE_NAME_PLACEHOLDER, count
            ),
        })
    }
}
