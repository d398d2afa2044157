//! Manager settings, built in code or from `CONTENT_*` environment variables.

use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_STORAGE_PREFIX: &str = "wp_";
pub const DEFAULT_DB_VERSION: &str = "1.0.0";

/// How the installed version record is written on install.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VersionPolicy {
    /// Write only when no record exists yet.
    #[default]
    SetIfAbsent,
    /// Write on every successful install.
    Overwrite,
}

impl FromStr for VersionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "set-if-absent" | "add" => Ok(VersionPolicy::SetIfAbsent),
            "overwrite" | "update" => Ok(VersionPolicy::Overwrite),
            _ => Err(ConfigError::Settings(format!(
                "invalid version policy: {} (expected set-if-absent or overwrite)",
                s
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ArchitectureSettings {
    /// Schema directory holding `config.json` and the definition folders.
    pub schema_path: PathBuf,
    /// Scopes every derived name; empty leaves the manager inert.
    pub namespace: String,
    /// Host-wide table prefix (e.g. "wp_").
    pub storage_prefix: String,
    /// Appended to every CREATE TABLE statement; may be empty.
    pub charset_collate: String,
    /// Recorded under `<namespace>_db_version` on install.
    pub db_version: String,
    pub version_policy: VersionPolicy,
}

impl ArchitectureSettings {
    pub fn new(schema_path: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        ArchitectureSettings {
            schema_path: schema_path.into(),
            namespace: namespace.into(),
            storage_prefix: DEFAULT_STORAGE_PREFIX.into(),
            charset_collate: String::new(),
            db_version: DEFAULT_DB_VERSION.into(),
            version_policy: VersionPolicy::default(),
        }
    }

    pub fn with_storage_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.storage_prefix = prefix.into();
        self
    }

    pub fn with_charset_collate(mut self, clause: impl Into<String>) -> Self {
        self.charset_collate = clause.into();
        self
    }

    pub fn with_db_version(mut self, version: impl Into<String>) -> Self {
        self.db_version = version.into();
        self
    }

    pub fn with_version_policy(mut self, policy: VersionPolicy) -> Self {
        self.version_policy = policy;
        self
    }

    /// From env: `CONTENT_SCHEMA_PATH`, `CONTENT_NAMESPACE`, `CONTENT_STORAGE_PREFIX`,
    /// `CONTENT_CHARSET_COLLATE`, `CONTENT_DB_VERSION`, `CONTENT_VERSION_POLICY`.
    /// Unset path or namespace yields empty values (inert manager), not an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let var = |name: &str| std::env::var(name).ok();
        let version_policy = match var("CONTENT_VERSION_POLICY") {
            Some(s) => s.parse()?,
            None => VersionPolicy::default(),
        };
        Ok(ArchitectureSettings {
            schema_path: var("CONTENT_SCHEMA_PATH").unwrap_or_default().into(),
            namespace: var("CONTENT_NAMESPACE").unwrap_or_default(),
            storage_prefix: var("CONTENT_STORAGE_PREFIX").unwrap_or_else(|| DEFAULT_STORAGE_PREFIX.into()),
            charset_collate: var("CONTENT_CHARSET_COLLATE").unwrap_or_default(),
            db_version: var("CONTENT_DB_VERSION").unwrap_or_else(|| DEFAULT_DB_VERSION.into()),
            version_policy,
        })
    }

    /// True when both namespace and schema path are set.
    pub fn is_configured(&self) -> bool {
        !self.namespace.is_empty() && !self.schema_path.as_os_str().is_empty()
    }
}
