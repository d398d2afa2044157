//! The architecture manager: one per namespace, owns the manifest and its derived names.

use crate::config::{resolve, validate_identifier, Manifest, NameMapping, SchemaDir};
use crate::error::{ArchitectureError, ConfigError};
use crate::host::{HostCapabilities, ReconcilerResult};
use crate::installer::install_tables;
use crate::meta::bind_meta_tables;
use crate::registrar::{register_taxonomies, register_types};
use crate::settings::ArchitectureSettings;
use crate::version;
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
struct Loaded {
    schema: SchemaDir,
    manifest: Manifest,
    names: NameMapping,
}

/// Without a namespace, schema path, or a valid manifest the manager is inert: every operation
/// is a no-op and no names are managed. Check [`ArchitectureManager::is_ready`].
pub struct ArchitectureManager {
    settings: ArchitectureSettings,
    host: HostCapabilities,
    loaded: Option<Loaded>,
}

impl ArchitectureManager {
    /// Never fails; configuration problems are logged and leave the manager inert.
    pub fn new(settings: ArchitectureSettings, host: HostCapabilities) -> Self {
        let namespace = settings.namespace.clone();
        match Self::try_new(settings.clone(), host.clone()) {
            Ok(manager) => manager,
            Err(e) => {
                tracing::warn!(namespace = %namespace, error = %e, "content architecture disabled");
                ArchitectureManager {
                    settings,
                    host,
                    loaded: None,
                }
            }
        }
    }

    /// Like [`ArchitectureManager::new`] but reports why the manifest could not be loaded.
    /// Missing namespace or schema path is not an error: the manager is returned inert.
    pub fn try_new(settings: ArchitectureSettings, host: HostCapabilities) -> Result<Self, ConfigError> {
        if !settings.is_configured() {
            return Ok(ArchitectureManager {
                settings,
                host,
                loaded: None,
            });
        }
        validate_identifier("namespace", &settings.namespace)?;
        validate_identifier("storage prefix", &settings.storage_prefix)?;

        let schema = SchemaDir::new(settings.schema_path.clone());
        let manifest = schema.load_manifest()?;
        let names = resolve(&settings.namespace, &settings.storage_prefix, &manifest.custom_tables);
        tracing::info!(
            namespace = %settings.namespace,
            tables = names.len(),
            content_types = manifest.content_types.len(),
            taxonomies = manifest.taxonomies.len(),
            "content architecture loaded"
        );
        Ok(ArchitectureManager {
            settings,
            host,
            loaded: Some(Loaded {
                schema,
                manifest,
                names,
            }),
        })
    }

    pub fn is_ready(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn settings(&self) -> &ArchitectureSettings {
        &self.settings
    }

    pub fn manifest(&self) -> Option<&Manifest> {
        self.loaded.as_ref().map(|l| &l.manifest)
    }

    pub fn names(&self) -> Option<&NameMapping> {
        self.loaded.as_ref().map(|l| &l.names)
    }

    /// Create or reconcile every table, then record the schema version.
    /// Callers must serialize concurrent installs.
    pub async fn install(&self) -> Result<Vec<ReconcilerResult>, ArchitectureError> {
        let Some(loaded) = &self.loaded else {
            return Ok(Vec::new());
        };
        let results = install_tables(
            &loaded.schema,
            &loaded.manifest,
            &loaded.names,
            &self.settings.charset_collate,
            self.host.reconciler.as_ref(),
        )
        .await?;
        version::record_version(
            self.host.options.as_ref(),
            &self.settings.namespace,
            &self.settings.db_version,
            self.settings.version_policy,
        )
        .await?;
        tracing::info!(
            namespace = %self.settings.namespace,
            results = results.len(),
            warnings = results.iter().filter(|r| r.is_warning()).count(),
            "install finished"
        );
        Ok(results)
    }

    /// Register content types, then taxonomies. Safe to call once per init cycle.
    pub fn initialize_types_and_taxonomies(&self) -> Result<(), ArchitectureError> {
        let Some(loaded) = &self.loaded else {
            return Ok(());
        };
        let types = register_types(&loaded.schema, &loaded.manifest, self.host.types.as_ref())?;
        let taxonomies = register_taxonomies(&loaded.schema, &loaded.manifest, self.host.taxonomies.as_ref())?;
        tracing::info!(namespace = %self.settings.namespace, types, taxonomies, "types and taxonomies registered");
        Ok(())
    }

    /// Bind metadata tables into the current storage context. Returns the number bound.
    pub fn bind_meta_tables_on_init(&self) -> usize {
        match &self.loaded {
            Some(loaded) => bind_meta_tables(&loaded.names, self.host.meta.as_ref()),
            None => 0,
        }
    }

    /// Every table and metadata table this manager owns, for uninstall cleanup.
    pub fn list_managed_table_names(&self) -> BTreeSet<String> {
        self.names().map(NameMapping::managed_table_names).unwrap_or_default()
    }

    pub fn version_option_key(&self) -> String {
        version::version_option_key(&self.settings.namespace)
    }

    pub async fn installed_version(&self) -> Result<Option<String>, ArchitectureError> {
        if !self.is_ready() {
            return Ok(None);
        }
        version::installed_version(self.host.options.as_ref(), &self.settings.namespace).await
    }
}
