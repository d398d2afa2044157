//! In-memory host capabilities and schema directory fixtures for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use content_architecture::reconciler::column_definitions;
use content_architecture::{
    ArchitectureError, ArchitectureManager, ArchitectureSettings, ContentTypeOptions, HostCapabilities, MetaRouter,
    OptionStore, ReconcileKind, ReconcilerResult, SchemaReconciler, TaxonomyOptions, TaxonomyRegistrar, TypeRegistrar,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Keeps a catalog of table -> columns; creates missing tables and adds missing columns.
#[derive(Default)]
pub struct MemoryReconciler {
    pub catalog: Mutex<BTreeMap<String, BTreeSet<String>>>,
    pub calls: Mutex<Vec<(String, String)>>,
    /// Tables for which the reconciler reports a warning instead of applying the statement.
    pub warn_for: Mutex<BTreeSet<String>>,
}

impl MemoryReconciler {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn called_tables(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }

    pub fn columns(&self, table: &str) -> Option<BTreeSet<String>> {
        self.catalog.lock().unwrap().get(table).cloned()
    }
}

#[async_trait]
impl SchemaReconciler for MemoryReconciler {
    async fn reconcile(&self, table_name: &str, statement: &str) -> Result<Vec<ReconcilerResult>, ArchitectureError> {
        self.calls
            .lock()
            .unwrap()
            .push((table_name.to_string(), statement.to_string()));
        if self.warn_for.lock().unwrap().contains(table_name) {
            return Ok(vec![ReconcilerResult::new(
                table_name,
                ReconcileKind::Warning,
                format!("Could not create table {}: simulated", table_name),
            )]);
        }

        let wanted: BTreeSet<String> = column_definitions(statement).into_iter().map(|c| c.name).collect();
        let mut catalog = self.catalog.lock().unwrap();
        let Some(existing) = catalog.get_mut(table_name) else {
            catalog.insert(table_name.to_string(), wanted);
            return Ok(vec![ReconcilerResult::new(
                table_name,
                ReconcileKind::Created,
                format!("Created table {}", table_name),
            )]);
        };
        let missing: Vec<String> = wanted.difference(existing).cloned().collect();
        if missing.is_empty() {
            return Ok(vec![ReconcilerResult::new(
                table_name,
                ReconcileKind::Unchanged,
                format!("Table {} is up to date", table_name),
            )]);
        }
        existing.extend(missing.iter().cloned());
        Ok(missing
            .into_iter()
            .map(|c| ReconcilerResult::new(table_name, ReconcileKind::Altered, format!("Added column {}.{}", table_name, c)))
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryOptionStore {
    pub values: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl OptionStore for MemoryOptionStore {
    async fn get_option(&self, name: &str) -> Result<Option<String>, ArchitectureError> {
        Ok(self.values.lock().unwrap().get(name).cloned())
    }

    async fn add_option(&self, name: &str, value: &str) -> Result<bool, ArchitectureError> {
        let mut values = self.values.lock().unwrap();
        if values.contains_key(name) {
            return Ok(false);
        }
        values.insert(name.to_string(), value.to_string());
        Ok(true)
    }

    async fn update_option(&self, name: &str, value: &str) -> Result<(), ArchitectureError> {
        self.values.lock().unwrap().insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// Records every registration and metadata binding it receives.
#[derive(Default)]
pub struct RecordingHost {
    pub types: Mutex<Vec<(String, ContentTypeOptions)>>,
    pub taxonomies: Mutex<Vec<(String, Vec<String>, TaxonomyOptions)>>,
    pub meta: Mutex<Vec<(String, String)>>,
}

impl TypeRegistrar for RecordingHost {
    fn register_type(&self, key: &str, options: &ContentTypeOptions) -> Result<(), ArchitectureError> {
        self.types.lock().unwrap().push((key.to_string(), options.clone()));
        Ok(())
    }
}

impl TaxonomyRegistrar for RecordingHost {
    fn register_taxonomy(
        &self,
        key: &str,
        object_types: &[String],
        options: &TaxonomyOptions,
    ) -> Result<(), ArchitectureError> {
        self.taxonomies
            .lock()
            .unwrap()
            .push((key.to_string(), object_types.to_vec(), options.clone()));
        Ok(())
    }
}

impl MetaRouter for RecordingHost {
    fn bind_meta_table(&self, object_type: &str, table_name: &str) {
        self.meta
            .lock()
            .unwrap()
            .push((object_type.to_string(), table_name.to_string()));
    }
}

/// Stubs plus the capability bundle that points at them.
pub struct TestHost {
    pub reconciler: Arc<MemoryReconciler>,
    pub options: Arc<MemoryOptionStore>,
    pub recorder: Arc<RecordingHost>,
}

impl TestHost {
    pub fn new() -> Self {
        TestHost {
            reconciler: Arc::new(MemoryReconciler::default()),
            options: Arc::new(MemoryOptionStore::default()),
            recorder: Arc::new(RecordingHost::default()),
        }
    }

    pub fn capabilities(&self) -> HostCapabilities {
        HostCapabilities {
            reconciler: self.reconciler.clone(),
            options: self.options.clone(),
            types: self.recorder.clone(),
            taxonomies: self.recorder.clone(),
            meta: self.recorder.clone(),
        }
    }

    pub fn manager(&self, settings: ArchitectureSettings) -> ArchitectureManager {
        ArchitectureManager::new(settings, self.capabilities())
    }
}

pub fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

pub const META_TEMPLATE: &str = r#"{ "sql": "CREATE TABLE %s (meta_id bigserial NOT NULL, object_id bigint NOT NULL, meta_key varchar(255), meta_value text, PRIMARY KEY (meta_id))" }"#;

/// Schema directory with an `order-log` table (with meta), an `audit` table, one content type
/// and two taxonomies, one without object types.
pub fn shop_schema() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "config.json",
        r#"{
            "custom": { "order-log": { "meta": true }, "audit": {} },
            "post_type": ["product"],
            "taxonomy": { "brand": ["product"], "tag": null }
        }"#,
    );
    write(
        root,
        "custom/order-log.json",
        r#"{ "sql": "CREATE TABLE %s (id bigserial NOT NULL, status varchar(20) NOT NULL DEFAULT 'new', PRIMARY KEY (id))" }"#,
    );
    write(
        root,
        "custom/audit.json",
        r#"{ "sql": "CREATE TABLE %s (id bigserial NOT NULL, message text, PRIMARY KEY (id))" }"#,
    );
    write(root, "custom-meta/custom-meta.json", META_TEMPLATE);
    write(root, "post_type/product.json", r#"{ "public": true }"#);
    write(root, "taxonomy/brand.json", r#"{ "label": "Brands", "hierarchical": false }"#);
    write(root, "taxonomy/tag.json", r#"{ "label": "Tags" }"#);
    dir
}

pub fn shop_settings(dir: &TempDir) -> ArchitectureSettings {
    ArchitectureSettings::new(dir.path(), "shop").with_storage_prefix("wp_")
}
