//! Host capabilities injected into the manager.

use crate::config::{ContentTypeOptions, TaxonomyOptions};
use crate::error::ArchitectureError;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileKind {
    Created,
    Altered,
    Unchanged,
    /// Non-fatal issue with one statement; the installer passes it through.
    Warning,
}

/// One human-readable line reported by the schema reconciler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReconcilerResult {
    pub table_name: String,
    pub kind: ReconcileKind,
    pub message: String,
}

impl ReconcilerResult {
    pub fn new(table_name: impl Into<String>, kind: ReconcileKind, message: impl Into<String>) -> Self {
        ReconcilerResult {
            table_name: table_name.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.kind == ReconcileKind::Warning
    }
}

/// Applies a CREATE TABLE statement idempotently: create if absent, add missing columns if present.
#[async_trait]
pub trait SchemaReconciler: Send + Sync {
    /// Per-statement problems come back as `ReconcileKind::Warning`; `Err` is reserved for
    /// failures that make further statements pointless (e.g. lost connection).
    async fn reconcile(&self, table_name: &str, statement: &str) -> Result<Vec<ReconcilerResult>, ArchitectureError>;
}

/// Host-wide persisted string options.
#[async_trait]
pub trait OptionStore: Send + Sync {
    async fn get_option(&self, name: &str) -> Result<Option<String>, ArchitectureError>;
    /// Set only if absent. Returns whether the value was written.
    async fn add_option(&self, name: &str, value: &str) -> Result<bool, ArchitectureError>;
    /// Insert or replace.
    async fn update_option(&self, name: &str, value: &str) -> Result<(), ArchitectureError>;
}

pub trait TypeRegistrar: Send + Sync {
    fn register_type(&self, key: &str, options: &ContentTypeOptions) -> Result<(), ArchitectureError>;
}

pub trait TaxonomyRegistrar: Send + Sync {
    fn register_taxonomy(
        &self,
        key: &str,
        object_types: &[String],
        options: &TaxonomyOptions,
    ) -> Result<(), ArchitectureError>;
}

/// Routes the host's generic metadata API for `object_type` to `table_name` in the active context.
pub trait MetaRouter: Send + Sync {
    fn bind_meta_table(&self, object_type: &str, table_name: &str);
}

#[derive(Clone)]
pub struct HostCapabilities {
    pub reconciler: Arc<dyn SchemaReconciler>,
    pub options: Arc<dyn OptionStore>,
    pub types: Arc<dyn TypeRegistrar>,
    pub taxonomies: Arc<dyn TaxonomyRegistrar>,
    pub meta: Arc<dyn MetaRouter>,
}
