//! Content architecture: declarative custom tables, content types and taxonomies loaded from a schema directory.

pub mod case;
pub mod config;
pub mod error;
pub mod hooks;
pub mod host;
pub mod installer;
pub mod manager;
pub mod meta;
pub mod reconciler;
pub mod registrar;
pub mod settings;
pub mod store;
pub mod version;

pub use config::{
    resolve, ContentTypeOptions, CustomTableSpec, Manifest, NameMapping, ResolvedTable, SchemaDir, TaxonomyOptions,
};
pub use error::{ArchitectureError, ConfigError};
pub use hooks::LifecycleEvent;
pub use host::{
    HostCapabilities, MetaRouter, OptionStore, ReconcileKind, ReconcilerResult, SchemaReconciler, TaxonomyRegistrar,
    TypeRegistrar,
};
pub use manager::ArchitectureManager;
pub use reconciler::PgSchemaReconciler;
pub use settings::{ArchitectureSettings, VersionPolicy};
pub use store::{ensure_database_exists, ensure_options_table, PgOptionStore};
