//! Example installer: loads settings from env (`.env` honored), ensures the options table exists,
//! installs the schema directory into PostgreSQL, then runs one init cycle against a logging host.
//!
//! Run: `CONTENT_SCHEMA_PATH=demos/schema CONTENT_NAMESPACE=shop cargo run --example installer`

use content_architecture::{
    ensure_database_exists, ensure_options_table, ArchitectureError, ArchitectureManager, ArchitectureSettings,
    ContentTypeOptions, HostCapabilities, LifecycleEvent, MetaRouter, PgOptionStore, PgSchemaReconciler,
    TaxonomyOptions, TaxonomyRegistrar, TypeRegistrar,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Stands in for the host's registries: logs what would be registered.
struct LoggingHost;

impl TypeRegistrar for LoggingHost {
    fn register_type(&self, key: &str, options: &ContentTypeOptions) -> Result<(), ArchitectureError> {
        let options = serde_json::to_string(options).map_err(|e| ArchitectureError::Host(e.to_string()))?;
        tracing::info!(key, %options, "register content type");
        Ok(())
    }
}

impl TaxonomyRegistrar for LoggingHost {
    fn register_taxonomy(
        &self,
        key: &str,
        object_types: &[String],
        options: &TaxonomyOptions,
    ) -> Result<(), ArchitectureError> {
        let options = serde_json::to_string(options).map_err(|e| ArchitectureError::Host(e.to_string()))?;
        tracing::info!(key, ?object_types, %options, "register taxonomy");
        Ok(())
    }
}

impl MetaRouter for LoggingHost {
    fn bind_meta_table(&self, object_type: &str, table_name: &str) {
        tracing::info!(object_type, table_name, "bind meta table");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("content_architecture=info,installer=info")),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/content_architecture".into());
    ensure_database_exists(&database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    ensure_options_table(&pool).await?;

    let logging_host = Arc::new(LoggingHost);
    let host = HostCapabilities {
        reconciler: Arc::new(PgSchemaReconciler::new(pool.clone())),
        options: Arc::new(PgOptionStore::new(pool)),
        types: logging_host.clone(),
        taxonomies: logging_host.clone(),
        meta: logging_host,
    };

    let settings = ArchitectureSettings::from_env()?;
    let manager = ArchitectureManager::try_new(settings, host)?;
    if !manager.is_ready() {
        tracing::warn!("CONTENT_SCHEMA_PATH and CONTENT_NAMESPACE must be set; nothing to do");
        return Ok(());
    }

    for result in manager.dispatch(LifecycleEvent::Activation).await? {
        tracing::info!(table = %result.table_name, kind = ?result.kind, "{}", result.message);
    }
    tracing::info!(
        option = %manager.version_option_key(),
        version = ?manager.installed_version().await?,
        "installed version"
    );
    manager.dispatch(LifecycleEvent::Init).await?;
    tracing::info!(tables = ?manager.list_managed_table_names(), "managed tables");
    Ok(())
}
