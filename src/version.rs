//! Installed schema version record, stored as `<namespace>_db_version`.

use crate::error::ArchitectureError;
use crate::host::OptionStore;
use crate::settings::VersionPolicy;

pub fn version_option_key(namespace: &str) -> String {
    format!("{}_db_version", namespace)
}

/// Persist `version` according to `policy`. Returns whether the record was written.
pub async fn record_version(
    store: &dyn OptionStore,
    namespace: &str,
    version: &str,
    policy: VersionPolicy,
) -> Result<bool, ArchitectureError> {
    let key = version_option_key(namespace);
    let written = match policy {
        VersionPolicy::SetIfAbsent => store.add_option(&key, version).await?,
        VersionPolicy::Overwrite => {
            store.update_option(&key, version).await?;
            true
        }
    };
    if written {
        tracing::info!(option = %key, version, "schema version recorded");
    } else {
        tracing::debug!(option = %key, "schema version already recorded, left unchanged");
    }
    Ok(written)
}

pub async fn installed_version(store: &dyn OptionStore, namespace: &str) -> Result<Option<String>, ArchitectureError> {
    store.get_option(&version_option_key(namespace)).await
}
