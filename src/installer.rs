//! Render custom-table templates against resolved names and submit them to the schema reconciler.
//! Order: every custom table in manifest order, then every metadata table in manifest order.

use crate::config::{Manifest, NameMapping, SchemaDir, TABLE_NAME_PLACEHOLDER};
use crate::error::ArchitectureError;
use crate::host::{ReconcilerResult, SchemaReconciler};

/// Substitute the table name, append the charset/collation clause, terminate with `;`.
pub fn render_statement(template: &str, table_name: &str, charset_collate: &str) -> String {
    let sql = template.replacen(TABLE_NAME_PLACEHOLDER, table_name, 1);
    let body = sql.trim().trim_end_matches(';').trim_end();
    let clause = charset_collate.trim();
    if clause.is_empty() {
        format!("{};", body)
    } else {
        format!("{} {};", body, clause)
    }
}

/// Reconcile every table the manifest declares. A missing template stops the pass; tables
/// already reconciled stay as they are. Reconciler warnings are returned, not raised.
pub async fn install_tables(
    schema: &SchemaDir,
    manifest: &Manifest,
    names: &NameMapping,
    charset_collate: &str,
    reconciler: &dyn SchemaReconciler,
) -> Result<Vec<ReconcilerResult>, ArchitectureError> {
    let mut results = Vec::new();

    for key in manifest.custom_tables.keys() {
        let Some(table) = names.table(key) else {
            continue;
        };
        let def = schema.load_custom_table_definition(key)?;
        let sql = render_statement(&def.sql, &table.table_name, charset_collate);
        tracing::debug!(table = %table.table_name, sql = %sql, "reconcile");
        results.extend(reconciler.reconcile(&table.table_name, &sql).await?);
    }

    let mut meta_tables = names.meta_tables().peekable();
    if meta_tables.peek().is_some() {
        let template = schema.load_custom_meta_definition()?.sql;
        for (table, meta_name) in meta_tables {
            let sql = render_statement(&template, meta_name, charset_collate);
            tracing::debug!(table = %meta_name, parent = %table.table_name, sql = %sql, "reconcile");
            results.extend(reconciler.reconcile(meta_name, &sql).await?);
        }
    }

    for warning in results.iter().filter(|r| r.is_warning()) {
        tracing::warn!(table = %warning.table_name, "{}", warning.message);
    }
    Ok(results)
}
