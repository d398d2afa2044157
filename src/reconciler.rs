//! PostgreSQL schema reconciler: create missing tables, add missing columns, never drop.

use crate::error::ArchitectureError;
use crate::host::{ReconcileKind, ReconcilerResult, SchemaReconciler};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;

/// Leading words that always open a constraint or table-level clause.
const CLAUSE_WORDS: &[&str] = &["CONSTRAINT", "PRIMARY", "UNIQUE", "FOREIGN", "CHECK", "EXCLUDE", "LIKE"];

/// Leading words that open an index clause only when a column list follows; otherwise they are
/// ordinary column names (`key varchar(64)`).
const INDEX_WORDS: &[&str] = &["KEY", "INDEX", "FULLTEXT", "SPATIAL"];

/// `KEY idx (a)`, `INDEX (a)`, `FULLTEXT KEY idx (a)`.
fn is_index_clause(tokens: &[&str]) -> bool {
    match tokens {
        [first, rest @ ..] if INDEX_WORDS.contains(&first.to_uppercase().as_str()) => match rest {
            [next, ..] if next.starts_with('(') => true,
            [next, ..] if matches!(next.to_uppercase().as_str(), "KEY" | "INDEX") => true,
            [_, after, ..] => after.starts_with('('),
            _ => false,
        },
        _ => false,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDefinition {
    /// Name as the catalog reports it (unquoted names fold to lowercase).
    pub name: String,
    /// Full element text, e.g. `status varchar(20) NOT NULL DEFAULT 'new'`.
    pub definition: String,
}

/// Split the parenthesized body of a CREATE TABLE statement into column definitions.
pub fn column_definitions(statement: &str) -> Vec<ColumnDefinition> {
    let Some(open) = statement.find('(') else {
        return Vec::new();
    };
    let mut elements = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    for c in statement[open + 1..].chars() {
        match c {
            '\'' => {
                in_quote = !in_quote;
                current.push(c);
            }
            _ if in_quote => current.push(c),
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' if depth == 0 => break,
            ')' => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => elements.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    elements.push(current);

    elements
        .into_iter()
        .filter_map(|raw| {
            let tokens: Vec<&str> = raw.split_whitespace().collect();
            let first = *tokens.first()?;
            if CLAUSE_WORDS.contains(&first.to_uppercase().as_str()) || is_index_clause(&tokens) {
                return None;
            }
            let name = match first.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
                Some(quoted) => quoted.to_string(),
                None => first.trim_matches('`').to_lowercase(),
            };
            Some(ColumnDefinition {
                name,
                definition: tokens.join(" "),
            })
        })
        .collect()
}

#[derive(Clone)]
pub struct PgSchemaReconciler {
    pool: PgPool,
}

impl PgSchemaReconciler {
    pub fn new(pool: PgPool) -> Self {
        PgSchemaReconciler { pool }
    }

    async fn table_exists(&self, table_name: &str) -> Result<bool, ArchitectureError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_schema = current_schema() AND table_name = $1)",
        )
        .bind(table_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn existing_columns(&self, table_name: &str) -> Result<HashSet<String>, ArchitectureError> {
        let columns = sqlx::query_scalar::<_, String>(
            "SELECT column_name::text FROM information_schema.columns WHERE table_schema = current_schema() AND table_name = $1",
        )
        .bind(table_name)
        .fetch_all(&self.pool)
        .await?;
        Ok(columns.into_iter().collect())
    }
}

#[async_trait]
impl SchemaReconciler for PgSchemaReconciler {
    async fn reconcile(&self, table_name: &str, statement: &str) -> Result<Vec<ReconcilerResult>, ArchitectureError> {
        // Table names are unquoted in the templates, so the catalog stores them lowercase.
        let catalog_name = table_name.to_lowercase();

        if !self.table_exists(&catalog_name).await? {
            let result = match sqlx::query(statement).execute(&self.pool).await {
                Ok(_) => ReconcilerResult::new(table_name, ReconcileKind::Created, format!("Created table {}", table_name)),
                Err(e) => ReconcilerResult::new(
                    table_name,
                    ReconcileKind::Warning,
                    format!("Could not create table {}: {}", table_name, e),
                ),
            };
            return Ok(vec![result]);
        }

        let existing = self.existing_columns(&catalog_name).await?;
        let mut results = Vec::new();
        for column in column_definitions(statement) {
            if existing.contains(&column.name) {
                continue;
            }
            let sql = format!("ALTER TABLE {} ADD COLUMN {}", table_name, column.definition);
            tracing::debug!(sql = %sql, "add column");
            let result = match sqlx::query(&sql).execute(&self.pool).await {
                Ok(_) => ReconcilerResult::new(
                    table_name,
                    ReconcileKind::Altered,
                    format!("Added column {}.{}", table_name, column.name),
                ),
                Err(e) => ReconcilerResult::new(
                    table_name,
                    ReconcileKind::Warning,
                    format!("Could not add column {}.{}: {}", table_name, column.name, e),
                ),
            };
            results.push(result);
        }
        if results.is_empty() {
            results.push(ReconcilerResult::new(
                table_name,
                ReconcileKind::Unchanged,
                format!("Table {} is up to date", table_name),
            ));
        }
        Ok(results)
    }
}
