//! PostgreSQL option store. The `_sys_options` table lives in a schema named from `ARCHITECT_SCHEMA` env (default `architect`).

use crate::error::{ArchitectureError, ConfigError};
use crate::host::OptionStore;
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

/// Schema holding `_sys_options`. From env `ARCHITECT_SCHEMA`, default `architect`.
pub fn options_schema() -> String {
    std::env::var("ARCHITECT_SCHEMA").unwrap_or_else(|_| "architect".into())
}

const OPTIONS_TABLE: &str = "_sys_options";

/// Create schema from `ARCHITECT_SCHEMA` env if not exists, then `_sys_options`.
pub async fn ensure_options_table(pool: &PgPool) -> Result<(), ArchitectureError> {
    let schema = options_schema();
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
        .execute(pool)
        .await?;
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            name TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        format!("{}.{}", schema, OPTIONS_TABLE)
    );
    sqlx::query(&ddl).execute(pool).await?;
    Ok(())
}

/// Option store backed by `_sys_options`. Call [`ensure_options_table`] first.
#[derive(Clone)]
pub struct PgOptionStore {
    pool: PgPool,
    /// Schema-qualified options table, fixed at construction.
    table: String,
}

impl PgOptionStore {
    pub fn new(pool: PgPool) -> Self {
        PgOptionStore {
            pool,
            table: format!("{}.{}", options_schema(), OPTIONS_TABLE),
        }
    }
}

#[async_trait]
impl OptionStore for PgOptionStore {
    async fn get_option(&self, name: &str) -> Result<Option<String>, ArchitectureError> {
        let sql = format!("SELECT value FROM {} WHERE name = $1", self.table);
        tracing::debug!(sql = %sql, "query");
        let value = sqlx::query_scalar::<_, String>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn add_option(&self, name: &str, value: &str) -> Result<bool, ArchitectureError> {
        let sql = format!(
            "INSERT INTO {} (name, value, updated_at) VALUES ($1, $2, NOW()) ON CONFLICT (name) DO NOTHING",
            self.table
        );
        tracing::debug!(sql = %sql, "query");
        let done = sqlx::query(&sql).bind(name).bind(value).execute(&self.pool).await?;
        Ok(done.rows_affected() > 0)
    }

    async fn update_option(&self, name: &str, value: &str) -> Result<(), ArchitectureError> {
        let sql = format!(
            "INSERT INTO {} (name, value, updated_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (name) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
            self.table
        );
        tracing::debug!(sql = %sql, "query");
        sqlx::query(&sql).bind(name).bind(value).execute(&self.pool).await?;
        Ok(())
    }
}

/// Create the database named in `database_url` if it does not exist yet, by connecting to the
/// `postgres` maintenance database on the same server. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), ArchitectureError> {
    let (admin, db_name) = maintenance_options(database_url)?;
    let Some(db_name) = db_name.filter(|n| n != MAINTENANCE_DB) else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

const MAINTENANCE_DB: &str = "postgres";

/// Connect options for the maintenance database, plus the database `database_url` names.
fn maintenance_options(database_url: &str) -> Result<(PgConnectOptions, Option<String>), ConfigError> {
    let target = PgConnectOptions::from_str(database_url)
        .map_err(|e| ConfigError::Settings(format!("invalid DATABASE_URL: {}", e)))?;
    let db_name = target.get_database().map(str::to_string).filter(|n| !n.is_empty());
    Ok((target.database(MAINTENANCE_DB), db_name))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
