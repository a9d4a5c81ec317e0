pub mod ids;
mod models;

pub use models::*;

use anyhow::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

pub type DbPool = SqlitePool;

/// Execute a SQL migration file, properly handling comments
async fn execute_sql(pool: &SqlitePool, sql: &str) -> Result<()> {
    for statement in sql.split(';') {
        // Strip SQL comment lines (lines starting with --)
        let cleaned: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = cleaned.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

pub async fn init(data_dir: &Path) -> Result<DbPool> {
    let db_path = data_dir.join("freightr.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    info!("Initializing database at {}", db_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Enable WAL mode for better concurrency
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;

    info!("Database initialized successfully");
    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Running database migrations...");

    // Migration 001: Staff accounts
    execute_sql(pool, include_str!("../../migrations/001_initial.sql")).await?;

    // Migration 002: Clients (OTP login)
    let has_clients_table: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name='clients'")
            .fetch_optional(pool)
            .await?;
    if has_clients_table.is_none() {
        execute_sql(pool, include_str!("../../migrations/002_clients.sql")).await?;
    }

    // Migration 003: Bookings, containers, warehouses, payments
    let has_bookings_table: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name='bookings'")
            .fetch_optional(pool)
            .await?;
    if has_bookings_table.is_none() {
        execute_sql(pool, include_str!("../../migrations/003_logistics.sql")).await?;
    }

    // Migration 004: Identifier sequence counters
    let has_counters_table: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name='id_counters'")
            .fetch_optional(pool)
            .await?;
    if has_counters_table.is_none() {
        execute_sql(pool, include_str!("../../migrations/004_id_counters.sql")).await?;
    }

    info!("Migrations completed");
    Ok(())
}

/// In-memory database for tests. A single connection keeps every query on
/// the same :memory: instance.
#[cfg(test)]
pub async fn init_memory() -> Result<DbPool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
