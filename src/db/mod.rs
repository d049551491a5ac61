//! Query functions over the relational schema in `migrations/`.
//!
//! Every function takes the shared `PgPool` and returns `AppError` on failure,
//! so handlers can chain them with `?`.

pub mod boards;
pub mod comments;
pub mod tasks;
pub mod users;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;
use crate::error::AppError;

/// Opens the connection pool and applies pending migrations.
pub async fn connect(config: &Config) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Migration failed: {}", e)))?;

    Ok(pool)
}
