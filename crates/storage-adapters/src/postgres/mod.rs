//! # Postgres Repositories
//!
//! Implements the data mapping between the relational model and the domain
//! models with runtime queries; embedded migrations run at connection time.

mod accounts;
mod articles;
mod categories;
mod comments;
mod contacts;
mod sessions;

pub use accounts::PgAccountRepo;
pub use articles::PgArticleRepo;
pub use categories::PgCategoryRepo;
pub use comments::PgCommentRepo;
pub use contacts::PgContactRepo;
pub use sessions::PgSessionRepo;

use domains::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Opens the pool and applies pending migrations.
pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;
    sqlx::migrate!().run(&pool).await?;
    tracing::info!(max_connections, "database pool ready");
    Ok(pool)
}

/// Unique violations become `Conflict` so the services can turn them into
/// field errors; everything else is infrastructure.
pub(crate) fn map_db_err(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return AppError::Conflict(db.message().to_string());
        }
    }
    AppError::Internal(format!("database error: {e}"))
}
