//! Storage adapters: Postgres repositories behind `db-postgres` and the
//! local filesystem media store behind `media-local`.

#[cfg(feature = "media-local")]
pub mod media;
#[cfg(feature = "db-postgres")]
pub mod postgres;

#[cfg(feature = "media-local")]
pub use media::LocalMediaStore;
#[cfg(feature = "db-postgres")]
pub use postgres::{
    connect, PgAccountRepo, PgArticleRepo, PgCategoryRepo, PgCommentRepo, PgContactRepo,
    PgSessionRepo,
};
