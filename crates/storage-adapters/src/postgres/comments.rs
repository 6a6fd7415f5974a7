use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use domains::{Comment, CommentRepo, CommentView, Result};

use super::map_db_err;

pub struct PgCommentRepo {
    pool: PgPool,
}

impl PgCommentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn view_from_row(row: &PgRow) -> CommentView {
    CommentView {
        comment: Comment {
            id: row.get("id"),
            article_id: row.get("article_id"),
            author_id: row.get("author_id"),
            body: row.get("body"),
            created_at: row.get("created_at"),
        },
        author_username: row.get("author_username"),
    }
}

#[async_trait]
impl CommentRepo for PgCommentRepo {
    async fn insert(&self, comment: Comment) -> Result<Comment> {
        sqlx::query(
            "INSERT INTO comments (id, article_id, author_id, body, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(comment.id)
        .bind(comment.article_id)
        .bind(comment.author_id)
        .bind(&comment.body)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(comment)
    }

    async fn for_article(&self, article_id: Uuid) -> Result<Vec<CommentView>> {
        let rows = sqlx::query(
            "SELECT c.*, acc.username AS author_username FROM comments c \
             JOIN accounts acc ON acc.id = c.author_id \
             WHERE c.article_id = $1 ORDER BY c.created_at ASC",
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(rows.iter().map(view_from_row).collect())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<CommentView>> {
        let rows = sqlx::query(
            "SELECT c.*, acc.username AS author_username FROM comments c \
             JOIN accounts acc ON acc.id = c.author_id \
             ORDER BY c.created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(rows.iter().map(view_from_row).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)
    }
}
