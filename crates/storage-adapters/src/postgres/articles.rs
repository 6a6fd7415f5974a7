use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use domains::{Article, ArticleRepo, ArticleView, Result};

use super::map_db_err;

pub struct PgArticleRepo {
    pool: PgPool,
}

impl PgArticleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn article_from_row(row: &PgRow) -> Article {
    Article {
        id: row.get("id"),
        title: row.get("title"),
        body: row.get("body"),
        cover_id: row.get("cover_id"),
        author_id: row.get("author_id"),
        category_id: row.get("category_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn view_from_row(row: &PgRow) -> ArticleView {
    ArticleView {
        article: article_from_row(row),
        author_username: row.get("author_username"),
        category_name: row.get("category_name"),
    }
}

const VIEW_SELECT: &str = "SELECT a.*, acc.username AS author_username, c.name AS category_name \
     FROM articles a \
     JOIN accounts acc ON acc.id = a.author_id \
     LEFT JOIN categories c ON c.id = a.category_id";

#[async_trait]
impl ArticleRepo for PgArticleRepo {
    async fn insert(&self, article: Article) -> Result<Article> {
        sqlx::query(
            "INSERT INTO articles (id, title, body, cover_id, author_id, category_id, \
             created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.body)
        .bind(&article.cover_id)
        .bind(article.author_id)
        .bind(article.category_id)
        .bind(article.created_at)
        .bind(article.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(article)
    }

    async fn by_id(&self, id: Uuid) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(row.as_ref().map(article_from_row))
    }

    async fn view(&self, id: Uuid) -> Result<Option<ArticleView>> {
        let row = sqlx::query(&format!("{VIEW_SELECT} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(row.as_ref().map(view_from_row))
    }

    async fn views(&self) -> Result<Vec<ArticleView>> {
        let rows = sqlx::query(&format!("{VIEW_SELECT} ORDER BY a.created_at DESC"))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(rows.iter().map(view_from_row).collect())
    }

    async fn update(&self, article: Article) -> Result<Article> {
        // author_id is immutable: deliberately absent from the SET list.
        sqlx::query(
            "UPDATE articles SET title = $2, body = $3, cover_id = $4, category_id = $5, \
             updated_at = $6 WHERE id = $1",
        )
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.body)
        .bind(&article.cover_id)
        .bind(article.category_id)
        .bind(article.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(article)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)
    }
}
