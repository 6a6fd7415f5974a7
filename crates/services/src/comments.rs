//! Comment use-cases. Comments are append-only for end users.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use domains::{
    Account, AppError, ArticleRepo, Comment, CommentRepo, Result, ValidationErrors,
};

const MAX_COMMENT_LEN: usize = 2000;

pub struct CommentService {
    comments: Arc<dyn CommentRepo>,
    articles: Arc<dyn ArticleRepo>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepo>, articles: Arc<dyn ArticleRepo>) -> Self {
        Self { comments, articles }
    }

    /// Attaches a comment to an existing article. Author and article are
    /// bound server-side; client-supplied ids are never trusted.
    pub async fn submit(&self, article_id: Uuid, body: &str, acting: &Account) -> Result<Comment> {
        if self.articles.by_id(article_id).await?.is_none() {
            return Err(AppError::not_found("article", article_id));
        }

        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::Validation(ValidationErrors::single(
                "comment",
                "comment must not be empty",
            )));
        }
        if body.len() > MAX_COMMENT_LEN {
            return Err(AppError::Validation(ValidationErrors::single(
                "comment",
                format!("comment must be at most {MAX_COMMENT_LEN} characters"),
            )));
        }

        self.comments
            .insert(Comment {
                id: Uuid::now_v7(),
                article_id,
                author_id: acting.id,
                body: body.to_string(),
                created_at: Utc::now(),
            })
            .await
    }
}
