use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use domains::{ContactRepo, ContactSubmission, Result};

use super::map_db_err;

pub struct PgContactRepo {
    pool: PgPool,
}

impl PgContactRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn submission_from_row(row: &PgRow) -> ContactSubmission {
    ContactSubmission {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        subject: row.get("subject"),
        message: row.get("message"),
        is_read: row.get("is_read"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl ContactRepo for PgContactRepo {
    async fn insert(&self, submission: ContactSubmission) -> Result<ContactSubmission> {
        sqlx::query(
            "INSERT INTO contact_submissions (id, name, email, subject, message, is_read, \
             created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(submission.id)
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&submission.subject)
        .bind(&submission.message)
        .bind(submission.is_read)
        .bind(submission.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(submission)
    }

    async fn list(&self) -> Result<Vec<ContactSubmission>> {
        let rows = sqlx::query("SELECT * FROM contact_submissions ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(rows.iter().map(submission_from_row).collect())
    }

    async fn toggle_read(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE contact_submissions SET is_read = NOT is_read WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected() == 0 {
            return Err(domains::AppError::not_found("contact submission", id));
        }
        Ok(())
    }

    async fn count_unread(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM contact_submissions WHERE is_read = FALSE")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)
    }
}
