use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use domains::{Account, AccountRepo, Result};

use super::map_db_err;

pub struct PgAccountRepo {
    pool: PgPool,
}

impl PgAccountRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn account_from_row(row: &PgRow) -> Account {
    Account {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        age: row.get("age"),
        bio: row.get("bio"),
        avatar_id: row.get("avatar_id"),
        x_link: row.get("x_link"),
        linkedin_link: row.get("linkedin_link"),
        github_link: row.get("github_link"),
        website_link: row.get("website_link"),
        is_staff: row.get("is_staff"),
        is_active: row.get("is_active"),
        date_joined: row.get("date_joined"),
    }
}

#[async_trait]
impl AccountRepo for PgAccountRepo {
    async fn insert(&self, account: Account) -> Result<Account> {
        sqlx::query(
            "INSERT INTO accounts (id, username, email, password_hash, first_name, last_name, \
             age, bio, avatar_id, x_link, linkedin_link, github_link, website_link, \
             is_staff, is_active, date_joined) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(account.id)
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.age)
        .bind(&account.bio)
        .bind(&account.avatar_id)
        .bind(&account.x_link)
        .bind(&account.linkedin_link)
        .bind(&account.github_link)
        .bind(&account.website_link)
        .bind(account.is_staff)
        .bind(account.is_active)
        .bind(account.date_joined)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(account)
    }

    async fn by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let row = sqlx::query("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(row.as_ref().map(account_from_row))
    }

    async fn by_username(&self, username: &str) -> Result<Option<Account>> {
        let row = sqlx::query("SELECT * FROM accounts WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(row.as_ref().map(account_from_row))
    }

    async fn update(&self, account: Account) -> Result<Account> {
        sqlx::query(
            "UPDATE accounts SET email = $2, first_name = $3, last_name = $4, age = $5, \
             bio = $6, avatar_id = $7, x_link = $8, linkedin_link = $9, github_link = $10, \
             website_link = $11, is_staff = $12, is_active = $13 WHERE id = $1",
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.age)
        .bind(&account.bio)
        .bind(&account.avatar_id)
        .bind(&account.x_link)
        .bind(&account.linkedin_link)
        .bind(&account.github_link)
        .bind(&account.website_link)
        .bind(account.is_staff)
        .bind(account.is_active)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(account)
    }

    async fn list(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query("SELECT * FROM accounts ORDER BY date_joined DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(rows.iter().map(account_from_row).collect())
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)
    }
}
