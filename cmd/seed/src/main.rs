//! Development seeding: a staff account, a starter category, and one
//! article, so a fresh database has something to look at. Safe to run
//! repeatedly; existing rows are left alone.

use anyhow::Context;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use auth_adapters::Argon2Hasher;
use domains::PasswordHasher;

const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin-dev-password";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = configs::Settings::load().context("loading settings")?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(settings.database.url.expose_secret())
        .await
        .context("connecting to the database")?;
    sqlx::migrate!("../../crates/storage-adapters/migrations")
        .run(&pool)
        .await?;

    let password_hash = Argon2Hasher
        .hash(ADMIN_PASSWORD)
        .map_err(|e| anyhow::anyhow!("hashing seed password: {e}"))?;

    let admin_id = Uuid::now_v7();
    let inserted = sqlx::query(
        "INSERT INTO accounts (id, username, email, password_hash, is_staff)
         VALUES ($1, $2, $3, $4, TRUE)
         ON CONFLICT (username) DO NOTHING",
    )
    .bind(admin_id)
    .bind(ADMIN_USERNAME)
    .bind("admin@example.com")
    .bind(&password_hash)
    .execute(&pool)
    .await?
    .rows_affected();

    let author_id: Uuid =
        sqlx::query_scalar("SELECT id FROM accounts WHERE username = $1")
            .bind(ADMIN_USERNAME)
            .fetch_one(&pool)
            .await?;

    let category_id = Uuid::now_v7();
    sqlx::query(
        "INSERT INTO categories (id, name) VALUES ($1, $2)
         ON CONFLICT (name) DO NOTHING",
    )
    .bind(category_id)
    .bind("General")
    .execute(&pool)
    .await?;

    let has_articles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
        .fetch_one(&pool)
        .await?;
    if has_articles == 0 {
        sqlx::query(
            "INSERT INTO articles (id, title, body, author_id, category_id)
             VALUES ($1, $2, $3, $4,
                     (SELECT id FROM categories WHERE name = 'General'))",
        )
        .bind(Uuid::now_v7())
        .bind("Welcome to Inkwell")
        .bind("This article was created by the seed tool. Log in as the admin account to edit or delete it.")
        .bind(author_id)
        .execute(&pool)
        .await?;
    }

    if inserted > 0 {
        println!("seeded staff account '{ADMIN_USERNAME}' (password: {ADMIN_PASSWORD})");
    } else {
        println!("staff account '{ADMIN_USERNAME}' already present, nothing to do");
    }
    Ok(())
}
