//! Entry point: loads settings, wires the adapters into the services, and
//! serves the site.

use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use secrecy::ExposeSecret;
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

use api_adapters::{AppState, SiteConfig};
use auth_adapters::{Argon2Hasher, SignedCookieCodec};
use domains::{MediaStore, SessionCodec};
use services::{
    AccountService, AdminService, ArticleService, CategoryService, CommentService, ContactService,
};
use storage_adapters::{
    LocalMediaStore, PgAccountRepo, PgArticleRepo, PgCategoryRepo, PgCommentRepo, PgContactRepo,
    PgSessionRepo,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = configs::Settings::load().context("loading settings")?;

    let pool = storage_adapters::connect(
        settings.database.url.expose_secret(),
        settings.database.max_connections,
    )
    .await
    .context("connecting to the database")?;

    let accounts_repo = Arc::new(PgAccountRepo::new(pool.clone()));
    let sessions_repo = Arc::new(PgSessionRepo::new(pool.clone()));
    let articles_repo = Arc::new(PgArticleRepo::new(pool.clone()));
    let categories_repo = Arc::new(PgCategoryRepo::new(pool.clone()));
    let comments_repo = Arc::new(PgCommentRepo::new(pool.clone()));
    let contacts_repo = Arc::new(PgContactRepo::new(pool.clone()));

    let media: Arc<dyn MediaStore> = Arc::new(LocalMediaStore::new(
        settings.media.root.clone(),
        settings.media.url_prefix.clone(),
    ));
    let codec: Arc<dyn SessionCodec> = Arc::new(SignedCookieCodec::new(
        settings.security.secret_key.expose_secret(),
    ));

    let state = Arc::new(AppState {
        accounts: AccountService::new(
            accounts_repo.clone(),
            sessions_repo,
            Arc::new(Argon2Hasher),
            codec.clone(),
            Duration::hours(settings.security.session_ttl_hours),
        ),
        articles: ArticleService::new(
            articles_repo.clone(),
            comments_repo.clone(),
            categories_repo.clone(),
        ),
        comments: CommentService::new(comments_repo.clone(), articles_repo.clone()),
        categories: CategoryService::new(categories_repo),
        contacts: ContactService::new(contacts_repo.clone()),
        admin: AdminService::new(accounts_repo, articles_repo, comments_repo, contacts_repo),
        media,
        codec,
        site: SiteConfig {
            debug: settings.debug,
            allowed_hosts: settings.security.allowed_hosts.clone(),
            trusted_origins: settings.security.trusted_origins.clone(),
            session_max_age: settings.security.session_ttl_hours * 3600,
        },
    });

    let media_prefix = settings.media.url_prefix.trim_end_matches('/').to_string();
    let app = api_adapters::router(state)
        .nest_service("/static", ServeDir::new("static"))
        .nest_service(&media_prefix, ServeDir::new(&settings.media.root));

    let addr = settings.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, debug = settings.debug, "inkwell listening");
    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
