//! Fixtures for the HTTP tests: mock-backed application state, canned
//! accounts and articles, and request builders.

#![cfg(feature = "web-axum")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use uuid::Uuid;

use api_adapters::extract::SESSION_COOKIE;
use api_adapters::{AppState, SiteConfig};
use auth_adapters::{Argon2Hasher, SignedCookieCodec};
use domains::{
    Account, Article, ArticleView, Comment, CommentView, MockAccountRepo, MockArticleRepo,
    MockCategoryRepo, MockCommentRepo, MockContactRepo, MockMediaStore, MockSessionRepo, Session,
    SessionCodec,
};
use services::{
    AccountService, AdminService, ArticleService, CategoryService, CommentService, ContactService,
};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const SESSION_TOKEN: &str = "fixture-session-token";

/// One mock per port; tests set expectations, then hand the bundle to
/// [`app`].
#[derive(Default)]
pub struct Mocks {
    pub accounts: MockAccountRepo,
    pub sessions: MockSessionRepo,
    pub articles: MockArticleRepo,
    pub categories: MockCategoryRepo,
    pub comments: MockCommentRepo,
    pub contacts: MockContactRepo,
    pub media: MockMediaStore,
}

pub fn account(username: &str) -> Account {
    Account {
        id: Uuid::now_v7(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        age: None,
        bio: None,
        avatar_id: None,
        x_link: None,
        linkedin_link: None,
        github_link: None,
        website_link: None,
        is_staff: false,
        is_active: true,
        date_joined: Utc::now(),
    }
}

pub fn staff(username: &str) -> Account {
    Account {
        is_staff: true,
        ..account(username)
    }
}

pub fn article(author: &Account) -> Article {
    let now = Utc::now();
    Article {
        id: Uuid::now_v7(),
        title: "Fixture title".to_string(),
        body: "Fixture body text.".to_string(),
        cover_id: None,
        author_id: author.id,
        category_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn article_view(article: &Article, author: &Account) -> ArticleView {
    ArticleView {
        article: article.clone(),
        author_username: author.username.clone(),
        category_name: None,
    }
}

pub fn comment_view(article: &Article, author: &Account, body: &str) -> CommentView {
    CommentView {
        comment: Comment {
            id: Uuid::now_v7(),
            article_id: article.id,
            author_id: author.id,
            body: body.to_string(),
            created_at: Utc::now(),
        },
        author_username: author.username.clone(),
    }
}

/// Makes [`SESSION_TOKEN`] resolve to `viewer`, so requests carrying
/// [`session_cookie`] act as that account.
pub fn allow_login(mocks: &mut Mocks, viewer: &Account) {
    let session = Session {
        token: SESSION_TOKEN.to_string(),
        account_id: viewer.id,
        created_at: Utc::now(),
        expires_at: Utc::now() + Duration::hours(1),
    };
    mocks
        .sessions
        .expect_by_token()
        .withf(|token| token == SESSION_TOKEN)
        .returning(move |_| Ok(Some(session.clone())));
    let viewer = viewer.clone();
    mocks
        .accounts
        .expect_by_id()
        .returning(move |_| Ok(Some(viewer.clone())));
}

/// The signed Cookie header value for [`SESSION_TOKEN`].
pub fn session_cookie() -> String {
    let codec = SignedCookieCodec::new(TEST_SECRET);
    format!("{SESSION_COOKIE}={}", codec.encode(SESSION_TOKEN))
}

pub fn app(mocks: Mocks) -> Router {
    app_with_site(
        mocks,
        SiteConfig {
            debug: true,
            allowed_hosts: Vec::new(),
            trusted_origins: Vec::new(),
            session_max_age: 3600,
        },
    )
}

pub fn app_with_site(mocks: Mocks, site: SiteConfig) -> Router {
    let accounts = Arc::new(mocks.accounts);
    let sessions = Arc::new(mocks.sessions);
    let articles = Arc::new(mocks.articles);
    let categories = Arc::new(mocks.categories);
    let comments = Arc::new(mocks.comments);
    let contacts = Arc::new(mocks.contacts);
    let codec: Arc<dyn SessionCodec> = Arc::new(SignedCookieCodec::new(TEST_SECRET));

    let state = Arc::new(AppState {
        accounts: AccountService::new(
            accounts.clone(),
            sessions,
            Arc::new(Argon2Hasher),
            codec.clone(),
            Duration::hours(1),
        ),
        articles: ArticleService::new(articles.clone(), comments.clone(), categories.clone()),
        comments: CommentService::new(comments.clone(), articles.clone()),
        categories: CategoryService::new(categories),
        contacts: ContactService::new(contacts.clone()),
        admin: AdminService::new(accounts, articles, comments, contacts),
        media: Arc::new(mocks.media),
        codec,
        site,
    });
    api_adapters::router(state)
}

// ── Request builders ─────────────────────────────────────────────────────────

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_authed(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, session_cookie())
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_form_authed(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, session_cookie())
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub const MULTIPART_BOUNDARY: &str = "fixture-boundary-4cc5b8";

/// A multipart/form-data POST with text fields and an optional file part
/// given as (field, filename, content type, bytes).
pub fn post_multipart_authed(
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &str, &[u8])>,
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .header(header::COOKIE, session_cookie())
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("reading response body");
    String::from_utf8(bytes.to_vec()).expect("response body is utf-8")
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("response carries a Location header")
}
