//! # Port Traits
//!
//! The contracts the adapter crates implement. Services depend only on these,
//! which keeps every use-case testable against mockall doubles.

use async_trait::async_trait;
use bytes::Bytes;
use mime::Mime;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Account, Article, ArticleView, Category, Comment, CommentView, ContactSubmission, Session,
};

/// Persistence contract for accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AccountRepo: Send + Sync {
    /// Inserts a new account. A duplicate username surfaces as `Conflict`.
    async fn insert(&self, account: Account) -> Result<Account>;
    async fn by_id(&self, id: Uuid) -> Result<Option<Account>>;
    async fn by_username(&self, username: &str) -> Result<Option<Account>>;
    /// Persists profile mutations. Identity fields and the password hash are
    /// written as-is; callers are responsible for not touching them.
    async fn update(&self, account: Account) -> Result<Account>;
    async fn list(&self) -> Result<Vec<Account>>;
    async fn count(&self) -> Result<i64>;
}

/// Persistence contract for login sessions.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SessionRepo: Send + Sync {
    async fn insert(&self, session: Session) -> Result<Session>;
    async fn by_token(&self, token: &str) -> Result<Option<Session>>;
    async fn delete(&self, token: &str) -> Result<()>;
}

/// Persistence contract for articles, including the joined views the pages
/// render.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ArticleRepo: Send + Sync {
    async fn insert(&self, article: Article) -> Result<Article>;
    async fn by_id(&self, id: Uuid) -> Result<Option<Article>>;
    async fn view(&self, id: Uuid) -> Result<Option<ArticleView>>;
    /// All articles, newest first. Deliberately unpaginated.
    async fn views(&self) -> Result<Vec<ArticleView>>;
    async fn update(&self, article: Article) -> Result<Article>;
    /// Deletes the article; comments go with it via the FK cascade.
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn count(&self) -> Result<i64>;
}

/// Persistence contract for categories.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CategoryRepo: Send + Sync {
    /// Inserts a new category. A duplicate name surfaces as `Conflict`.
    async fn insert(&self, category: Category) -> Result<Category>;
    async fn by_id(&self, id: Uuid) -> Result<Option<Category>>;
    async fn list(&self) -> Result<Vec<Category>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Persistence contract for comments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn insert(&self, comment: Comment) -> Result<Comment>;
    /// Comments on one article, oldest first.
    async fn for_article(&self, article_id: Uuid) -> Result<Vec<CommentView>>;
    /// Most recent comments across all articles, for the back-office.
    async fn list_recent(&self, limit: i64) -> Result<Vec<CommentView>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn count(&self) -> Result<i64>;
}

/// Persistence contract for contact-form submissions.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ContactRepo: Send + Sync {
    async fn insert(&self, submission: ContactSubmission) -> Result<ContactSubmission>;
    /// All submissions, newest first.
    async fn list(&self) -> Result<Vec<ContactSubmission>>;
    /// Flips the read flag; unknown ids surface as `NotFound`.
    async fn toggle_read(&self, id: Uuid) -> Result<()>;
    async fn count_unread(&self) -> Result<i64>;
}

/// Media storage contract for avatar and cover uploads.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Saves raw bytes and returns a media id for the owning entity.
    async fn save(&self, data: Bytes, content_type: &Mime) -> Result<String>;
    /// Public URL of the original media.
    fn url(&self, media_id: &str) -> String;
    /// Public URL of the thumbnail.
    fn thumbnail_url(&self, media_id: &str) -> String;
}

/// Password hashing contract. Synchronous: Argon2 runs on the calling thread.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Issues opaque session tokens and converts them to and from the signed
/// cookie value the browser carries.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SessionCodec: Send + Sync {
    /// A fresh random token.
    fn issue(&self) -> String;
    /// Cookie value: the token plus an HMAC tag.
    fn encode(&self, token: &str) -> String;
    /// Verifies the tag and returns the token, or None when tampered.
    fn decode(&self, value: &str) -> Option<String>;
}
