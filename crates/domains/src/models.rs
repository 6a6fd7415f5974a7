//! # Domain Models
//!
//! These structs represent the core entities of Inkwell.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticatable identity with profile data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    pub email: String,
    /// Argon2 PHC string. Never the plaintext password.
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub bio: Option<String>,
    /// Media id of the avatar image, resolved by the MediaStore.
    pub avatar_id: Option<String>,
    pub x_link: Option<String>,
    pub linkedin_link: Option<String>,
    pub github_link: Option<String>,
    pub website_link: Option<String>,
    /// Grants access to the back-office.
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

impl Account {
    /// "First Last" when names are set, otherwise the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// A server-side login session, referenced by an opaque token carried in a
/// signed cookie. Expired rows are deleted when encountered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub account_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// A content rubric an article may optionally belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A published content item owned by one Account.
///
/// The author is assigned server-side at creation and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    /// Media id of the cover image, if any.
    pub cover_id: Option<String>,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An article joined with its author and category names, as the list and
/// detail pages render it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleView {
    pub article: Article,
    pub author_username: String,
    pub category_name: Option<String>,
}

/// A short text attached to one Article. Immutable once created; only the
/// back-office can remove it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub article_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A comment joined with its author's username for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub comment: Comment,
    pub author_username: String,
}

/// A message sent through the public contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Back-office dashboard counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SiteStats {
    pub accounts: i64,
    pub articles: i64,
    pub comments: i64,
    pub unread_contacts: i64,
}
