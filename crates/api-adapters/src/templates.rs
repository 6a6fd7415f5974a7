//! Askama template structs and the flat view models the pages render.
//!
//! Handlers map domain types into these before rendering so the templates
//! stay free of formatting logic.

use askama::Template;
use chrono::{DateTime, Utc};

use domains::{
    Account, ArticleView, Category, CommentView, ContactSubmission, MediaStore, SiteStats,
    ValidationErrors,
};

const SNIPPET_LEN: usize = 240;

fn format_ts(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Per-field messages flattened for display; non-field errors (collected
/// under "form" or "comment") lose the prefix.
pub fn flatten_errors(errors: &ValidationErrors) -> Vec<String> {
    errors
        .iter()
        .map(|e| {
            if e.field == "form" || e.field == "comment" {
                e.message.clone()
            } else {
                format!("{}: {}", e.field, e.message)
            }
        })
        .collect()
}

/// Navigation context shared by every page.
#[derive(Debug, Clone)]
pub struct Nav {
    pub username: Option<String>,
    pub account_id: String,
    pub is_staff: bool,
}

impl Nav {
    pub fn anonymous() -> Self {
        Self {
            username: None,
            account_id: String::new(),
            is_staff: false,
        }
    }

    pub fn for_account(account: Option<&Account>) -> Self {
        match account {
            Some(a) => Self {
                username: Some(a.username.clone()),
                account_id: a.id.to_string(),
                is_staff: a.is_staff,
            },
            None => Self::anonymous(),
        }
    }
}

// ── View models ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ArticleCard {
    pub id: String,
    pub title: String,
    pub snippet: String,
    pub author: String,
    pub category: Option<String>,
    pub created: String,
    pub cover_thumb: Option<String>,
}

impl ArticleCard {
    pub fn from_view(view: &ArticleView, media: &dyn MediaStore) -> Self {
        let body = view.article.body.as_str();
        let snippet = if body.chars().count() > SNIPPET_LEN {
            let cut: String = body.chars().take(SNIPPET_LEN).collect();
            format!("{cut}…")
        } else {
            body.to_string()
        };
        Self {
            id: view.article.id.to_string(),
            title: view.article.title.clone(),
            snippet,
            author: view.author_username.clone(),
            category: view.category_name.clone(),
            created: format_ts(view.article.created_at),
            cover_thumb: view
                .article
                .cover_id
                .as_deref()
                .map(|id| media.thumbnail_url(id)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArticleDetailView {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: String,
    pub author_id: String,
    pub category: Option<String>,
    pub created: String,
    pub updated: String,
    pub cover_url: Option<String>,
    pub is_owner: bool,
}

impl ArticleDetailView {
    pub fn from_view(view: &ArticleView, viewer: &Account, media: &dyn MediaStore) -> Self {
        Self {
            id: view.article.id.to_string(),
            title: view.article.title.clone(),
            body: view.article.body.clone(),
            author: view.author_username.clone(),
            author_id: view.article.author_id.to_string(),
            category: view.category_name.clone(),
            created: format_ts(view.article.created_at),
            updated: format_ts(view.article.updated_at),
            cover_url: view.article.cover_id.as_deref().map(|id| media.url(id)),
            is_owner: view.article.author_id == viewer.id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentCard {
    pub id: String,
    pub article_id: String,
    pub author: String,
    pub body: String,
    pub created: String,
}

impl CommentCard {
    pub fn from_view(view: &CommentView) -> Self {
        Self {
            id: view.comment.id.to_string(),
            article_id: view.comment.article_id.to_string(),
            author: view.author_username.clone(),
            body: view.comment.body.clone(),
            created: format_ts(view.comment.created_at),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

impl CategoryOption {
    pub fn from_list(categories: &[Category], selected: Option<uuid::Uuid>) -> Vec<Self> {
        categories
            .iter()
            .map(|c| Self {
                id: c.id.to_string(),
                name: c.name.clone(),
                selected: selected == Some(c.id),
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ProfileView {
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub age: Option<i32>,
    pub bio: Option<String>,
    pub x_link: Option<String>,
    pub linkedin_link: Option<String>,
    pub github_link: Option<String>,
    pub website_link: Option<String>,
    pub avatar_url: Option<String>,
    pub joined: String,
    pub is_self: bool,
}

impl ProfileView {
    pub fn from_account(account: &Account, viewer: Option<&Account>, media: &dyn MediaStore) -> Self {
        Self {
            username: account.username.clone(),
            display_name: account.display_name(),
            email: account.email.clone(),
            age: account.age,
            bio: account.bio.clone(),
            x_link: account.x_link.clone(),
            linkedin_link: account.linkedin_link.clone(),
            github_link: account.github_link.clone(),
            website_link: account.website_link.clone(),
            avatar_url: account
                .avatar_id
                .as_deref()
                .map(|id| media.thumbnail_url(id)),
            joined: format_ts(account.date_joined),
            is_self: viewer.is_some_and(|v| v.id == account.id),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileFormData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: String,
    pub bio: String,
    pub x_link: String,
    pub linkedin_link: String,
    pub github_link: String,
    pub website_link: String,
    pub avatar_url: Option<String>,
}

impl ProfileFormData {
    pub fn from_account(account: &Account, media: &dyn MediaStore) -> Self {
        Self {
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            age: account.age.map(|a| a.to_string()).unwrap_or_default(),
            bio: account.bio.clone().unwrap_or_default(),
            x_link: account.x_link.clone().unwrap_or_default(),
            linkedin_link: account.linkedin_link.clone().unwrap_or_default(),
            github_link: account.github_link.clone().unwrap_or_default(),
            website_link: account.website_link.clone().unwrap_or_default(),
            avatar_url: account
                .avatar_id
                .as_deref()
                .map(|id| media.thumbnail_url(id)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccountRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub joined: String,
}

impl AccountRow {
    pub fn from_account(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username.clone(),
            email: account.email.clone(),
            is_staff: account.is_staff,
            joined: format_ts(account.date_joined),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContactRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created: String,
}

impl ContactRow {
    pub fn from_submission(s: &ContactSubmission) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            email: s.email.clone(),
            subject: s.subject.clone(),
            message: s.message.clone(),
            is_read: s.is_read,
            created: format_ts(s.created_at),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
}

// ── Pages ────────────────────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub nav: Nav,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactPage {
    pub nav: Nav,
    pub errors: Vec<String>,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Template)]
#[template(path = "contact_success.html")]
pub struct ContactSuccessPage {
    pub nav: Nav,
}

#[derive(Template)]
#[template(path = "registration/signup.html")]
pub struct SignupPage {
    pub nav: Nav,
    pub errors: Vec<String>,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Template)]
#[template(path = "registration/login.html")]
pub struct LoginPage {
    pub nav: Nav,
    pub errors: Vec<String>,
    pub username: String,
}

#[derive(Template)]
#[template(path = "registration/profile.html")]
pub struct ProfilePage {
    pub nav: Nav,
    pub profile: ProfileView,
}

#[derive(Template)]
#[template(path = "registration/edit_profile.html")]
pub struct EditProfilePage {
    pub nav: Nav,
    pub errors: Vec<String>,
    pub form: ProfileFormData,
}

#[derive(Template)]
#[template(path = "article_list.html")]
pub struct ArticleListPage {
    pub nav: Nav,
    pub articles: Vec<ArticleCard>,
}

#[derive(Template)]
#[template(path = "article_detail.html")]
pub struct ArticleDetailPage {
    pub nav: Nav,
    pub article: ArticleDetailView,
    pub comments: Vec<CommentCard>,
    pub comment_errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "article_form.html")]
pub struct ArticleFormPage {
    pub nav: Nav,
    pub heading: String,
    pub action: String,
    pub errors: Vec<String>,
    pub title: String,
    pub body: String,
    pub categories: Vec<CategoryOption>,
    pub cover_url: Option<String>,
}

#[derive(Template)]
#[template(path = "article_delete.html")]
pub struct ArticleDeletePage {
    pub nav: Nav,
    pub id: String,
    pub title: String,
}

#[derive(Template)]
#[template(path = "forbidden.html")]
pub struct ForbiddenPage {
    pub nav: Nav,
    pub message: String,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundPage {
    pub nav: Nav,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub nav: Nav,
    pub message: String,
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardPage {
    pub nav: Nav,
    pub stats: SiteStats,
}

#[derive(Template)]
#[template(path = "admin/articles.html")]
pub struct AdminArticlesPage {
    pub nav: Nav,
    pub articles: Vec<ArticleCard>,
}

#[derive(Template)]
#[template(path = "admin/comments.html")]
pub struct AdminCommentsPage {
    pub nav: Nav,
    pub comments: Vec<CommentCard>,
}

#[derive(Template)]
#[template(path = "admin/accounts.html")]
pub struct AdminAccountsPage {
    pub nav: Nav,
    pub accounts: Vec<AccountRow>,
}

#[derive(Template)]
#[template(path = "admin/categories.html")]
pub struct AdminCategoriesPage {
    pub nav: Nav,
    pub errors: Vec<String>,
    pub categories: Vec<CategoryRow>,
}

#[derive(Template)]
#[template(path = "admin/contacts.html")]
pub struct AdminContactsPage {
    pub nav: Nav,
    pub contacts: Vec<ContactRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_truncated_with_ellipsis() {
        use domains::{Article, MockMediaStore};
        let now = Utc::now();
        let view = ArticleView {
            article: Article {
                id: uuid::Uuid::now_v7(),
                title: "T".into(),
                body: "x".repeat(500),
                cover_id: None,
                author_id: uuid::Uuid::now_v7(),
                category_id: None,
                created_at: now,
                updated_at: now,
            },
            author_username: "wren".into(),
            category_name: None,
        };
        let media = MockMediaStore::new();
        let card = ArticleCard::from_view(&view, &media);
        assert!(card.snippet.ends_with('…'));
        assert_eq!(card.snippet.chars().count(), SNIPPET_LEN + 1);
    }

    #[test]
    fn article_list_page_renders() {
        let page = ArticleListPage {
            nav: Nav::anonymous(),
            articles: vec![ArticleCard {
                id: "a1".into(),
                title: "Hello".into(),
                snippet: "World".into(),
                author: "wren".into(),
                category: Some("rust".into()),
                created: "2026-01-01 00:00".into(),
                cover_thumb: None,
            }],
        };
        let html = page.render().unwrap();
        assert!(html.contains("Hello"));
        assert!(html.contains("wren"));
    }

    #[test]
    fn html_in_user_content_is_escaped() {
        let page = ArticleListPage {
            nav: Nav::anonymous(),
            articles: vec![ArticleCard {
                id: "a1".into(),
                title: "<script>alert(1)</script>".into(),
                snippet: String::new(),
                author: "wren".into(),
                category: None,
                created: String::new(),
                cover_thumb: None,
            }],
        };
        let html = page.render().unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn errors_flatten_with_field_prefixes() {
        let mut v = ValidationErrors::new();
        v.push("username", "taken");
        v.push("form", "bad credentials");
        let flat = flatten_errors(&v);
        assert_eq!(flat, vec!["username: taken".to_string(), "bad credentials".to_string()]);
    }
}
