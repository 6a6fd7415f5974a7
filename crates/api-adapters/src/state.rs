//! Shared state handed to every handler.

use std::sync::Arc;

use domains::{MediaStore, SessionCodec};
use services::{
    AccountService, AdminService, ArticleService, CategoryService, CommentService, ContactService,
};

/// Site-level knobs the web layer needs, extracted from the settings by the
/// binary so this crate stays independent of the config format.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub debug: bool,
    pub allowed_hosts: Vec<String>,
    pub trusted_origins: Vec<String>,
    /// Seconds the session cookie lives.
    pub session_max_age: i64,
}

pub struct AppState {
    pub accounts: AccountService,
    pub articles: ArticleService,
    pub comments: CommentService,
    pub categories: CategoryService,
    pub contacts: ContactService,
    pub admin: AdminService,
    pub media: Arc<dyn MediaStore>,
    pub codec: Arc<dyn SessionCodec>,
    pub site: SiteConfig,
}
