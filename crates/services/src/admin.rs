//! Back-office use-cases. Every method passes the staff gate first; the
//! ownership gate is bypassed by design.

use std::sync::Arc;

use uuid::Uuid;

use domains::{
    Account, AccountRepo, AppError, ArticleRepo, ArticleView, CommentRepo, CommentView,
    ContactRepo, ContactSubmission, Result, SiteStats,
};

use crate::require_staff;

const RECENT_COMMENTS: i64 = 100;

pub struct AdminService {
    accounts: Arc<dyn AccountRepo>,
    articles: Arc<dyn ArticleRepo>,
    comments: Arc<dyn CommentRepo>,
    contacts: Arc<dyn ContactRepo>,
}

impl AdminService {
    pub fn new(
        accounts: Arc<dyn AccountRepo>,
        articles: Arc<dyn ArticleRepo>,
        comments: Arc<dyn CommentRepo>,
        contacts: Arc<dyn ContactRepo>,
    ) -> Self {
        Self {
            accounts,
            articles,
            comments,
            contacts,
        }
    }

    pub async fn stats(&self, acting: &Account) -> Result<SiteStats> {
        require_staff(acting)?;
        Ok(SiteStats {
            accounts: self.accounts.count().await?,
            articles: self.articles.count().await?,
            comments: self.comments.count().await?,
            unread_contacts: self.contacts.count_unread().await?,
        })
    }

    pub async fn accounts(&self, acting: &Account) -> Result<Vec<Account>> {
        require_staff(acting)?;
        self.accounts.list().await
    }

    pub async fn articles(&self, acting: &Account) -> Result<Vec<ArticleView>> {
        require_staff(acting)?;
        self.articles.views().await
    }

    /// Removes any article regardless of its author.
    pub async fn delete_article(&self, id: Uuid, acting: &Account) -> Result<()> {
        require_staff(acting)?;
        if self.articles.by_id(id).await?.is_none() {
            return Err(AppError::not_found("article", id));
        }
        self.articles.delete(id).await?;
        tracing::info!(article = %id, staff = %acting.username, "article removed by back-office");
        Ok(())
    }

    pub async fn recent_comments(&self, acting: &Account) -> Result<Vec<CommentView>> {
        require_staff(acting)?;
        self.comments.list_recent(RECENT_COMMENTS).await
    }

    /// The only deletion path comments have.
    pub async fn delete_comment(&self, id: Uuid, acting: &Account) -> Result<()> {
        require_staff(acting)?;
        self.comments.delete(id).await?;
        tracing::info!(comment = %id, staff = %acting.username, "comment removed by back-office");
        Ok(())
    }

    pub async fn contacts(&self, acting: &Account) -> Result<Vec<ContactSubmission>> {
        require_staff(acting)?;
        self.contacts.list().await
    }

    pub async fn toggle_contact_read(&self, id: Uuid, acting: &Account) -> Result<()> {
        require_staff(acting)?;
        self.contacts.toggle_read(id).await
    }
}
