//! Article use-cases: listing, detail, and owner-gated mutation.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use domains::{
    Account, AppError, Article, ArticleRepo, ArticleView, CategoryRepo, CommentRepo, CommentView,
    Result, ValidationErrors,
};

/// Form input for creating or editing an article. `cover_id` is set only
/// when a new cover image was uploaded in the same request.
#[derive(Debug, Clone, Default)]
pub struct ArticleFields {
    pub title: String,
    pub body: String,
    pub category_id: Option<Uuid>,
    pub cover_id: Option<String>,
}

pub struct ArticleService {
    articles: Arc<dyn ArticleRepo>,
    comments: Arc<dyn CommentRepo>,
    categories: Arc<dyn CategoryRepo>,
}

impl ArticleService {
    pub fn new(
        articles: Arc<dyn ArticleRepo>,
        comments: Arc<dyn CommentRepo>,
        categories: Arc<dyn CategoryRepo>,
    ) -> Self {
        Self {
            articles,
            comments,
            categories,
        }
    }

    /// All articles, newest first. Deliberately unpaginated.
    pub async fn list(&self) -> Result<Vec<ArticleView>> {
        self.articles.views().await
    }

    /// One article with its comments, oldest comment first.
    pub async fn get(&self, id: Uuid) -> Result<(ArticleView, Vec<CommentView>)> {
        let view = self
            .articles
            .view(id)
            .await?
            .ok_or_else(|| AppError::not_found("article", id))?;
        let comments = self.comments.for_article(id).await?;
        Ok((view, comments))
    }

    /// Creates an article. The author is always the acting account; nothing
    /// the client sends can override it.
    pub async fn create(&self, input: ArticleFields, author: &Account) -> Result<Article> {
        self.validate(&input).await?;

        let now = Utc::now();
        let article = self
            .articles
            .insert(Article {
                id: Uuid::now_v7(),
                title: input.title.trim().to_string(),
                body: input.body,
                cover_id: input.cover_id,
                author_id: author.id,
                category_id: input.category_id,
                created_at: now,
                updated_at: now,
            })
            .await?;
        tracing::info!(article = %article.id, author = %author.username, "article created");
        Ok(article)
    }

    /// Updates an article behind the ownership gate. The author never changes.
    pub async fn update(&self, id: Uuid, input: ArticleFields, acting: &Account) -> Result<Article> {
        let mut article = self.get_owned(id, acting).await?;
        self.validate(&input).await?;

        article.title = input.title.trim().to_string();
        article.body = input.body;
        article.category_id = input.category_id;
        if let Some(cover_id) = input.cover_id {
            article.cover_id = Some(cover_id);
        }
        article.updated_at = Utc::now();

        self.articles.update(article).await
    }

    /// Deletes an article behind the ownership gate. Comments cascade.
    pub async fn delete(&self, id: Uuid, acting: &Account) -> Result<()> {
        let article = self.get_owned(id, acting).await?;
        self.articles.delete(article.id).await?;
        tracing::info!(article = %id, acting = %acting.username, "article deleted");
        Ok(())
    }

    /// Fetches the article and applies the ownership gate: only the author
    /// may mutate it. Handlers use this for the edit and delete-confirm
    /// pages so the gate also covers form display.
    pub async fn get_owned(&self, id: Uuid, acting: &Account) -> Result<Article> {
        let article = self
            .articles
            .by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("article", id))?;
        if article.author_id != acting.id {
            return Err(AppError::Forbidden(
                "only the author may modify this article".into(),
            ));
        }
        Ok(article)
    }

    async fn validate(&self, input: &ArticleFields) -> Result<()> {
        let mut errors = ValidationErrors::new();
        let title = input.title.trim();
        if title.is_empty() {
            errors.push("title", "title is required");
        } else if title.len() > 200 {
            errors.push("title", "title must be at most 200 characters");
        }
        if input.body.trim().is_empty() {
            errors.push("body", "body is required");
        }
        if let Some(category_id) = input.category_id {
            if self.categories.by_id(category_id).await?.is_none() {
                errors.push("category", "unknown category");
            }
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::{Category, MockArticleRepo, MockCategoryRepo, MockCommentRepo};
    use mockall::predicate::eq;

    fn account(username: &str) -> Account {
        Account {
            id: Uuid::now_v7(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$stub".into(),
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

    fn article(author_id: Uuid) -> Article {
        let now = Utc::now();
        Article {
            id: Uuid::now_v7(),
            title: "T".into(),
            body: "B".into(),
            cover_id: None,
            author_id,
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(
        articles: MockArticleRepo,
        comments: MockCommentRepo,
        categories: MockCategoryRepo,
    ) -> ArticleService {
        ArticleService::new(Arc::new(articles), Arc::new(comments), Arc::new(categories))
    }

    #[tokio::test]
    async fn create_forces_author_to_acting_account() {
        let author = account("wren");
        let author_id = author.id;

        let mut articles = MockArticleRepo::new();
        articles
            .expect_insert()
            .withf(move |a| a.author_id == author_id && a.title == "T")
            .returning(|a| Ok(a));

        let svc = service(articles, MockCommentRepo::new(), MockCategoryRepo::new());
        let created = svc
            .create(
                ArticleFields {
                    title: " T ".into(),
                    body: "B".into(),
                    ..Default::default()
                },
                &author,
            )
            .await
            .unwrap();
        assert_eq!(created.author_id, author_id);
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn create_rejects_blank_fields() {
        let svc = service(
            MockArticleRepo::new(),
            MockCommentRepo::new(),
            MockCategoryRepo::new(),
        );
        let err = svc
            .create(ArticleFields::default(), &account("wren"))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(v) => {
                assert!(!v.for_field("title").is_empty());
                assert!(!v.for_field("body").is_empty());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_rejects_unknown_category() {
        let missing = Uuid::now_v7();
        let mut categories = MockCategoryRepo::new();
        categories
            .expect_by_id()
            .with(eq(missing))
            .returning(|_| Ok(None));

        let svc = service(MockArticleRepo::new(), MockCommentRepo::new(), categories);
        let err = svc
            .create(
                ArticleFields {
                    title: "T".into(),
                    body: "B".into(),
                    category_id: Some(missing),
                    ..Default::default()
                },
                &account("wren"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_accepts_known_category() {
        let cat = Category {
            id: Uuid::now_v7(),
            name: "rust".into(),
            created_at: Utc::now(),
        };
        let cat_id = cat.id;
        let mut categories = MockCategoryRepo::new();
        categories
            .expect_by_id()
            .with(eq(cat_id))
            .return_once(move |_| Ok(Some(cat)));

        let mut articles = MockArticleRepo::new();
        articles
            .expect_insert()
            .withf(move |a| a.category_id == Some(cat_id))
            .returning(|a| Ok(a));

        let svc = service(articles, MockCommentRepo::new(), categories);
        svc.create(
            ArticleFields {
                title: "T".into(),
                body: "B".into(),
                category_id: Some(cat_id),
                ..Default::default()
            },
            &account("wren"),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn update_rejects_non_author() {
        let owner = account("wren");
        let stranger = account("corvid");
        let target = article(owner.id);
        let target_id = target.id;

        let mut articles = MockArticleRepo::new();
        articles
            .expect_by_id()
            .with(eq(target_id))
            .return_once(move |_| Ok(Some(target)));

        let svc = service(articles, MockCommentRepo::new(), MockCategoryRepo::new());
        let err = svc
            .update(
                target_id,
                ArticleFields {
                    title: "new".into(),
                    body: "new".into(),
                    ..Default::default()
                },
                &stranger,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn update_preserves_author() {
        let owner = account("wren");
        let target = article(owner.id);
        let target_id = target.id;
        let owner_id = owner.id;

        let mut articles = MockArticleRepo::new();
        articles
            .expect_by_id()
            .return_once(move |_| Ok(Some(target)));
        articles
            .expect_update()
            .withf(move |a| a.author_id == owner_id && a.title == "new title")
            .returning(|a| Ok(a));

        let svc = service(articles, MockCommentRepo::new(), MockCategoryRepo::new());
        svc.update(
            target_id,
            ArticleFields {
                title: "new title".into(),
                body: "new body".into(),
                ..Default::default()
            },
            &owner,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn delete_rejects_non_author_and_keeps_article() {
        let owner = account("wren");
        let stranger = account("corvid");
        let target = article(owner.id);
        let target_id = target.id;

        let mut articles = MockArticleRepo::new();
        articles
            .expect_by_id()
            .return_once(move |_| Ok(Some(target)));
        // No expect_delete: the mock panics if delete is reached.

        let svc = service(articles, MockCommentRepo::new(), MockCategoryRepo::new());
        let err = svc.delete(target_id, &stranger).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn delete_by_author_succeeds() {
        let owner = account("wren");
        let target = article(owner.id);
        let target_id = target.id;

        let mut articles = MockArticleRepo::new();
        articles
            .expect_by_id()
            .return_once(move |_| Ok(Some(target)));
        articles
            .expect_delete()
            .with(eq(target_id))
            .times(1)
            .returning(|_| Ok(()));

        let svc = service(articles, MockCommentRepo::new(), MockCategoryRepo::new());
        svc.delete(target_id, &owner).await.unwrap();
    }

    #[tokio::test]
    async fn get_unknown_article_is_not_found() {
        let mut articles = MockArticleRepo::new();
        articles.expect_view().returning(|_| Ok(None));

        let svc = service(articles, MockCommentRepo::new(), MockCategoryRepo::new());
        let err = svc.get(Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
