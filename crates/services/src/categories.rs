//! Category use-cases. Creation and deletion are back-office operations.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use domains::{Account, AppError, Category, CategoryRepo, Result, ValidationErrors};

use crate::require_staff;

pub struct CategoryService {
    categories: Arc<dyn CategoryRepo>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepo>) -> Self {
        Self { categories }
    }

    /// For the article form's dropdown. The back-office screen uses
    /// [`manage`](Self::manage).
    pub async fn list(&self) -> Result<Vec<Category>> {
        self.categories.list().await
    }

    /// Same listing as [`list`](Self::list), but for the back-office
    /// management screen, so it passes the staff gate first.
    pub async fn manage(&self, acting: &Account) -> Result<Vec<Category>> {
        require_staff(acting)?;
        self.categories.list().await
    }

    /// Staff-only. Duplicate names come back as a field error.
    pub async fn create(&self, name: &str, acting: &Account) -> Result<Category> {
        require_staff(acting)?;

        let name = name.trim();
        if name.is_empty() || name.len() > 100 {
            return Err(AppError::Validation(ValidationErrors::single(
                "name",
                "name must be 1-100 characters",
            )));
        }

        match self
            .categories
            .insert(Category {
                id: Uuid::now_v7(),
                name: name.to_string(),
                created_at: Utc::now(),
            })
            .await
        {
            Ok(created) => Ok(created),
            Err(AppError::Conflict(_)) => Err(AppError::Validation(ValidationErrors::single(
                "name",
                "a category with this name already exists",
            ))),
            Err(other) => Err(other),
        }
    }

    /// Staff-only. Articles in the category fall back to uncategorized
    /// (FK is SET NULL).
    pub async fn delete(&self, id: Uuid, acting: &Account) -> Result<()> {
        require_staff(acting)?;
        if self.categories.by_id(id).await?.is_none() {
            return Err(AppError::not_found("category", id));
        }
        self.categories.delete(id).await
    }
}
