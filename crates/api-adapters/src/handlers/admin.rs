//! Staff back-office screens.
//!
//! Every handler goes through a staff-gated service method; the handlers
//! here only shape pages and redirects.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use uuid::Uuid;

use domains::{Account, AppError};

use crate::error::{page, render, PageError};
use crate::extract::CurrentAccount;
use crate::state::AppState;
use crate::templates::{
    flatten_errors, AccountRow, AdminAccountsPage, AdminArticlesPage, AdminCategoriesPage,
    AdminCommentsPage, AdminContactsPage, AdminDashboardPage, ArticleCard, CategoryRow,
    CommentCard, ContactRow, Nav,
};

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Response, PageError> {
    let stats = state.admin.stats(&account).await?;
    page(&AdminDashboardPage {
        nav: Nav::for_account(Some(&account)),
        stats,
    })
}

pub async fn articles(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Response, PageError> {
    let views = state.admin.articles(&account).await?;
    page(&AdminArticlesPage {
        nav: Nav::for_account(Some(&account)),
        articles: views
            .iter()
            .map(|v| ArticleCard::from_view(v, state.media.as_ref()))
            .collect(),
    })
}

pub async fn delete_article(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Response, PageError> {
    state.admin.delete_article(id, &account).await?;
    Ok(Redirect::to("/admin/articles/").into_response())
}

pub async fn comments(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Response, PageError> {
    let views = state.admin.recent_comments(&account).await?;
    page(&AdminCommentsPage {
        nav: Nav::for_account(Some(&account)),
        comments: views.iter().map(CommentCard::from_view).collect(),
    })
}

pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Response, PageError> {
    state.admin.delete_comment(id, &account).await?;
    Ok(Redirect::to("/admin/comments/").into_response())
}

pub async fn accounts(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Response, PageError> {
    let rows = state.admin.accounts(&account).await?;
    page(&AdminAccountsPage {
        nav: Nav::for_account(Some(&account)),
        accounts: rows.iter().map(AccountRow::from_account).collect(),
    })
}

pub async fn categories(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Response, PageError> {
    let rows = category_rows(&state, &account).await?;
    page(&AdminCategoriesPage {
        nav: Nav::for_account(Some(&account)),
        errors: Vec::new(),
        categories: rows,
    })
}

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Form(form): Form<CategoryForm>,
) -> Result<Response, PageError> {
    match state.categories.create(&form.name, &account).await {
        Ok(_) => Ok(Redirect::to("/admin/categories/").into_response()),
        Err(AppError::Validation(errors)) => {
            let rows = category_rows(&state, &account).await?;
            Ok(render(
                StatusCode::UNPROCESSABLE_ENTITY,
                &AdminCategoriesPage {
                    nav: Nav::for_account(Some(&account)),
                    errors: flatten_errors(&errors),
                    categories: rows,
                },
            ))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Response, PageError> {
    state.categories.delete(id, &account).await?;
    Ok(Redirect::to("/admin/categories/").into_response())
}

pub async fn contacts(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Response, PageError> {
    let rows = state.admin.contacts(&account).await?;
    page(&AdminContactsPage {
        nav: Nav::for_account(Some(&account)),
        contacts: rows.iter().map(ContactRow::from_submission).collect(),
    })
}

pub async fn toggle_contact(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Response, PageError> {
    state.admin.toggle_contact_read(id, &account).await?;
    Ok(Redirect::to("/admin/contacts/").into_response())
}

async fn category_rows(
    state: &AppState,
    account: &Account,
) -> Result<Vec<CategoryRow>, PageError> {
    Ok(state
        .categories
        .manage(account)
        .await?
        .iter()
        .map(|c| CategoryRow {
            id: c.id.to_string(),
            name: c.name.clone(),
        })
        .collect())
}
