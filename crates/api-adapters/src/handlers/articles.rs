//! Article listing, reading, authoring, and comments.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use uuid::Uuid;

use domains::{Account, AppError, ValidationErrors};
use services::ArticleFields;

use crate::error::{page, render, PageError};
use crate::extract::{CurrentAccount, MaybeAccount};
use crate::handlers::MultipartForm;
use crate::state::AppState;
use crate::templates::{
    flatten_errors, ArticleCard, ArticleDeletePage, ArticleDetailPage, ArticleDetailView,
    ArticleFormPage, ArticleListPage, CategoryOption, CommentCard, Nav,
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    MaybeAccount(account): MaybeAccount,
) -> Result<Response, PageError> {
    let views = state.articles.list().await?;
    let articles = views
        .iter()
        .map(|v| ArticleCard::from_view(v, state.media.as_ref()))
        .collect();
    page(&ArticleListPage {
        nav: Nav::for_account(account.as_ref()),
        articles,
    })
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Response, PageError> {
    let rendered = detail_page(&state, &account, id, StatusCode::OK, Vec::new()).await?;
    Ok(rendered)
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub comment: String,
}

pub async fn comment(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    Form(form): Form<CommentForm>,
) -> Result<Response, PageError> {
    match state.comments.submit(id, &form.comment, &account).await {
        Ok(_) => Ok(Redirect::to(&format!("/articles/{id}/")).into_response()),
        Err(AppError::Validation(errors)) => {
            detail_page(
                &state,
                &account,
                id,
                StatusCode::UNPROCESSABLE_ENTITY,
                flatten_errors(&errors),
            )
            .await
        }
        Err(e) => Err(e.into()),
    }
}

async fn detail_page(
    state: &AppState,
    account: &Account,
    id: Uuid,
    status: StatusCode,
    comment_errors: Vec<String>,
) -> Result<Response, PageError> {
    let (view, comments) = state.articles.get(id).await?;
    Ok(render(
        status,
        &ArticleDetailPage {
            nav: Nav::for_account(Some(account)),
            article: ArticleDetailView::from_view(&view, account, state.media.as_ref()),
            comments: comments.iter().map(CommentCard::from_view).collect(),
            comment_errors,
        },
    ))
}

pub async fn new_form(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Response, PageError> {
    let categories = state.categories.list().await?;
    page(&ArticleFormPage {
        nav: Nav::for_account(Some(&account)),
        heading: "New article".into(),
        action: "/articles/new/".into(),
        errors: Vec::new(),
        title: String::new(),
        body: String::new(),
        categories: CategoryOption::from_list(&categories, None),
        cover_url: None,
    })
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let form = MultipartForm::read(multipart, "cover").await?;
    let (fields, category_id) = match read_article_fields(&state, &form).await? {
        Ok(parsed) => parsed,
        Err(errors) => {
            return article_form_rerender(
                &state,
                &account,
                &form,
                None,
                "New article",
                "/articles/new/",
                errors,
            )
            .await;
        }
    };
    match state.articles.create(fields, &account).await {
        Ok(article) => Ok(Redirect::to(&format!("/articles/{}/", article.id)).into_response()),
        Err(AppError::Validation(errors)) => {
            article_form_rerender(
                &state,
                &account,
                &form,
                category_id,
                "New article",
                "/articles/new/",
                errors,
            )
            .await
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn update_form(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Response, PageError> {
    let article = state.articles.get_owned(id, &account).await?;
    let categories = state.categories.list().await?;
    page(&ArticleFormPage {
        nav: Nav::for_account(Some(&account)),
        heading: "Edit article".into(),
        action: format!("/articles/{id}/update/"),
        errors: Vec::new(),
        title: article.title,
        body: article.body,
        categories: CategoryOption::from_list(&categories, article.category_id),
        cover_url: article
            .cover_id
            .as_deref()
            .map(|c| state.media.url(c)),
    })
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response, PageError> {
    // Gate first so a non-author sees 403 rather than a form error.
    let existing = state.articles.get_owned(id, &account).await?;
    let form = MultipartForm::read(multipart, "cover").await?;
    let action = format!("/articles/{id}/update/");
    let (mut fields, category_id) = match read_article_fields(&state, &form).await? {
        Ok(parsed) => parsed,
        Err(errors) => {
            return article_form_rerender(
                &state,
                &account,
                &form,
                None,
                "Edit article",
                &action,
                errors,
            )
            .await;
        }
    };
    // An edit without a fresh upload keeps the existing cover.
    if fields.cover_id.is_none() {
        fields.cover_id = existing.cover_id;
    }
    match state.articles.update(id, fields, &account).await {
        Ok(article) => Ok(Redirect::to(&format!("/articles/{}/", article.id)).into_response()),
        Err(AppError::Validation(errors)) => {
            article_form_rerender(
                &state,
                &account,
                &form,
                category_id,
                "Edit article",
                &action,
                errors,
            )
            .await
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_confirm(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Response, PageError> {
    let article = state.articles.get_owned(id, &account).await?;
    page(&ArticleDeletePage {
        nav: Nav::for_account(Some(&account)),
        id: article.id.to_string(),
        title: article.title,
    })
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Response, PageError> {
    state.articles.delete(id, &account).await?;
    Ok(Redirect::to("/articles/").into_response())
}

/// Parses the shared multipart fields of the create and update forms,
/// saving an uploaded cover as a side effect. The outer error is fatal;
/// the inner one re-renders the form.
async fn read_article_fields(
    state: &AppState,
    form: &MultipartForm,
) -> Result<Result<(ArticleFields, Option<Uuid>), ValidationErrors>, PageError> {
    let category_id = match form.field("category").trim() {
        "" => None,
        raw => match raw.parse::<Uuid>() {
            Ok(id) => Some(id),
            Err(_) => {
                return Ok(Err(ValidationErrors::single(
                    "category",
                    "select a listed category",
                )));
            }
        },
    };
    let cover_id = match form.image {
        Some(ref upload) => match state.media.save(upload.bytes.clone(), &upload.mime).await {
            Ok(id) => Some(id),
            Err(AppError::Validation(errors)) => return Ok(Err(errors)),
            Err(e) => return Err(e.into()),
        },
        None => None,
    };
    Ok(Ok((
        ArticleFields {
            title: form.field("title"),
            body: form.field("body"),
            category_id,
            cover_id,
        },
        category_id,
    )))
}

async fn article_form_rerender(
    state: &AppState,
    account: &Account,
    form: &MultipartForm,
    selected: Option<Uuid>,
    heading: &str,
    action: &str,
    errors: ValidationErrors,
) -> Result<Response, PageError> {
    let categories = state.categories.list().await?;
    Ok(render(
        StatusCode::UNPROCESSABLE_ENTITY,
        &ArticleFormPage {
            nav: Nav::for_account(Some(account)),
            heading: heading.into(),
            action: action.into(),
            errors: flatten_errors(&errors),
            title: form.field("title"),
            body: form.field("body"),
            categories: CategoryOption::from_list(&categories, selected),
            cover_url: None,
        },
    ))
}
