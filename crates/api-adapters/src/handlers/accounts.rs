//! Registration, sessions, and profiles.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use uuid::Uuid;

use domains::{AppError, ValidationErrors};
use services::{ProfileUpdate, RegisterAccount};

use crate::error::{page, render, PageError};
use crate::extract::{clear_session_cookie, session_cookie, session_token, CurrentAccount, MaybeAccount};
use crate::handlers::MultipartForm;
use crate::state::AppState;
use crate::templates::{
    flatten_errors, EditProfilePage, LoginPage, Nav, ProfileFormData, ProfilePage, ProfileView,
    SignupPage,
};

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

pub async fn signup_form(MaybeAccount(account): MaybeAccount) -> Result<Response, PageError> {
    if account.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    page(&SignupPage {
        nav: Nav::anonymous(),
        errors: Vec::new(),
        username: String::new(),
        email: String::new(),
        first_name: String::new(),
        last_name: String::new(),
    })
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SignupForm>,
) -> Result<Response, PageError> {
    let input = RegisterAccount {
        username: form.username.clone(),
        email: form.email.clone(),
        password: form.password,
        password_confirm: form.password_confirm,
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
    };
    match state.accounts.register(input).await {
        Ok(_) => Ok(Redirect::to("/accounts/login/").into_response()),
        Err(e) => {
            let errors = signup_errors(e)?;
            Ok(render(
                StatusCode::UNPROCESSABLE_ENTITY,
                &SignupPage {
                    nav: Nav::anonymous(),
                    errors: flatten_errors(&errors),
                    username: form.username,
                    email: form.email,
                    first_name: form.first_name,
                    last_name: form.last_name,
                },
            ))
        }
    }
}

/// A duplicate username reaches the form the same way a shape error does.
fn signup_errors(e: AppError) -> Result<ValidationErrors, PageError> {
    match e {
        AppError::Validation(errors) => Ok(errors),
        AppError::Conflict(message) => Ok(ValidationErrors::single("username", message)),
        other => Err(other.into()),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login_form(MaybeAccount(account): MaybeAccount) -> Result<Response, PageError> {
    if account.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    page(&LoginPage {
        nav: Nav::anonymous(),
        errors: Vec::new(),
        username: String::new(),
    })
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    match state.accounts.authenticate(&form.username, &form.password).await {
        Ok((_, session)) => {
            let cookie = session_cookie(&state, &session.token);
            Ok((
                [(SET_COOKIE, cookie)],
                Redirect::to("/"),
            )
                .into_response())
        }
        Err(AppError::Validation(errors)) => Ok(render(
            StatusCode::UNPROCESSABLE_ENTITY,
            &LoginPage {
                nav: Nav::anonymous(),
                errors: flatten_errors(&errors),
                username: form.username,
            },
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    if let Some(token) = session_token(&headers, &state) {
        state.accounts.logout(&token).await?;
    }
    Ok((
        [(SET_COOKIE, clear_session_cookie())],
        Redirect::to("/"),
    )
        .into_response())
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    MaybeAccount(viewer): MaybeAccount,
    Path(id): Path<Uuid>,
) -> Result<Response, PageError> {
    let account = state.accounts.get_profile(id).await?;
    page(&ProfilePage {
        nav: Nav::for_account(viewer.as_ref()),
        profile: ProfileView::from_account(&account, viewer.as_ref(), state.media.as_ref()),
    })
}

pub async fn edit_profile_form(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Response, PageError> {
    page(&EditProfilePage {
        nav: Nav::for_account(Some(&account)),
        errors: Vec::new(),
        form: ProfileFormData::from_account(&account, state.media.as_ref()),
    })
}

pub async fn edit_profile(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let form = MultipartForm::read(multipart, "avatar").await?;

    let age_text = form.field("age");
    let age = match age_text.trim() {
        "" => None,
        raw => match raw.parse::<i32>() {
            Ok(n) => Some(n),
            Err(_) => {
                return Ok(edit_profile_rerender(
                    &state,
                    &account,
                    &form,
                    ValidationErrors::single("age", "must be a whole number"),
                ));
            }
        },
    };

    let avatar_id = match form.image {
        Some(ref upload) => match state.media.save(upload.bytes.clone(), &upload.mime).await {
            Ok(id) => Some(id),
            Err(AppError::Validation(errors)) => {
                return Ok(edit_profile_rerender(&state, &account, &form, errors));
            }
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    let input = ProfileUpdate {
        first_name: form.field("first_name"),
        last_name: form.field("last_name"),
        email: form.field("email"),
        age,
        bio: form.field("bio"),
        x_link: form.field("x_link"),
        linkedin_link: form.field("linkedin_link"),
        github_link: form.field("github_link"),
        website_link: form.field("website_link"),
        avatar_id,
    };
    match state.accounts.edit_profile(account.id, input).await {
        Ok(updated) => Ok(Redirect::to(&format!("/accounts/profile/{}/", updated.id)).into_response()),
        Err(AppError::Validation(errors)) => {
            Ok(edit_profile_rerender(&state, &account, &form, errors))
        }
        Err(e) => Err(e.into()),
    }
}

fn edit_profile_rerender(
    state: &AppState,
    account: &domains::Account,
    form: &MultipartForm,
    errors: ValidationErrors,
) -> Response {
    render(
        StatusCode::UNPROCESSABLE_ENTITY,
        &EditProfilePage {
            nav: Nav::for_account(Some(account)),
            errors: flatten_errors(&errors),
            form: ProfileFormData {
                first_name: form.field("first_name"),
                last_name: form.field("last_name"),
                email: form.field("email"),
                age: form.field("age"),
                bio: form.field("bio"),
                x_link: form.field("x_link"),
                linkedin_link: form.field("linkedin_link"),
                github_link: form.field("github_link"),
                website_link: form.field("website_link"),
                avatar_url: account
                    .avatar_id
                    .as_deref()
                    .map(|id| state.media.thumbnail_url(id)),
            },
        },
    )
}
