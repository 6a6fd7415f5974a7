//! Home page and the contact form.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use domains::AppError;
use services::ContactMessage;

use crate::error::{page, render, PageError};
use crate::extract::MaybeAccount;
use crate::state::AppState;
use crate::templates::{flatten_errors, ContactPage, ContactSuccessPage, HomePage, Nav};

pub async fn home(MaybeAccount(account): MaybeAccount) -> Result<Response, PageError> {
    page(&HomePage {
        nav: Nav::for_account(account.as_ref()),
    })
}

#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

pub async fn contact_form(MaybeAccount(account): MaybeAccount) -> Result<Response, PageError> {
    page(&ContactPage {
        nav: Nav::for_account(account.as_ref()),
        errors: Vec::new(),
        name: String::new(),
        email: String::new(),
        subject: String::new(),
        message: String::new(),
    })
}

pub async fn contact_submit(
    State(state): State<Arc<AppState>>,
    MaybeAccount(account): MaybeAccount,
    Form(form): Form<ContactForm>,
) -> Result<Response, PageError> {
    let input = ContactMessage {
        name: form.name.clone(),
        email: form.email.clone(),
        subject: form.subject.clone(),
        message: form.message.clone(),
    };
    match state.contacts.submit(input).await {
        Ok(_) => Ok(Redirect::to("/contact/success/").into_response()),
        Err(AppError::Validation(errors)) => Ok(render(
            StatusCode::UNPROCESSABLE_ENTITY,
            &ContactPage {
                nav: Nav::for_account(account.as_ref()),
                errors: flatten_errors(&errors),
                name: form.name,
                email: form.email,
                subject: form.subject,
                message: form.message,
            },
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn contact_success(MaybeAccount(account): MaybeAccount) -> Result<Response, PageError> {
    page(&ContactSuccessPage {
        nav: Nav::for_account(account.as_ref()),
    })
}
