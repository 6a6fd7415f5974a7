//! Converts the domain error taxonomy into HTTP responses at the request
//! boundary. Nothing is retried and nothing is fatal: a failing request
//! renders a page and the worker moves on.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use domains::AppError;

use crate::templates::{ErrorPage, ForbiddenPage, Nav, NotFoundPage};

/// Wrapper giving `AppError` an `IntoResponse` impl local to this crate.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl From<askama::Error> for PageError {
    fn from(e: askama::Error) -> Self {
        Self(AppError::Internal(format!("template rendering failed: {e}")))
    }
}

/// Renders a template to an HTML response, with a plain-text 500 fallback if
/// rendering itself fails.
pub(crate) fn render(status: StatusCode, template: &impl Template) -> Response {
    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
        }
    }
}

/// Shorthand for a 200 HTML page.
pub(crate) fn page(template: &impl Template) -> Result<Response, PageError> {
    Ok((StatusCode::OK, Html(template.render()?)).into_response())
}

impl IntoResponse for PageError {
    // The `From<AppError>` conversions behind `?` cannot carry the viewer,
    // so error pages always show the logged-out nav.
    fn into_response(self) -> Response {
        match self.0 {
            AppError::AuthenticationRequired => {
                Redirect::to("/accounts/login/").into_response()
            }
            AppError::Forbidden(message) => render(
                StatusCode::FORBIDDEN,
                &ForbiddenPage {
                    nav: Nav::anonymous(),
                    message,
                },
            ),
            AppError::NotFound { .. } => render(
                StatusCode::NOT_FOUND,
                &NotFoundPage {
                    nav: Nav::anonymous(),
                },
            ),
            // Handlers normally re-render their form on validation errors;
            // this is the fallback for non-form endpoints.
            AppError::Validation(errors) => render(
                StatusCode::UNPROCESSABLE_ENTITY,
                &ErrorPage {
                    nav: Nav::anonymous(),
                    message: errors.to_string(),
                },
            ),
            AppError::Conflict(message) => render(
                StatusCode::CONFLICT,
                &ErrorPage {
                    nav: Nav::anonymous(),
                    message,
                },
            ),
            AppError::Internal(message) => {
                tracing::error!(error = %message, "request failed");
                render(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &ErrorPage {
                        nav: Nav::anonymous(),
                        message: "something went wrong on our side".into(),
                    },
                )
            }
        }
    }
}
