//! The route table and the middleware stack around it.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::error::render;
use crate::handlers::{accounts, admin, articles, pages};
use crate::middleware::{enforce_host, enforce_origin};
use crate::state::AppState;
use crate::templates::{Nav, NotFoundPage};

pub fn router(state: Arc<AppState>) -> Router {
    let admin_routes = Router::new()
        .route("/articles/", get(admin::articles))
        .route("/articles/{id}/delete/", post(admin::delete_article))
        .route("/comments/", get(admin::comments))
        .route("/comments/{id}/delete/", post(admin::delete_comment))
        .route("/accounts/", get(admin::accounts))
        .route(
            "/categories/",
            get(admin::categories).post(admin::create_category),
        )
        .route("/categories/{id}/delete/", post(admin::delete_category))
        .route("/contacts/", get(admin::contacts))
        .route("/contacts/{id}/toggle/", post(admin::toggle_contact));

    Router::new()
        .route("/", get(pages::home))
        .route(
            "/contact/",
            get(pages::contact_form).post(pages::contact_submit),
        )
        .route("/contact/success/", get(pages::contact_success))
        .route(
            "/accounts/signup/",
            get(accounts::signup_form).post(accounts::signup),
        )
        .route(
            "/accounts/login/",
            get(accounts::login_form).post(accounts::login),
        )
        .route("/accounts/logout/", post(accounts::logout))
        .route("/accounts/profile/{id}/", get(accounts::profile))
        .route(
            "/accounts/edit_profile/",
            get(accounts::edit_profile_form).post(accounts::edit_profile),
        )
        .route("/articles/", get(articles::list))
        .route(
            "/articles/new/",
            get(articles::new_form).post(articles::create),
        )
        .route(
            "/articles/{id}/",
            get(articles::detail).post(articles::comment),
        )
        .route(
            "/articles/{id}/update/",
            get(articles::update_form).post(articles::update),
        )
        .route(
            "/articles/{id}/delete/",
            get(articles::delete_confirm).post(articles::delete),
        )
        // `nest` alone would only match `/admin`, not `/admin/`, so the
        // dashboard lives on the outer router to keep the trailing slash.
        .route("/admin/", get(admin::dashboard))
        .nest("/admin", admin_routes)
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), enforce_origin))
        .layer(from_fn_with_state(state.clone(), enforce_host))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

async fn not_found() -> Response {
    render(
        StatusCode::NOT_FOUND,
        &NotFoundPage {
            nav: Nav::anonymous(),
        },
    )
}
