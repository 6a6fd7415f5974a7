//! Registration, login, and logout over HTTP.

use axum::http::{header, StatusCode};
use tower::ServiceExt;

use domains::PasswordHasher;

use integration_tests::{
    account, app, body_text, get, location, post_form, post_form_authed, Mocks, SESSION_TOKEN,
};

#[tokio::test]
async fn signup_form_renders() {
    let response = app(Mocks::default())
        .oneshot(get("/accounts/signup/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("name=\"password_confirm\""));
}

#[tokio::test]
async fn signup_with_bad_fields_rerenders_with_errors() {
    let request = post_form(
        "/accounts/signup/",
        "username=x&email=nope&password=short&password_confirm=different",
    );
    let response = app(Mocks::default()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("passwords do not match"));
    assert!(html.contains("valid email"));
}

#[tokio::test]
async fn signup_success_redirects_to_login() {
    let mut mocks = Mocks::default();
    mocks
        .accounts
        .expect_by_username()
        .withf(|u| u == "wren")
        .returning(|_| Ok(None));
    mocks
        .accounts
        .expect_insert()
        .withf(|a| a.username == "wren" && !a.is_staff)
        .returning(|a| Ok(a));

    let request = post_form(
        "/accounts/signup/",
        "username=wren&email=wren%40example.com&password=correct-horse&password_confirm=correct-horse",
    );
    let response = app(mocks).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/login/");
}

#[tokio::test]
async fn taken_username_is_a_field_error() {
    let mut mocks = Mocks::default();
    let existing = account("wren");
    mocks
        .accounts
        .expect_by_username()
        .returning(move |_| Ok(Some(existing.clone())));

    let request = post_form(
        "/accounts/signup/",
        "username=wren&email=wren%40example.com&password=correct-horse&password_confirm=correct-horse",
    );
    let response = app(mocks).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("already taken"));
}

#[tokio::test]
async fn login_sets_session_cookie_and_redirects_home() {
    let mut mocks = Mocks::default();
    let mut wren = account("wren");
    wren.password_hash = auth_adapters::Argon2Hasher.hash("correct-horse").unwrap();
    mocks
        .accounts
        .expect_by_username()
        .withf(|u| u == "wren")
        .returning(move |_| Ok(Some(wren.clone())));
    mocks.sessions.expect_insert().returning(|s| Ok(s));

    let request = post_form("/accounts/login/", "username=wren&password=correct-horse");
    let response = app(mocks).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("login sets a cookie");
    assert!(cookie.starts_with("inkwell_session="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn wrong_password_rerenders_the_login_form() {
    let mut mocks = Mocks::default();
    let mut wren = account("wren");
    wren.password_hash = auth_adapters::Argon2Hasher.hash("correct-horse").unwrap();
    mocks
        .accounts
        .expect_by_username()
        .returning(move |_| Ok(Some(wren.clone())));

    let request = post_form("/accounts/login/", "username=wren&password=wrong");
    let response = app(mocks).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response)
        .await
        .contains("correct username and password"));
}

#[tokio::test]
async fn logout_deletes_the_session_and_clears_the_cookie() {
    let mut mocks = Mocks::default();
    mocks
        .sessions
        .expect_delete()
        .withf(|token| token == SESSION_TOKEN)
        .returning(|_| Ok(()));

    let response = app(mocks)
        .oneshot(post_form_authed("/accounts/logout/", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("logout clears the cookie");
    assert!(cookie.contains("Max-Age=0"));
}
