//! Public profiles and profile editing, including the avatar upload.

use axum::http::StatusCode;
use tower::ServiceExt;

use integration_tests::{
    account, allow_login, app, body_text, get, get_authed, location, post_multipart_authed, Mocks,
};

#[tokio::test]
async fn profile_is_public() {
    let mut mocks = Mocks::default();
    let wren = account("wren");
    let found = wren.clone();
    mocks
        .accounts
        .expect_by_id()
        .withf(move |id| *id == found.id)
        .returning(move |_| Ok(Some(wren.clone())));

    let uri = format!("/accounts/profile/{}/", found.id);
    let response = app(mocks).oneshot(get(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("wren"));
}

#[tokio::test]
async fn unknown_profile_is_404() {
    let mut mocks = Mocks::default();
    mocks.accounts.expect_by_id().returning(|_| Ok(None));

    let response = app(mocks)
        .oneshot(get(&format!("/accounts/profile/{}/", uuid::Uuid::now_v7())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_profile_requires_login() {
    let response = app(Mocks::default())
        .oneshot(get("/accounts/edit_profile/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/login/");
}

#[tokio::test]
async fn edit_profile_saves_fields_and_avatar() {
    let mut mocks = Mocks::default();
    let wren = account("wren");
    allow_login(&mut mocks, &wren);
    mocks
        .media
        .expect_save()
        .withf(|_, mime| mime.type_() == mime::IMAGE)
        .returning(|_, _| Ok("cafe0123".to_string()));
    mocks
        .accounts
        .expect_update()
        .withf(|a| {
            a.first_name == "Wren"
                && a.age == Some(31)
                && a.avatar_id.as_deref() == Some("cafe0123")
        })
        .returning(|a| Ok(a));

    let request = post_multipart_authed(
        "/accounts/edit_profile/",
        &[
            ("first_name", "Wren"),
            ("last_name", "Field"),
            ("email", "wren@example.com"),
            ("age", "31"),
            ("bio", ""),
            ("x_link", ""),
            ("linkedin_link", ""),
            ("github_link", ""),
            ("website_link", ""),
        ],
        Some(("avatar", "me.png", "image/png", b"png-bytes")),
    );
    let response = app(mocks).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/accounts/profile/"));
}

#[tokio::test]
async fn rejected_avatar_rerenders_the_form() {
    let mut mocks = Mocks::default();
    let wren = account("wren");
    allow_login(&mut mocks, &wren);
    mocks.media.expect_save().returning(|_, _| {
        Err(domains::AppError::Validation(
            domains::ValidationErrors::single("image", "the uploaded file is not a usable image"),
        ))
    });

    let request = post_multipart_authed(
        "/accounts/edit_profile/",
        &[
            ("first_name", "Wren"),
            ("email", "wren@example.com"),
            ("age", ""),
        ],
        Some(("avatar", "me.png", "image/png", b"not-an-image")),
    );
    let response = app(mocks).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("not a usable image"));
}

#[tokio::test]
async fn non_numeric_age_rerenders_the_form() {
    let mut mocks = Mocks::default();
    let wren = account("wren");
    allow_login(&mut mocks, &wren);

    let request = post_multipart_authed(
        "/accounts/edit_profile/",
        &[
            ("first_name", "Wren"),
            ("email", "wren@example.com"),
            ("age", "not-a-number"),
        ],
        None,
    );
    let response = app(mocks).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("whole number"));
}

#[tokio::test]
async fn edit_profile_form_shows_current_values() {
    let mut mocks = Mocks::default();
    let mut wren = account("wren");
    wren.first_name = "Wren".to_string();
    allow_login(&mut mocks, &wren);

    let response = app(mocks)
        .oneshot(get_authed("/accounts/edit_profile/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("value=\"Wren\""));
}
