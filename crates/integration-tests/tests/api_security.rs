//! Host allow-listing and the cross-origin write check.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use api_adapters::SiteConfig;
use integration_tests::{app_with_site, Mocks};

fn production_site() -> SiteConfig {
    SiteConfig {
        debug: false,
        allowed_hosts: vec!["example.com".to_string()],
        trusted_origins: vec!["https://example.com".to_string()],
        session_max_age: 3600,
    }
}

#[tokio::test]
async fn a_disallowed_host_is_rejected() {
    let request = Request::builder()
        .uri("/")
        .header(header::HOST, "evil.test")
        .body(Body::empty())
        .unwrap();
    let response = app_with_site(Mocks::default(), production_site())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn an_allowed_host_passes_with_or_without_a_port() {
    for host in ["example.com", "example.com:8080"] {
        let request = Request::builder()
            .uri("/")
            .header(header::HOST, host)
            .body(Body::empty())
            .unwrap();
        let response = app_with_site(Mocks::default(), production_site())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "host {host}");
    }
}

#[tokio::test]
async fn a_cross_origin_post_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/contact/")
        .header(header::HOST, "example.com")
        .header(header::ORIGIN, "https://evil.test")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("name=x"))
        .unwrap();
    let response = app_with_site(Mocks::default(), production_site())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn a_same_origin_post_reaches_the_handler() {
    let mut mocks = Mocks::default();
    mocks.contacts.expect_insert().returning(|s| Ok(s));

    let request = Request::builder()
        .method("POST")
        .uri("/contact/")
        .header(header::HOST, "example.com")
        .header(header::ORIGIN, "https://example.com")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            "name=Ada&email=ada%40example.com&subject=Hi&message=Hello",
        ))
        .unwrap();
    let response = app_with_site(mocks, production_site())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn a_referer_under_a_trusted_origin_passes() {
    let mut mocks = Mocks::default();
    mocks.contacts.expect_insert().returning(|s| Ok(s));

    let request = Request::builder()
        .method("POST")
        .uri("/contact/")
        .header(header::HOST, "example.com")
        .header(header::REFERER, "https://example.com/contact/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            "name=Ada&email=ada%40example.com&subject=Hi&message=Hello",
        ))
        .unwrap();
    let response = app_with_site(mocks, production_site())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}
