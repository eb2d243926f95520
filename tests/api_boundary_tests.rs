//! Boundary behavior that is observable without a live database: public
//! service routes, pagination bounds, auth gates, and the template-download
//! rate limit. The pool is constructed lazily so nothing here connects.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use camera_catalog::{app, AppConfig, AppState};
use jsonwebtoken::Algorithm;
use tower::ServiceExt;

fn test_state() -> AppState {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://127.0.0.1:5432/camera_catalog_test")
        .expect("lazy pool never connects");
    let config = AppConfig {
        database_url: "postgres://127.0.0.1:5432/camera_catalog_test".into(),
        bind_addr: "127.0.0.1:0".into(),
        secret_key: "integration-test-secret".into(),
        algorithm: Algorithm::HS256,
        token_ttl_minutes: 30,
        template_dir: "no-such-template-dir".into(),
    };
    AppState::new(pool, config)
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, String) {
    let resp = app.oneshot(request).await.expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

#[tokio::test]
async fn health_and_version_are_public() {
    let app = app(test_state());
    let (status, body) = send(app.clone(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("healthy"));

    let (status, body) = send(app, get("/version")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("camera-catalog"));
}

#[tokio::test]
async fn query_pagination_bounds_are_rejected_not_clamped() {
    let app = app(test_state());

    let (status, body) = send(app.clone(), get("/cameras/query?limit=0")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("validation_error"));

    let (status, _) = send(app.clone(), get("/cameras/query?limit=101")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(app.clone(), get("/lenses/query?skip=-1")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(app, get("/lenses/query?limit=1000")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn bad_id_lists_are_rejected_at_the_boundary() {
    let app = app(test_state());
    let (status, body) = send(app, get("/cameras/query?brand_ids=1,x,3")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("invalid id"));
}

#[tokio::test]
async fn mutating_routes_require_a_token() {
    let app = app(test_state());

    let (status, body) = send(
        app.clone(),
        Request::builder()
            .method("POST")
            .uri("/brands/")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"Canon"}"#))
            .expect("failed to build request"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("missing bearer token"));

    let (status, _) = send(
        app.clone(),
        Request::builder()
            .method("DELETE")
            .uri("/cameras/1")
            .body(Body::empty())
            .expect("failed to build request"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        app,
        Request::builder()
            .method("POST")
            .uri("/cameras/import")
            .body(Body::empty())
            .expect("failed to build request"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_bearer_token_is_unauthorized() {
    let app = app(test_state());
    let (status, body) = send(
        app,
        Request::builder()
            .method("POST")
            .uri("/mounts/")
            .header("authorization", "Bearer not-a-jwt")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"RF"}"#))
            .expect("failed to build request"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("could not validate credentials"));
}

#[tokio::test]
async fn template_downloads_are_rate_limited_per_client() {
    let app = app(test_state());
    // Quota is 5/minute per client address; with no template files on disk
    // the first five hit the filesystem and 404, the sixth is throttled.
    for _ in 0..5 {
        let (status, _) = send(app.clone(), get("/cameras/template")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    let (status, body) = send(app, get("/cameras/template")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body.contains("rate_limited"));
}
