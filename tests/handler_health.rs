mod common;

use common::test_app;

#[tokio::test]
async fn test_health_endpoint_success() {
    let app = test_app();

    let response = app.server.get("/deeplink/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert!(json.get("version").is_some());
}

#[tokio::test]
async fn test_health_endpoint_degraded() {
    let app = test_app();
    app.deeplinks.set_unavailable(true);

    let response = app.server.get("/deeplink/health").await;

    assert_eq!(response.status_code(), 503);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
}

#[tokio::test]
async fn test_trailing_slash_is_normalized() {
    use axum::body::Body;
    use axum::http::Request;
    use deeplink_service::routes::app_router;
    use tower::ServiceExt;

    let (state, _deeplinks, _analytics, _cache) = common::TestAppBuilder::default().build_state();

    let response = app_router(state)
        .oneshot(
            Request::get("/deeplink/health/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}
