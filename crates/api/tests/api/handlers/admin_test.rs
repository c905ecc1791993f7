use axum::http::StatusCode;
use clinicbook_api::handlers::admin::LoginResponse;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{ADMIN_PASSWORD, MONDAY, TestContext, admin_header, booking_form};

#[tokio::test]
async fn test_admin_routes_require_the_password_header() {
    let ctx = TestContext::with_admin_password();

    ctx.server
        .get("/api/bookings")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let (name, value) = admin_header("guess");
    let wrong = ctx.server.get("/api/bookings").add_header(name, value).await;
    wrong.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.json::<serde_json::Value>(), json!({ "error": "Invalid admin password" }));

    let (name, value) = admin_header(ADMIN_PASSWORD);
    ctx.server
        .get("/api/bookings")
        .add_header(name, value)
        .await
        .assert_status_ok();

    ctx.server
        .get("/api/patients")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_routes_stay_open_behind_the_gate() {
    let ctx = TestContext::with_admin_password();

    ctx.server.get("/health").await.assert_status_ok();
    ctx.server
        .get("/api/slots")
        .add_query_param("date", MONDAY)
        .await
        .assert_status_ok();
    ctx.server.get("/api/announcements").await.assert_status_ok();
    ctx.server
        .post("/api/bookings")
        .json(&booking_form("massage", MONDAY, "09:00-10:00"))
        .await
        .assert_status(StatusCode::CREATED);

    ctx.server
        .post("/api/announcements")
        .json(&json!({ "message": "hello" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_reports_validity() {
    let ctx = TestContext::with_admin_password();

    let good = ctx
        .server
        .post("/api/admin/login")
        .json(&json!({ "password": ADMIN_PASSWORD }))
        .await
        .json::<LoginResponse>();
    let bad = ctx
        .server
        .post("/api/admin/login")
        .json(&json!({ "password": "admin" }))
        .await
        .json::<LoginResponse>();

    assert_eq!(good, LoginResponse { valid: true });
    assert_eq!(bad, LoginResponse { valid: false });
}

#[tokio::test]
async fn test_health_and_version() {
    let ctx = TestContext::new();

    assert_eq!(ctx.server.get("/health").await.json::<serde_json::Value>(), json!({ "status": "ok" }));
    let version = ctx.server.get("/version").await.json::<serde_json::Value>();
    assert_eq!(version["service"], json!("clinicbook-api"));
    assert_eq!(version["version"], json!(env!("CARGO_PKG_VERSION")));
}
