use axum::http::StatusCode;
use clinicbook_core::models::announcement::{Announcement, AnnouncementKind};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_no_announcement_reads_as_null() {
    let ctx = TestContext::new();

    let body = ctx.server.get("/api/announcements").await.json::<Value>();

    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_posting_replaces_the_active_announcement() {
    let ctx = TestContext::new();

    ctx.server
        .post("/api/announcements")
        .json(&json!({ "message": "Closed for the holidays", "type": "warning" }))
        .await
        .assert_status_ok();
    let second = ctx
        .server
        .post("/api/announcements")
        .json(&json!({ "message": "  New physiotherapist on Tuesdays  " }))
        .await
        .json::<Announcement>();

    let active = ctx.server.get("/api/announcements").await.json::<Announcement>();
    assert_eq!(active.id, second.id);
    assert_eq!(active.message, "New physiotherapist on Tuesdays");
    assert_eq!(active.kind, AnnouncementKind::Info);

    let deactivated = ctx.server.delete("/api/announcements").await.json::<Value>();
    assert_eq!(deactivated, json!({ "success": true, "deactivatedCount": 1 }));
    assert_eq!(ctx.server.get("/api/announcements").await.json::<Value>(), Value::Null);
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let ctx = TestContext::new();

    ctx.server
        .post("/api/announcements")
        .json(&json!({ "message": "   ", "type": "info" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
