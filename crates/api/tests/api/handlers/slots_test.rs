use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{MONDAY, TestContext, booking_form};

#[tokio::test]
async fn test_monday_morning_is_offered_hour_by_hour() {
    let ctx = TestContext::new().with_monday_morning().await;

    assert_eq!(
        ctx.slots(MONDAY, None).await,
        vec!["09:00-10:00", "10:00-11:00", "11:00-12:00"]
    );
}

#[tokio::test]
async fn test_blocked_interval_hides_overlapping_window() {
    let ctx = TestContext::new().with_monday_morning().await;
    ctx.server
        .post("/api/blocked-intervals")
        .json(&json!({
            "date": MONDAY,
            "startTime": "10:15",
            "endTime": "10:45",
            "reason": "supplier visit"
        }))
        .await
        .assert_status_ok();

    assert_eq!(ctx.slots(MONDAY, None).await, vec!["09:00-10:00", "11:00-12:00"]);
}

#[tokio::test]
async fn test_blocked_date_has_no_slots() {
    let ctx = TestContext::new().with_monday_morning().await;
    ctx.server
        .post("/api/blocked-dates")
        .json(&json!({ "date": MONDAY }))
        .await
        .assert_status_ok();

    assert!(ctx.slots(MONDAY, None).await.is_empty());
}

#[tokio::test]
async fn test_shorter_duration_changes_the_grid() {
    let ctx = TestContext::new().with_monday_morning().await;
    ctx.server
        .post("/api/global-settings")
        .json(&json!({ "bookingDurationMinutes": 45 }))
        .await
        .assert_status_ok();

    assert_eq!(
        ctx.slots(MONDAY, None).await,
        vec!["09:00-09:45", "09:45-10:30", "10:30-11:15", "11:15-12:00"]
    );
}

#[tokio::test]
async fn test_admitted_booking_disappears_from_its_service() {
    let ctx = TestContext::new().with_monday_morning().await;
    ctx.server
        .post("/api/bookings")
        .json(&booking_form("physiotherapy", MONDAY, "09:00-10:00"))
        .await
        .assert_status(StatusCode::CREATED);

    let slots = ctx.slots(MONDAY, Some("physiotherapy")).await;

    assert!(!slots.contains(&"09:00-10:00".to_string()));
    assert_eq!(slots, vec!["10:00-11:00", "11:00-12:00"]);
}

#[tokio::test]
async fn test_day_without_schedule_is_empty() {
    let ctx = TestContext::new();

    assert!(ctx.slots("2030-01-08", None).await.is_empty());
}

#[tokio::test]
async fn test_date_is_required_and_validated() {
    let ctx = TestContext::new();

    let missing = ctx.server.get("/api/slots").await;
    missing.assert_status(StatusCode::BAD_REQUEST);

    let malformed = ctx.server.get("/api/slots").add_query_param("date", "07-01-2030").await;
    malformed.assert_status(StatusCode::BAD_REQUEST);
    assert!(malformed.json::<serde_json::Value>()["error"]
        .as_str()
        .unwrap()
        .contains("YYYY-MM-DD"));
}
