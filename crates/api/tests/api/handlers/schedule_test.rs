use axum::http::StatusCode;
use clinicbook_core::models::schedule::{GlobalSettings, OperatingHours, WeekdaySlot};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

use crate::test_utils::{MONDAY, TestContext};

#[tokio::test]
async fn test_settings_default_to_sixty_minutes() {
    let ctx = TestContext::new();

    let settings = ctx.server.get("/api/global-settings").await.json::<GlobalSettings>();

    assert_eq!(settings.booking_duration_minutes, 60);
}

#[rstest]
#[case(0)]
#[case(1441)]
#[tokio::test]
async fn test_settings_reject_out_of_range_duration(#[case] minutes: u32) {
    let ctx = TestContext::new();

    ctx.server
        .post("/api/global-settings")
        .json(&json!({ "bookingDurationMinutes": minutes }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_operating_hours_upsert_list_and_delete() {
    let ctx = TestContext::new().with_monday_morning().await;

    let updated = ctx
        .server
        .post("/api/operating-hours")
        .json(&json!({
            "weekday": 1,
            "isActive": true,
            "timeIntervals": [
                { "openTime": "14:00", "closeTime": "16:00" },
                { "openTime": "09:00", "closeTime": "11:00" }
            ]
        }))
        .await
        .json::<OperatingHours>();
    assert_eq!(updated.time_intervals.len(), 2);

    let listed = ctx.server.get("/api/operating-hours").await.json::<Vec<OperatingHours>>();
    assert_eq!(listed.len(), 1);
    assert_eq!(
        ctx.slots(MONDAY, None).await,
        vec!["09:00-10:00", "10:00-11:00", "14:00-15:00", "15:00-16:00"]
    );

    ctx.server.delete("/api/operating-hours/1").await.assert_status_ok();
    ctx.server
        .delete("/api/operating-hours/1")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    ctx.server
        .delete("/api/operating-hours/9")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    assert!(ctx.slots(MONDAY, None).await.is_empty());
}

#[rstest]
#[case(json!({ "weekday": 7, "isActive": true, "timeIntervals": [] }))]
#[case(json!({ "weekday": 1, "isActive": true, "timeIntervals": [{ "openTime": "12:00", "closeTime": "09:00" }] }))]
#[case(json!({
    "weekday": 1,
    "isActive": true,
    "timeIntervals": [
        { "openTime": "09:00", "closeTime": "12:00" },
        { "openTime": "11:00", "closeTime": "13:00" }
    ]
}))]
#[tokio::test]
async fn test_invalid_operating_hours_are_rejected(#[case] body: Value) {
    let ctx = TestContext::new();

    ctx.server
        .post("/api/operating-hours")
        .json(&body)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_legacy_slots_are_used_without_operating_hours() {
    let ctx = TestContext::new();

    let stored = ctx
        .server
        .post("/api/global-timeslots")
        .json(&json!({
            "weekday": 1,
            "slots": [{ "time": "18:00-19:00" }, { "time": "17:00" }, { "time": "18:00-19:00" }]
        }))
        .await
        .json::<Vec<WeekdaySlot>>();
    assert_eq!(stored.len(), 2);

    assert_eq!(ctx.slots(MONDAY, None).await, vec!["17:00", "18:00-19:00"]);

    let listed = ctx.server.get("/api/global-timeslots").await.json::<Vec<WeekdaySlot>>();
    assert_eq!(listed, stored);
}

#[tokio::test]
async fn test_inactive_hours_fall_back_to_legacy_slots() {
    let ctx = TestContext::new();
    ctx.server
        .post("/api/operating-hours")
        .json(&json!({
            "weekday": 1,
            "isActive": false,
            "timeIntervals": [{ "openTime": "09:00", "closeTime": "12:00" }]
        }))
        .await
        .assert_status_ok();
    ctx.server
        .post("/api/global-timeslots")
        .json(&json!({ "weekday": 1, "slots": [{ "time": "19:00-20:00" }] }))
        .await
        .assert_status_ok();

    assert_eq!(ctx.slots(MONDAY, None).await, vec!["19:00-20:00"]);
}
