use std::sync::Arc;

use axum::http::StatusCode;
use clinicbook_core::models::booking::{AdmissionResponse, Booking, BookingRange, NewBooking, Patient};
use clinicbook_db::{ClinicStore, store::MockClinicStore};
use fake::{
    Fake,
    faker::{internet::en::SafeEmail, name::en::Name},
};
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::{MONDAY, OPERATOR_EMAIL, RecordingNotifier, TestContext, booking_form, server_for};

#[tokio::test]
async fn test_admission_accepts_and_confirms() {
    let ctx = TestContext::new().with_monday_morning().await;
    let name: String = Name().fake();
    let email: String = SafeEmail().fake();

    let response = ctx
        .server
        .post("/api/bookings")
        .json(&json!({
            "service": "massage",
            "date": MONDAY,
            "time": "10:00-11:00",
            "name": name,
            "telephone": "6977000000",
            "email": email
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<AdmissionResponse>();
    assert!(body.accepted);
    let booking_id = body.booking_id.unwrap();

    let stored = ctx.store.find_booking(booking_id).await.unwrap().unwrap();
    assert_eq!(stored.name, name);
    assert_eq!(stored.time.to_string(), "10:00-11:00");

    assert_eq!(ctx.notifier.sent(), vec![(booking_id, vec![email, OPERATOR_EMAIL.to_string()])]);
}

#[tokio::test]
async fn test_second_identical_admission_conflicts() {
    let ctx = TestContext::new();
    let form = booking_form("massage", MONDAY, "10:00-11:00");

    ctx.server
        .post("/api/bookings")
        .json(&form)
        .await
        .assert_status(StatusCode::CREATED);
    let second = ctx.server.post("/api/bookings").json(&form).await;

    second.assert_status(StatusCode::CONFLICT);
    let body = second.json::<AdmissionResponse>();
    assert!(!body.accepted);
    assert!(body.booking_id.is_none());
    assert!(body.reason.unwrap().contains("already booked"));
    assert_eq!(ctx.store.list_bookings(BookingRange::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_same_slot_for_another_service_is_admitted() {
    let ctx = TestContext::new();

    for service in ["massage", "physiotherapy"] {
        ctx.server
            .post("/api/bookings")
            .json(&booking_form(service, MONDAY, "10:00-11:00"))
            .await
            .assert_status(StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_incomplete_form_is_rejected_with_reason() {
    let ctx = TestContext::new();
    let mut form = booking_form("massage", MONDAY, "10:00-11:00");
    form["telephone"] = Value::Null;

    let response = ctx.server.post("/api/bookings").json(&form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<AdmissionResponse>();
    assert!(!body.accepted);
    assert!(body.reason.unwrap().contains("telephone"));
    assert!(ctx.notifier.sent().is_empty());
}

#[tokio::test]
async fn test_unparseable_body_is_rejected_in_admission_shape() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/bookings")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["accepted"], json!(false));
}

#[test_log::test(tokio::test)]
async fn test_failed_confirmation_does_not_undo_admission() {
    let ctx = TestContext::with_failing_notifier();

    let response = ctx
        .server
        .post("/api/bookings")
        .json(&booking_form("massage", MONDAY, "10:00-11:00"))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(ctx.notifier.sent().len(), 1);
    assert_eq!(ctx.store.list_bookings(BookingRange::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_storage_failure_is_reported_without_details() {
    let mut store = MockClinicStore::new();
    store
        .expect_create_booking()
        .with(predicate::function(|booking: &NewBooking| booking.service == "massage"))
        .times(1)
        .returning(|_| Err(eyre::eyre!("connection to 10.0.0.5:5432 refused")));
    let server = server_for(Arc::new(store), Arc::new(RecordingNotifier::default()), None);

    let response = server
        .post("/api/bookings")
        .json(&booking_form("massage", MONDAY, "10:00-11:00"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let reason = response.json::<AdmissionResponse>().reason.unwrap();
    assert!(!reason.contains("10.0.0.5"));
    assert_eq!(reason, "The booking service is temporarily unavailable");
}

#[tokio::test]
async fn test_cancel_reopens_the_slot() {
    let ctx = TestContext::new().with_monday_morning().await;
    let created = ctx
        .server
        .post("/api/bookings")
        .json(&booking_form("massage", MONDAY, "10:00-11:00"))
        .await
        .json::<AdmissionResponse>();
    let id = created.booking_id.unwrap();
    assert_eq!(ctx.slots(MONDAY, Some("massage")).await.len(), 2);

    let response = ctx.server.delete(&format!("/api/bookings/{}", id)).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "success": true }));
    assert_eq!(ctx.slots(MONDAY, Some("massage")).await.len(), 3);

    ctx.server
        .delete(&format!("/api/bookings/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reschedule_moves_booking_and_detects_conflicts() {
    let ctx = TestContext::new().with_monday_morning().await;
    let mut ids = Vec::new();
    for time in ["09:00-10:00", "10:00-11:00"] {
        let body = ctx
            .server
            .post("/api/bookings")
            .json(&booking_form("massage", MONDAY, time))
            .await
            .json::<AdmissionResponse>();
        ids.push(body.booking_id.unwrap());
    }

    ctx.server
        .put(&format!("/api/bookings/{}", ids[0]))
        .json(&json!({ "date": MONDAY, "time": "10:00-11:00" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    ctx.server
        .put(&format!("/api/bookings/{}", ids[0]))
        .json(&json!({ "date": MONDAY, "time": "11:00-12:00" }))
        .await
        .assert_status_ok();
    assert_eq!(ctx.slots(MONDAY, Some("massage")).await, vec!["09:00-10:00"]);

    ctx.server
        .put(&format!("/api/bookings/{}", Uuid::new_v4()))
        .json(&json!({ "date": MONDAY, "time": "09:00-10:00" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    ctx.server
        .put(&format!("/api/bookings/{}", ids[1]))
        .json(&json!({ "date": MONDAY, "time": "ten o'clock" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_is_sorted_and_filterable() {
    let ctx = TestContext::new();
    for (date, time) in [("2030-01-08", "09:00-10:00"), (MONDAY, "11:00-12:00"), (MONDAY, "09:00-10:00")] {
        ctx.server
            .post("/api/bookings")
            .json(&booking_form("massage", date, time))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let all = ctx.server.get("/api/bookings").await.json::<Vec<Booking>>();
    let order: Vec<String> = all.iter().map(|b| format!("{} {}", b.date, b.time)).collect();
    assert_eq!(
        order,
        vec![
            "2030-01-07 09:00-10:00",
            "2030-01-07 11:00-12:00",
            "2030-01-08 09:00-10:00"
        ]
    );

    let monday = ctx
        .server
        .get("/api/bookings")
        .add_query_param("date", MONDAY)
        .await
        .json::<Vec<Booking>>();
    assert_eq!(monday.len(), 2);
}

#[tokio::test]
async fn test_bare_start_time_conflicts_with_full_window() {
    let ctx = TestContext::new();

    ctx.server
        .post("/api/bookings")
        .json(&booking_form("massage", MONDAY, "09:00-10:00"))
        .await
        .assert_status(StatusCode::CREATED);
    let second = ctx
        .server
        .post("/api/bookings")
        .json(&booking_form("massage", MONDAY, "09:00"))
        .await;

    second.assert_status(StatusCode::CONFLICT);
    assert_eq!(ctx.store.list_bookings(BookingRange::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancel_restores_published_override() {
    let ctx = TestContext::new();
    ctx.server
        .post("/api/date-overrides")
        .json(&json!({
            "date": MONDAY,
            "overrides": [
                { "time": "09:00-10:00", "service": "massage", "available": true },
                { "time": "10:00-11:00", "service": "massage", "available": true }
            ]
        }))
        .await
        .assert_status_ok();
    let id = ctx
        .server
        .post("/api/bookings")
        .json(&booking_form("massage", MONDAY, "09:00-10:00"))
        .await
        .json::<AdmissionResponse>()
        .booking_id
        .unwrap();
    assert_eq!(ctx.slots(MONDAY, Some("massage")).await, vec!["10:00-11:00"]);

    ctx.server
        .delete(&format!("/api/bookings/{}", id))
        .await
        .assert_status_ok();

    assert_eq!(
        ctx.slots(MONDAY, Some("massage")).await,
        vec!["09:00-10:00", "10:00-11:00"]
    );
}

#[tokio::test]
async fn test_history_range_listing() {
    let ctx = TestContext::new();
    for date in ["2030-01-06", MONDAY, "2030-01-08", "2030-01-10"] {
        ctx.server
            .post("/api/bookings")
            .json(&booking_form("massage", date, "09:00-10:00"))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let history = ctx
        .server
        .get("/api/bookings")
        .add_query_param("startDate", MONDAY)
        .add_query_param("endDate", "2030-01-08")
        .await
        .json::<Vec<Booking>>();
    let dates: Vec<String> = history.iter().map(|b| b.date.to_string()).collect();
    assert_eq!(dates, vec!["2030-01-07", "2030-01-08"]);

    ctx.server
        .get("/api/bookings")
        .add_query_param("startDate", "2030-01-08")
        .add_query_param("endDate", MONDAY)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patient_directory_has_one_entry_per_telephone() {
    let ctx = TestContext::new();
    let patients = [
        ("2030-01-08", "Ioanna Petrou", "6911111111"),
        (MONDAY, "Ioanna P.", "6911111111"),
        (MONDAY, "Kostas Dimou", "6922222222"),
    ];
    for (date, name, telephone) in patients {
        let mut form = booking_form("massage", date, "09:00-10:00");
        form["name"] = json!(name);
        form["telephone"] = json!(telephone);
        form["time"] = json!(if name == "Kostas Dimou" { "10:00-11:00" } else { "09:00-10:00" });
        ctx.server
            .post("/api/bookings")
            .json(&form)
            .await
            .assert_status(StatusCode::CREATED);
    }

    let directory = ctx.server.get("/api/patients").await.json::<Vec<Patient>>();

    let rows: Vec<(&str, &str)> = directory
        .iter()
        .map(|p| (p.name.as_str(), p.telephone.as_str()))
        .collect();
    assert_eq!(rows, vec![("Ioanna P.", "6911111111"), ("Kostas Dimou", "6922222222")]);
}
