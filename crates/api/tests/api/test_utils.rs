use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use chrono_tz::Tz;
use clinicbook_api::{
    ApiState, build_router,
    middleware::auth::{ADMIN_PASSWORD_HEADER, hash_password},
    notifications::Notifier,
};
use clinicbook_core::{
    errors::{BookingError, BookingResult},
    models::booking::Booking,
};
use clinicbook_db::{ClinicStore, MemoryStore};
use serde_json::{Value, json};
use uuid::Uuid;

pub const ADMIN_PASSWORD: &str = "front-desk-secret";
pub const OPERATOR_EMAIL: &str = "desk@clinic.example";

/// A Monday far enough ahead that none of its windows is in the past.
pub const MONDAY: &str = "2030-01-07";

/// Keeps every confirmation it is asked to send; optionally fails them all.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(Uuid, Vec<String>)>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(Uuid, Vec<String>)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn booking_confirmed(&self, booking: &Booking, recipients: &[String]) -> BookingResult<()> {
        self.sent.lock().unwrap().push((booking.id, recipients.to_vec()));
        if self.fail {
            return Err(BookingError::Notification("smtp relay unreachable".to_string()));
        }
        Ok(())
    }
}

pub struct TestContext {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestContext {
    /// Open admin surface, in-memory store, recording notifier.
    pub fn new() -> Self {
        Self::build(RecordingNotifier::default(), None)
    }

    pub fn with_admin_password() -> Self {
        Self::build(RecordingNotifier::default(), Some(hash_password(ADMIN_PASSWORD).unwrap()))
    }

    pub fn with_failing_notifier() -> Self {
        Self::build(RecordingNotifier::failing(), None)
    }

    fn build(notifier: RecordingNotifier, admin_password_hash: Option<String>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(notifier);
        let server = server_for(store.clone(), notifier.clone(), admin_password_hash);
        Self { server, store, notifier }
    }

    /// Monday 09:00-12:00 with the default 60 minute duration.
    pub async fn with_monday_morning(self) -> Self {
        self.server
            .post("/api/operating-hours")
            .json(&json!({
                "weekday": 1,
                "isActive": true,
                "timeIntervals": [{ "openTime": "09:00", "closeTime": "12:00" }]
            }))
            .await
            .assert_status_ok();
        self
    }

    pub async fn slots(&self, date: &str, service: Option<&str>) -> Vec<String> {
        let mut request = self.server.get("/api/slots").add_query_param("date", date);
        if let Some(service) = service {
            request = request.add_query_param("service", service);
        }
        let response = request.await;
        response.assert_status_ok();
        response.json::<Vec<String>>()
    }
}

pub fn server_for(
    store: Arc<dyn ClinicStore>,
    notifier: Arc<dyn Notifier>,
    admin_password_hash: Option<String>,
) -> TestServer {
    let state = Arc::new(ApiState {
        store,
        notifier,
        timezone: Tz::UTC,
        admin_password_hash,
        operator_email: Some(OPERATOR_EMAIL.to_string()),
    });
    TestServer::new(build_router(state)).unwrap()
}

pub fn admin_header(password: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(ADMIN_PASSWORD_HEADER),
        HeaderValue::from_str(password).unwrap(),
    )
}

pub fn booking_form(service: &str, date: &str, time: &str) -> Value {
    json!({
        "service": service,
        "date": date,
        "time": time,
        "name": "Katerina Georgiou",
        "telephone": "6944000000",
        "email": "katerina@example.com"
    })
}
