use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/slots", get(handlers::slots::list_slots))
        .route(
            "/api/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::admit_booking),
        )
        .route("/api/patients", get(handlers::bookings::list_patients))
        .route(
            "/api/bookings/:id",
            put(handlers::bookings::reschedule_booking).delete(handlers::bookings::cancel_booking),
        )
}
