use axum::{
    Router,
    routing::{delete, get},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/operating-hours",
            get(handlers::operating_hours::list_operating_hours).post(handlers::operating_hours::upsert_operating_hours),
        )
        .route(
            "/api/operating-hours/:weekday",
            delete(handlers::operating_hours::delete_operating_hours),
        )
        .route(
            "/api/global-settings",
            get(handlers::settings::get_global_settings).post(handlers::settings::update_global_settings),
        )
        .route(
            "/api/blocked-dates",
            get(handlers::calendar::list_blocked_dates)
                .post(handlers::calendar::block_date)
                .delete(handlers::calendar::unblock_date),
        )
        .route(
            "/api/blocked-intervals",
            get(handlers::calendar::list_blocked_intervals).post(handlers::calendar::create_blocked_interval),
        )
        .route(
            "/api/blocked-intervals/:id",
            delete(handlers::calendar::delete_blocked_interval),
        )
        .route(
            "/api/date-overrides",
            get(handlers::calendar::list_date_overrides).post(handlers::calendar::replace_date_overrides),
        )
        .route(
            "/api/global-timeslots",
            get(handlers::templates::list_weekday_slots).post(handlers::templates::replace_weekday_slots),
        )
}
