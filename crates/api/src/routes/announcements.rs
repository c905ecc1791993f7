use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/announcements",
        get(handlers::announcements::get_active_announcement)
            .post(handlers::announcements::post_announcement)
            .delete(handlers::announcements::deactivate_announcements),
    )
}
