//! # Clinicbook API
//!
//! The web server of the clinic booking service: a public surface for slot
//! lookup and booking, and a password-gated admin surface for the schedule.
//!
//! ## Architecture
//!
//! - **Routes**: API endpoints and URL structure
//! - **Handlers**: request processing on top of a [`ClinicStore`]
//! - **Middleware**: the admin gate and error mapping
//! - **Notifications**: booking confirmations
//! - **Config**: environment configuration

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Admin gate and error mapping
pub mod middleware;
/// Confirmation delivery
pub mod notifications;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use clinicbook_db::ClinicStore;
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::middleware::auth::ADMIN_PASSWORD_HEADER;
use crate::notifications::Notifier;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub store: Arc<dyn ClinicStore>,
    pub notifier: Arc<dyn Notifier>,
    /// Zone of the clinic wall clock
    pub timezone: Tz,
    pub admin_password_hash: Option<String>,
    /// Copied on every booking confirmation
    pub operator_email: Option<String>,
}

impl ApiState {
    /// Current wall-clock time at the clinic.
    pub fn clinic_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }
}

/// Builds the application router with every route attached.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Slot lookup and booking admission
        .merge(routes::bookings::routes())
        // Operating hours, settings, calendar exceptions and legacy slots
        .merge(routes::schedule::routes())
        // Announcements
        .merge(routes::announcements::routes())
        // Admin login
        .merge(routes::admin::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(ADMIN_PASSWORD_HEADER),
        ])
        .allow_origin(origins)
        .allow_credentials(true)
}

/// Starts the API server
///
/// Installs the tracing subscriber, wraps the router with CORS (when origins
/// are configured), request tracing and the timeout, and serves until shutdown.
pub async fn start_server(config: config::ApiConfig, state: ApiState) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let app = build_router(Arc::new(state));

    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    // Request tracing and timeout
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{} (clinic timezone {})", addr, config.timezone);
    axum::serve(listener, app).await?;

    Ok(())
}
