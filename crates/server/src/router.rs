use super::{handlers, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(app_state.config.max_upload_bytes);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/api/sensor-readings",
            post(handlers::sensor_readings_handler).layer(upload_limit.clone()),
        )
        .route(
            "/api/bank-statement",
            post(handlers::bank_statement_handler).layer(upload_limit),
        )
        .route("/api/weather", get(handlers::weather_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
