pub mod api_errors;
pub mod auth;
pub mod chapa;
pub mod payments;
pub mod smtp;

use {
    crate::AppState,
    axum::{
        Router,
        extract::DefaultBodyLimit,
        http::StatusCode,
        routing::{get, post},
    },
    std::time::Duration,
    tower::ServiceBuilder,
    tower_http::{timeout::TimeoutLayer, trace::TraceLayer},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/api/payments", get(payments::list_handler))
        .route("/api/payments/initiate", post(payments::initiate_handler))
        .route("/api/payments/verify", post(payments::verify_handler))
        .route("/api/payments/webhook", post(chapa::webhook::webhook_handler))
        .route("/api/payments/{id}", get(payments::get_handler))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    REQUEST_TIMEOUT,
                )),
        )
        .with_state(state)
}
