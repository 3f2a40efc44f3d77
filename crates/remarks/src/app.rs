use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        comments::{create_comment, delete_comment, get_comment, list_comments, list_replies},
        counts::get_count,
        degraded::{get_degraded, set_degraded},
        health::livez,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
///
/// The timeout layer is the request deadline: when it fires the handler future
/// is dropped, cancelling its in-flight storage and cache calls.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/comments", get(list_comments).post(create_comment))
        .route("/comments/{id}", get(get_comment).delete(delete_comment))
        .route("/comments/{id}/replies", get(list_replies))
        .route("/counts", get(get_count))
        .route("/degraded", get(get_degraded).put(set_degraded))
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
