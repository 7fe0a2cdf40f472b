use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{bulk, event, health, request, review};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Request lifecycle
        .route("/api/v1/requests", post(request::create_request).get(request::list_requests))
        .route("/api/v1/requests/{request_id}", get(request::get_request).put(request::update_request))
        .route("/api/v1/requests/{request_id}/pre-approve", post(review::pre_approve_request))
        .route("/api/v1/requests/{request_id}/payment", post(review::mark_as_paid))
        .route("/api/v1/requests/{request_id}/approve", post(review::approve_request))
        .route("/api/v1/requests/{request_id}/observe", post(review::observe_request))
        .route("/api/v1/requests/{request_id}/reject", post(review::reject_request))
        .route("/api/v1/requests/{request_id}/transfer", post(review::transfer_table))
        .route("/api/v1/requests/{request_id}/tickets", get(request::download_request_tickets))

        // Events
        .route("/api/v1/events/{event_id}/available-tables", get(event::get_available_tables))
        .route("/api/v1/events/{event_id}/bulk-invitations", post(bulk::create_bulk_invitations))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                        user_role = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
