//! Concurrency cap.
//!
//! Requests beyond `listener.max_connections` in flight are rejected with
//! 503 instead of queueing behind slow backing store calls.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tokio::sync::Semaphore;

/// Shared permit pool for in-flight requests.
#[derive(Clone, Debug)]
pub struct ConcurrencyLimit {
    permits: Arc<Semaphore>,
}

impl ConcurrencyLimit {
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }
}

pub async fn limit_concurrency(
    State(limit): State<ConcurrencyLimit>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Ok(_permit) = limit.permits.clone().try_acquire_owned() else {
        tracing::warn!(path = %req.uri().path(), "Concurrency limit reached, shedding request");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "Service unavailable", "error": "too many requests in flight"})),
        )
            .into_response();
    };
    next.run(req).await
}
