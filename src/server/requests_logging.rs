//! Request logging middleware

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use log::{debug, warn};
use std::time::Instant;

pub async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed = start.elapsed();
    if status.is_server_error() {
        warn!("{method} {uri} -> {status} in {elapsed:?}");
    } else {
        debug!("{method} {uri} -> {status} in {elapsed:?}");
    }
    response
}
