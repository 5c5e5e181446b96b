use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// Logs `METHOD path status in Nms` for every API call.
pub async fn log_request(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if !path.starts_with("/api") {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let start = Instant::now();
    let response = next.run(request).await;

    info!(
        "{method} {path} {} in {}ms",
        response.status().as_u16(),
        start.elapsed().as_millis()
    );

    response
}
