//! Correlation-ID middleware: one uuid per request, echoed in the
//! response header and attached to the completion log line.

use std::time::Instant;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

pub const CORRELATION_HEADER: &str = "x-correlation-id";

pub async fn correlation(request: Request, next: Next) -> Response {
    let correlation_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let mut response = next.run(request).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;
    if status >= 400 {
        tracing::warn!(
            correlation_id = %correlation_id,
            method = %method,
            path = %path,
            status,
            duration_ms,
            "request completed with error"
        );
    } else {
        tracing::info!(
            correlation_id = %correlation_id,
            method = %method,
            path = %path,
            status,
            duration_ms,
            "request completed"
        );
    }

    if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}
