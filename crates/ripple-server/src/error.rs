//! `ImpactError` → HTTP mapping with `{error, code}` bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use ripple_core::{ErrorCode, ImpactError};

pub struct ApiError(pub ImpactError);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

/// Status mapping per the taxonomy. Kept as a free function so it is
/// testable without building a response.
pub fn status_for(err: &ImpactError) -> StatusCode {
    match err {
        ImpactError::Validation { .. } => StatusCode::BAD_REQUEST,
        ImpactError::ServiceNotFound { .. } => StatusCode::NOT_FOUND,
        ImpactError::StaleData { .. } | ImpactError::SourceUnavailable { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ImpactError::SourceTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        ImpactError::Upstream { .. } | ImpactError::Protocol { .. } => StatusCode::BAD_GATEWAY,
        ImpactError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let body = ErrorBody {
            error: self.0.to_string(),
            code: self.0.error_code(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ImpactError> for ApiError {
    fn from(err: ImpactError) -> Self {
        Self(err)
    }
}
