//! # Error Handling Middleware
//!
//! Maps booking errors to HTTP status codes and JSON bodies. Every error body carries a
//! stable `code` next to the human-readable message, so a client can tell a taken slot
//! (`slot_unavailable`) apart from a generic failure without parsing text.

use appointly_core::errors::BookingError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use appointly_api::middleware::error_handling::AppError;
/// use appointly_core::errors::BookingError;
/// use axum::Json;
///
/// async fn handler() -> Result<Json<()>, AppError> {
///     let lookup: Result<(), BookingError> =
///         Err(BookingError::NotFound("Appointment with ID 1 not found".to_string()));
///     lookup?;
///     Ok(Json(()))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::ServiceArchived(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::SlotUnavailable(_) => StatusCode::CONFLICT,
            BookingError::InvalidTransition { .. } => StatusCode::CONFLICT,
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Authorization(_) => StatusCode::FORBIDDEN,
            BookingError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        }

        let body = Json(json!({
            "error": self.0.to_string(),
            "code": self.0.code(),
        }));

        (status, body).into_response()
    }
}

/// Allows `?` on `BookingResult` inside handlers.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Storage(err))
    }
}

pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
