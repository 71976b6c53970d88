//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies so every
//! endpoint reports failures the same way.
//!
//! Booking failures are client errors: a slot that is not in the event's
//! calendar is a 404, every other rejected booking is a 422. When slots run
//! out of seats the body also lists them under `"slots"`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use pubgames_core::errors::{BookingError, PubError};
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// ```
/// use axum::Json;
/// use pubgames_api::middleware::error_handling::AppError;
/// use pubgames_core::errors::PubError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(PubError::NotFound("Event not found".to_string())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub PubError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PubError::NotFound(_) => StatusCode::NOT_FOUND,
            PubError::Validation(_) => StatusCode::BAD_REQUEST,
            PubError::Booking(BookingError::SlotNotFound(_)) => StatusCode::NOT_FOUND,
            PubError::Booking(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PubError::Conflict(_) => StatusCode::CONFLICT,
            PubError::Authentication(_) => StatusCode::UNAUTHORIZED,
            PubError::Authorization(_) => StatusCode::FORBIDDEN,
            PubError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PubError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        }

        let message = self.0.to_string();
        let body = match &self.0 {
            PubError::Booking(BookingError::InsufficientCapacity { labels }) => {
                json!({ "error": message, "slots": labels })
            }
            _ => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Allows `?` on functions returning `PubResult` inside handlers
impl From<PubError> for AppError {
    fn from(err: PubError) -> Self {
        AppError(err)
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(PubError::Booking(err))
    }
}

/// Store failures surface as database errors
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(PubError::Database(err))
    }
}

/// Maps a PubError directly to an HTTP response
pub fn map_error(err: PubError) -> Response {
    AppError(err).into_response()
}
