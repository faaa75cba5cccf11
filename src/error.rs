// =============================================================================
// ERROR MODULE
// =============================================================================
// This module defines custom error types and their HTTP responses.
//
// LEARNING NOTES:
// - Rust doesn't have exceptions; it uses Result<T, E> for error handling
// - thiserror crate makes defining error types easy
// - We convert our errors to HTTP responses using Axum's IntoResponse
//
// ERROR HANDLING PHILOSOPHY:
// - Errors should be informative but not leak internal details
// - Use typed errors instead of stringly-typed errors
// - Map errors to appropriate HTTP status codes
// - Lifecycle operations prefix errors with their context ("Booking
//   failed: ...") while the inner kind stays matchable for callers
// =============================================================================

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// =============================================================================
// CUSTOM ERROR TYPE
// =============================================================================
// This enum defines all possible errors in our service.
//
// LEARNING NOTE:
// The #[error("...")] attribute from thiserror automatically implements
// Display trait, so we get nice error messages for free.
#[derive(Debug, Error)]
pub enum AppError {
    // -------------------------------------------------------------------------
    // LOOKUP ERRORS
    // -------------------------------------------------------------------------
    /// Hotel or booking does not exist
    #[error("{0}")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // AUTHORIZATION ERRORS
    // -------------------------------------------------------------------------
    /// Presented email does not match the booking record
    #[error("Email does not match booking record")]
    Unauthorized,

    // -------------------------------------------------------------------------
    // VALIDATION ERRORS
    // -------------------------------------------------------------------------
    /// Stay window is malformed or in the past
    #[error("{0}")]
    InvalidDates(String),

    /// Request shape is invalid (caught at the HTTP edge)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    // -------------------------------------------------------------------------
    // STATE CONFLICT ERRORS
    // -------------------------------------------------------------------------
    /// The booking was already cancelled
    #[error("Booking is already cancelled")]
    AlreadyCancelled,

    /// The stay has already started; too late to cancel or modify
    #[error("{0}")]
    PastCheckIn(String),

    // -------------------------------------------------------------------------
    // CAPACITY ERRORS
    // -------------------------------------------------------------------------
    /// The allocation engine could not place every guest.
    /// Always reports how many of the requested guests had room; the
    /// ledger and catalog are untouched when this is returned.
    #[error(
        "Could not accommodate all guests. Only {accommodated} of {requested} guests could be booked."
    )]
    Capacity { accommodated: u32, requested: u32 },

    // -------------------------------------------------------------------------
    // CONTEXT WRAPPER
    // -------------------------------------------------------------------------
    /// An error wrapped with an operation-scoped prefix.
    /// `kind()` sees through this wrapper, so callers can still match on
    /// the underlying variant instead of string-matching the message.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<AppError>,
    },

    // -------------------------------------------------------------------------
    // INTERNAL ERRORS
    // -------------------------------------------------------------------------
    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wrap this error with an operation-scoped prefix, e.g.
    /// "Cancellation failed: Booking is already cancelled".
    pub fn context(self, context: impl Into<String>) -> Self {
        AppError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The underlying error kind, stripped of any context wrappers.
    pub fn kind(&self) -> &AppError {
        match self {
            AppError::Context { source, .. } => source.kind(),
            other => other,
        }
    }
}

// =============================================================================
// HTTP RESPONSE CONVERSION
// =============================================================================
// Axum uses the IntoResponse trait to convert types into HTTP responses.
// By implementing this for AppError, we can return errors directly from handlers.
//
// LEARNING NOTE:
// This pattern allows clean handler code like:
//   async fn handler() -> Result<Json<T>, AppError> { ... }
// Errors are automatically converted to proper HTTP responses.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Determine HTTP status code based on the underlying kind, not
        // the context wrapper
        let (status, error_code) = match self.kind() {
            // 404 Not Found: Resource doesn't exist
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),

            // 401 Unauthorized: Email verification failed
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),

            // 400 Bad Request: Client sent invalid data
            AppError::InvalidDates(_) => (StatusCode::BAD_REQUEST, "INVALID_DATES"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),

            // 409 Conflict: Business rule violation
            AppError::AlreadyCancelled => (StatusCode::CONFLICT, "ALREADY_CANCELLED"),
            AppError::PastCheckIn(_) => (StatusCode::CONFLICT, "PAST_CHECK_IN"),
            AppError::Capacity { .. } => (StatusCode::CONFLICT, "CAPACITY_EXCEEDED"),

            // 500 Internal Server Error: Something went wrong on our side
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),

            // kind() never returns a Context wrapper
            AppError::Context { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        // The full message includes any operation context prefix
        let message = self.to_string();

        // Log the error for debugging
        // In production, this goes to your logging system (Loki)
        tracing::error!(
            error_code = error_code,
            message = %message,
            "Request failed"
        );

        // Build the JSON response body
        let body = ErrorResponse::new(error_code, message);

        // Combine status code and body into a response
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================
// A convenient type alias for Results that use our error type.
// This saves typing Result<T, AppError> everywhere.
pub type AppResult<T> = Result<T, AppError>;

// =============================================================================
// CONVERSION HELPERS
// =============================================================================
// Sometimes we need to convert between error types.

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
