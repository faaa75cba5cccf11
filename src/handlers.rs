// =============================================================================
// HANDLERS MODULE
// =============================================================================
// This module contains all HTTP request handlers (controller layer).
//
// LEARNING NOTES:
// - Handlers are async functions that receive requests and return responses
// - Axum uses "extractors" to parse request data (path params, JSON body, etc.)
// - State is shared via the State<T> extractor
//
// AXUM EXTRACTORS EXPLAINED:
// - State<T>: Access shared application state
// - Query<T>: Extract query parameters (?bookingId=3 → booking_id)
// - Json<T>: Parse JSON request body
//
// The handlers only do edge work: shape validation, lock acquisition,
// metrics, and envelope formatting. All booking rules live in store.rs.
// =============================================================================

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::metrics;
use crate::models::*;
use crate::AppState;

// =============================================================================
// HEALTH CHECK ENDPOINTS
// =============================================================================
// These endpoints are used by orchestrators (Kubernetes, Docker) to determine
// if the service is running and ready to receive traffic.

/// Liveness probe - Is the service running?
///
/// Returns 200 OK if the service is alive.
/// If this fails, the orchestrator will restart the container.
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    // Simply return OK - if we can respond, we're alive
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "booking-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness probe - Is the service ready to handle requests?
///
/// The only dependency is the in-memory catalog, so readiness means the
/// seed data loaded at startup.
///
/// GET /ready
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReadinessResponse>, StatusCode> {
    let catalog_loaded = state.store.read().await.catalog_loaded();

    let status = if catalog_loaded { "ready" } else { "not_ready" };
    let response = ReadinessResponse {
        status: status.to_string(),
        checks: ReadinessChecks {
            catalog: catalog_loaded,
        },
    };

    if catalog_loaded {
        Ok(Json(response))
    } else {
        // Return 503 Service Unavailable if not ready
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

// =============================================================================
// METRICS ENDPOINT
// =============================================================================
/// Prometheus metrics endpoint
///
/// Returns all metrics in Prometheus text format.
/// Prometheus server scrapes this endpoint periodically.
///
/// GET /metrics
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> String {
    // Render all metrics in Prometheus exposition format
    state.metrics_handle.render()
}

// =============================================================================
// BOOKING API ENDPOINTS
// =============================================================================

// -----------------------------------------------------------------------------
// CREATE BOOKING
// -----------------------------------------------------------------------------
/// Book rooms at a hotel with automatic room assignment
///
/// POST /api/v1/hotel/bookings
///
/// # Request Body
/// ```json
/// {
///   "hotelId": "1",
///   "checkIn": "2025-04-01",
///   "checkOut": "2025-04-05",
///   "guestCount": 3,
///   "guestDetails": {
///     "guestName": "John Doe",
///     "email": "john@example.com",
///     "contact": "123456789"
///   }
/// }
/// ```
///
/// # Response
/// - 201 Created: Booking confirmed, returns booking details
/// - 400 Bad Request: Malformed input or invalid dates
/// - 404 Not Found: Hotel doesn't exist
/// - 409 Conflict: Not enough rooms for every guest
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Booking>>)> {
    let start = Instant::now();

    // Shape validation at the edge (email format, guest count range)
    request.validate()?;

    tracing::info!(
        hotel_id = %request.hotel_id,
        check_in = %request.check_in,
        check_out = %request.check_out,
        guest_count = request.guest_count,
        "Attempting to book rooms"
    );

    // One write guard for the whole operation: the availability read and
    // the ledger commit happen under the same critical section
    let mut store = state.store.write().await;
    let result = store.create_booking(&request, Utc::now());

    let duration = start.elapsed().as_secs_f64();

    match result {
        Ok(booking) => {
            metrics::record_http_request("POST", "/api/v1/hotel/bookings", 201, duration);
            metrics::record_booking(&request.hotel_id, true);
            metrics::record_rooms_allocated(booking.allocated_rooms.len());
            metrics::set_active_bookings(store.active_booking_count());

            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::new("Room booked successfully", booking)),
            ))
        }
        Err(e) => {
            metrics::record_http_request("POST", "/api/v1/hotel/bookings", 409, duration);
            metrics::record_booking(&request.hotel_id, false);

            tracing::warn!(
                hotel_id = %request.hotel_id,
                error = %e,
                "Failed to book rooms"
            );

            Err(e.context("Booking failed"))
        }
    }
}

// -----------------------------------------------------------------------------
// GET BOOKING
// -----------------------------------------------------------------------------
/// Retrieve booking details by id or by guest email
///
/// GET /api/v1/hotel/bookings?bookingId=3
/// GET /api/v1/hotel/bookings?email=john@example.com
///
/// # Response
/// - 200 OK: Booking found
/// - 400 Bad Request: Neither filter supplied
/// - 404 Not Found: No matching booking
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookingQuery>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let start = Instant::now();

    if query.booking_id.is_none() && query.email.is_none() {
        return Err(AppError::BadRequest(
            "bookingId or email query parameter is required".to_string(),
        ));
    }

    let store = state.store.read().await;
    let booking = store
        .find_booking(&query)
        .cloned()
        .ok_or_else(|| AppError::NotFound("No booking found".to_string()))?;

    let duration = start.elapsed().as_secs_f64();
    metrics::record_http_request("GET", "/api/v1/hotel/bookings", 200, duration);

    Ok(Json(ApiResponse::new(
        "Booking retrieved successfully",
        booking,
    )))
}

// -----------------------------------------------------------------------------
// CURRENT GUESTS
// -----------------------------------------------------------------------------
/// List guests currently in-house at a hotel
///
/// GET /api/v1/hotel/guests?hotelId=1
///
/// An unknown (or missing) hotel id is not an error: the response
/// carries the "Unknown Hotel" label and an empty guest list.
pub async fn list_current_guests(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GuestsQuery>,
) -> AppResult<Json<ApiResponse<CurrentGuestsResponse>>> {
    let start = Instant::now();

    let store = state.store.read().await;
    let listing = store.current_guests(query.hotel_id.as_deref(), Utc::now());

    let duration = start.elapsed().as_secs_f64();
    metrics::record_http_request("GET", "/api/v1/hotel/guests", 200, duration);

    Ok(Json(ApiResponse::new(
        "Guests retrieved successfully",
        listing,
    )))
}

// -----------------------------------------------------------------------------
// CANCEL BOOKING
// -----------------------------------------------------------------------------
/// Cancel a booking before its check-in time
///
/// DELETE /api/v1/hotel/bookings/cancel
///
/// # Request Body
/// ```json
/// { "bookingId": 3, "email": "john@example.com" }
/// ```
///
/// # Response
/// - 200 OK: Cancelled, returns the refund amount
/// - 401 Unauthorized: Email doesn't match the booking
/// - 404 Not Found: Booking doesn't exist
/// - 409 Conflict: Already cancelled, or check-in has passed
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CancelBookingRequest>,
) -> AppResult<Json<ApiResponse<CancellationResponse>>> {
    let start = Instant::now();

    request.validate()?;

    tracing::info!(
        booking_id = request.booking_id,
        "Attempting to cancel booking"
    );

    let mut store = state.store.write().await;
    let result = store.cancel_booking(request.booking_id, &request.email, Utc::now());

    let duration = start.elapsed().as_secs_f64();

    match result {
        Ok(refund_amount) => {
            metrics::record_http_request("DELETE", "/api/v1/hotel/bookings/cancel", 200, duration);
            metrics::record_cancellation(true);
            metrics::set_active_bookings(store.active_booking_count());

            Ok(Json(ApiResponse::new(
                "Booking cancelled successfully",
                CancellationResponse {
                    booking_id: request.booking_id,
                    refund_amount,
                },
            )))
        }
        Err(e) => {
            metrics::record_http_request("DELETE", "/api/v1/hotel/bookings/cancel", 409, duration);
            metrics::record_cancellation(false);

            tracing::warn!(
                booking_id = request.booking_id,
                error = %e,
                "Failed to cancel booking"
            );

            Err(e.context("Cancellation failed"))
        }
    }
}

// -----------------------------------------------------------------------------
// MODIFY BOOKING
// -----------------------------------------------------------------------------
/// Modify a booking's dates and/or guest count
///
/// PUT /api/v1/hotel/bookings/modify?bookingId=3&email=john@example.com
///
/// # Request Body
/// ```json
/// { "newCheckIn": "2025-06-15", "newCheckOut": "2025-06-20", "guestCount": 3 }
/// ```
///
/// Omitted fields keep their current values. The change is atomic: if
/// the new stay cannot be fully accommodated, the booking is untouched.
///
/// # Response
/// - 200 OK: Modified, returns the updated booking
/// - 400 Bad Request: Invalid dates or guest count
/// - 401 Unauthorized: Email doesn't match the booking
/// - 404 Not Found: Booking doesn't exist
/// - 409 Conflict: No capacity for the new stay, or check-in has passed
pub async fn modify_booking(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ModifyBookingParams>,
    Json(changes): Json<BookingChanges>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let start = Instant::now();

    params.validate()?;
    changes.validate()?;

    tracing::info!(
        booking_id = params.booking_id,
        new_check_in = ?changes.new_check_in,
        new_check_out = ?changes.new_check_out,
        guest_count = ?changes.guest_count,
        "Attempting to modify booking"
    );

    let mut store = state.store.write().await;
    let result = store.modify_booking(params.booking_id, &params.email, &changes, Utc::now());

    let duration = start.elapsed().as_secs_f64();

    match result {
        Ok(booking) => {
            metrics::record_http_request("PUT", "/api/v1/hotel/bookings/modify", 200, duration);
            metrics::record_modification(true);
            metrics::set_active_bookings(store.active_booking_count());

            Ok(Json(ApiResponse::new(
                "Booking modified successfully",
                booking,
            )))
        }
        Err(e) => {
            metrics::record_http_request("PUT", "/api/v1/hotel/bookings/modify", 409, duration);
            metrics::record_modification(false);

            tracing::warn!(
                booking_id = params.booking_id,
                error = %e,
                "Failed to modify booking"
            );

            Err(e.context("Booking modification failed"))
        }
    }
}
