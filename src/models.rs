// =============================================================================
// MODELS MODULE
// =============================================================================
// This module defines the data structures used throughout the service.
//
// LEARNING NOTES:
// - Rust uses structs to define data structures
// - Derive macros automatically implement common traits
// - Serde handles JSON serialization/deserialization
// - The API speaks camelCase JSON; #[serde(rename_all = "camelCase")]
//   maps that onto idiomatic snake_case Rust fields
// =============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// =============================================================================
// CATALOG TYPES
// =============================================================================
// The hotel catalog is a static, preloaded reference dataset. Hotels and
// room types never change during the process lifetime; room availability
// is always derived from the booking ledger, never stored here.

/// A hotel in the static catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    /// Catalog identifier (stringly-typed, e.g. "1")
    pub id: String,

    /// Display name, e.g. "Grand Palace Hotel"
    pub name: String,

    /// City, e.g. "New York"
    pub location: String,

    /// Marketing description
    pub description: String,

    /// Guest rating out of 5
    pub rating: f32,

    /// Room types offered by this hotel
    pub rooms: Vec<RoomType>,
}

// -----------------------------------------------------------------------------
// ROOM TYPE
// -----------------------------------------------------------------------------
// One class of rooms within a hotel (Single, Double, Suite). The
// `room_numbers` field is the FULL pool of physical rooms of this type.
//
// LEARNING NOTE:
// There is deliberately no "available numbers" field here. Which numbers
// are free is a function of the booking ledger at a point in time, so we
// recompute it per query instead of maintaining a mutable mirror that
// could drift out of sync (see allocation.rs).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomType {
    /// Type label, unique within a hotel
    pub room_type: String,

    /// Maximum guests a single room of this type can hold
    pub max_guests: u32,

    /// Number of physical rooms of this type
    pub total_rooms: u32,

    /// Nightly rate in USD
    pub price_per_night: f64,

    /// Amenities included with this room type
    pub amenities: Vec<String>,

    /// Full static pool of room numbers for this type
    pub room_numbers: Vec<u32>,
}

// =============================================================================
// BOOKING TYPES
// =============================================================================

/// Lifecycle status of a booking.
///
/// `CheckedIn` is recognized (it counts as occupying rooms) but the
/// service never transitions a booking into it; front-desk systems would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Confirmed,
    CheckedIn,
    Cancelled,
}

impl BookingStatus {
    /// Whether a booking in this status occupies its rooms.
    pub fn is_active(self) -> bool {
        self != BookingStatus::Cancelled
    }
}

/// Payment state tracked on the booking (no payment processing here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Refunded,
}

// -----------------------------------------------------------------------------
// ROOM ASSIGNMENT
// -----------------------------------------------------------------------------
/// One physical room allocated to a booking, with the nightly rate
/// captured at booking time. Owned by exactly one booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAssignment {
    /// Room type label ("Single", "Double", ...)
    pub room_type: String,

    /// Physical room number within that type's pool
    pub room_number: u32,

    /// Guests placed in this room (never exceeds the type's max_guests)
    pub guests: u32,

    /// Nightly rate at the time the allocation was made
    pub price_per_night: f64,
}

// -----------------------------------------------------------------------------
// GUEST DETAILS
// -----------------------------------------------------------------------------
/// Identity of the booking guest.
///
/// The email doubles as the authorization token for cancellation and
/// modification: requests must present a matching email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GuestDetails {
    /// Full name of the guest
    #[validate(length(min = 1, message = "Guest name is required"))]
    pub guest_name: String,

    /// Contact email (used to verify cancellation/modification requests)
    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    /// Phone number or other contact detail
    #[validate(length(min = 1, message = "Contact is required"))]
    pub contact: String,

    /// Free-text special requests, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

// -----------------------------------------------------------------------------
// BOOKING
// -----------------------------------------------------------------------------
/// A booking record in the in-memory ledger.
///
/// Bookings are never physically deleted; cancellation flips the status
/// and leaves the record in place so occupancy queries can exclude it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Unique, monotonically assigned identifier (never reused)
    #[serde(rename = "bookingId")]
    pub id: u64,

    /// Catalog id of the booked hotel
    pub hotel_id: String,

    /// First night of the stay (inclusive)
    pub check_in: NaiveDate,

    /// Day of departure (exclusive: the room is free again that day)
    pub check_out: NaiveDate,

    /// Number of guests the allocation must cover
    pub guest_count: u32,

    /// Rooms allocated to this booking
    pub allocated_rooms: Vec<RoomAssignment>,

    /// Lifecycle status
    pub status: BookingStatus,

    /// Payment state flag
    pub payment_status: PaymentStatus,

    /// Guest identity (flattened into the JSON body)
    #[serde(flatten)]
    pub guest: GuestDetails,

    /// Total price for the whole stay across all allocated rooms
    pub total_price: f64,

    /// When the booking was created
    pub created_at: DateTime<Utc>,

    /// When the booking was last changed (cancel/modify)
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Room numbers held by this booking, grouped by room type label.
    pub fn rooms_by_type(&self) -> impl Iterator<Item = (&str, u32)> {
        self.allocated_rooms
            .iter()
            .map(|r| (r.room_type.as_str(), r.room_number))
    }
}

// =============================================================================
// API REQUEST STRUCTURES
// =============================================================================
// These structs define the shape of API requests. Separating them from
// the ledger types means the wire format can evolve without touching the
// core, and lets the validator derive enforce shape rules at the edge.

// -----------------------------------------------------------------------------
// CREATE BOOKING REQUEST
// -----------------------------------------------------------------------------
/// Request body for creating a booking
///
/// # Example JSON
/// ```json
/// {
///   "hotelId": "1",
///   "checkIn": "2025-04-01",
///   "checkOut": "2025-04-05",
///   "guestCount": 2,
///   "guestDetails": {
///     "guestName": "John Doe",
///     "email": "john@example.com",
///     "contact": "123456789"
///   }
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Catalog id of the hotel to book
    #[validate(length(min = 1, message = "Hotel ID is required"))]
    pub hotel_id: String,

    /// Requested check-in date (ISO-8601 calendar date)
    pub check_in: NaiveDate,

    /// Requested check-out date (must be after check-in)
    pub check_out: NaiveDate,

    /// Number of guests to accommodate
    #[validate(range(min = 1, max = 20, message = "Guest count must be between 1 and 20"))]
    pub guest_count: u32,

    /// Who is booking
    #[validate]
    pub guest_details: GuestDetails,
}

// -----------------------------------------------------------------------------
// CANCEL BOOKING REQUEST
// -----------------------------------------------------------------------------
/// Request body for cancelling a booking
/// The email must match the one stored on the booking.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    /// Booking to cancel
    pub booking_id: u64,

    /// Guest email for verification
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
}

// -----------------------------------------------------------------------------
// MODIFY BOOKING
// -----------------------------------------------------------------------------
/// Query parameters identifying the booking to modify
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ModifyBookingParams {
    /// Booking to modify
    pub booking_id: u64,

    /// Guest email for verification
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
}

/// Request body for modifying a booking
/// Omitted fields keep their current values.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingChanges {
    /// New check-in date, if changing
    pub new_check_in: Option<NaiveDate>,

    /// New check-out date, if changing
    pub new_check_out: Option<NaiveDate>,

    /// New guest count, if changing
    #[validate(range(min = 1, max = 20, message = "Guest count must be between 1 and 20"))]
    pub guest_count: Option<u32>,
}

// -----------------------------------------------------------------------------
// LOOKUP QUERIES
// -----------------------------------------------------------------------------
/// Query parameters for booking lookup (by id or by guest email)
///
/// # Example
/// GET /api/v1/hotel/bookings?bookingId=3
/// GET /api/v1/hotel/bookings?email=john@example.com
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    /// Booking identifier
    pub booking_id: Option<u64>,

    /// Guest email (returns the most recent matching booking)
    pub email: Option<String>,
}

/// Query parameters for the current-guests listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestsQuery {
    /// Hotel to list guests for
    pub hotel_id: Option<String>,
}

// =============================================================================
// API RESPONSE STRUCTURES
// =============================================================================

/// Standard success envelope wrapping every API response body
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always true on the success path
    pub success: bool,

    /// Human-readable summary, e.g. "Room booked successfully"
    pub message: String,

    /// Operation-specific payload
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload in the success envelope
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Response payload after a successful cancellation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationResponse {
    /// Booking that was cancelled
    pub booking_id: u64,

    /// Amount refunded (equals the booking's total price)
    pub refund_amount: f64,
}

/// One in-house guest entry in the current-guests listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestSummary {
    pub booking_id: u64,
    pub guest_name: String,
    pub email: String,
    pub contact: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: BookingStatus,
    pub rooms: Vec<RoomSummary>,
}

/// Room occupancy line within a guest summary
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_type: String,
    pub room_number: u32,
    pub guests: u32,
}

/// Response payload for the current-guests listing
///
/// When the hotel id does not resolve, `hotel` carries the placeholder
/// "Unknown Hotel" and the guest list is empty; this endpoint never
/// errors on an unknown hotel.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentGuestsResponse {
    /// Hotel display name, or "Unknown Hotel"
    pub hotel: String,

    /// Guests whose stay window contains the current instant
    pub current_guests: Vec<GuestSummary>,
}

// =============================================================================
// HEALTH CHECK RESPONSES
// =============================================================================
// Standard health check response structures

/// Simple health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Detailed readiness check response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: ReadinessChecks,
}

/// Individual dependency health checks
#[derive(Debug, Serialize)]
pub struct ReadinessChecks {
    /// The in-memory catalog is loaded and non-empty
    pub catalog: bool,
}

// =============================================================================
// ERROR RESPONSES
// =============================================================================
// Standardized error response format for API

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }
}
