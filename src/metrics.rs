// =============================================================================
// METRICS MODULE
// =============================================================================
// This module sets up Prometheus metrics for observability.
//
// LEARNING NOTES:
// - Prometheus uses a "pull" model - it scrapes /metrics endpoint
// - Metrics have types: Counter, Gauge, Histogram, Summary
// - Labels add dimensions to metrics (e.g., endpoint="/api/v1/hotel/bookings")
//
// METRIC TYPES EXPLAINED:
// - Counter: Only goes up (requests, errors). Resets on restart.
// - Gauge: Can go up or down (active bookings, queue size).
// - Histogram: Distribution of values in buckets (latency percentiles).
// - Summary: Like histogram but calculates percentiles client-side.
// =============================================================================

use anyhow::Result;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

// =============================================================================
// METRIC NAMES (Constants)
// =============================================================================
// Define metric names as constants to avoid typos and enable IDE autocomplete.
//
// NAMING CONVENTION (Prometheus best practices):
// - Use snake_case
// - Include unit in suffix: _seconds, _bytes, _total
// - Use _total suffix for counters
// - Be descriptive but not too long

/// HTTP request counter
/// Labels: method (GET/POST), endpoint (/api/v1/hotel/bookings), status (200/409)
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

/// HTTP request duration histogram
/// Labels: method, endpoint
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

/// Booking creation attempts counter
/// Labels: hotel, outcome (confirmed/rejected)
pub const BOOKINGS_TOTAL: &str = "bookings_total";

/// Booking cancellation counter
/// Labels: outcome (cancelled/rejected)
pub const BOOKING_CANCELLATIONS_TOTAL: &str = "booking_cancellations_total";

/// Booking modification counter
/// Labels: outcome (modified/rejected)
pub const BOOKING_MODIFICATIONS_TOTAL: &str = "booking_modifications_total";

/// Active (non-cancelled) bookings gauge
pub const BOOKINGS_ACTIVE: &str = "bookings_active";

/// Rooms allocated per successful booking (histogram)
pub const BOOKING_ROOMS_ALLOCATED: &str = "booking_rooms_allocated";

// =============================================================================
// SETUP FUNCTION
// =============================================================================
/// Initialize Prometheus metrics recorder
///
/// This function:
/// 1. Creates a PrometheusBuilder
/// 2. Configures histogram buckets
/// 3. Installs the recorder globally
/// 4. Returns a handle for rendering metrics
///
/// # Returns
/// * `PrometheusHandle` - Used to render metrics in Prometheus format
pub fn setup_metrics() -> Result<PrometheusHandle> {
    // -------------------------------------------------------------------------
    // HISTOGRAM BUCKETS
    // -------------------------------------------------------------------------
    // For latency metrics, we use buckets that make sense for HTTP requests
    // served entirely from memory: most land well under 10ms, the upper
    // buckets catch pathological cases.
    let latency_buckets = &[
        0.001,  // 1ms
        0.005,  // 5ms
        0.01,   // 10ms
        0.025,  // 25ms
        0.05,   // 50ms
        0.1,    // 100ms
        0.25,   // 250ms
        0.5,    // 500ms
        1.0,    // 1 second
        2.5,    // 2.5 seconds
        5.0,    // 5 seconds
        10.0,   // 10 seconds
    ];

    // Room-count buckets: a booking allocates between 1 and ~20 rooms
    let room_buckets = &[1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 20.0];

    // Build the Prometheus exporter
    let handle = PrometheusBuilder::new()
        // Configure buckets for HTTP request duration
        .set_buckets_for_metric(
            Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
            latency_buckets,
        )?
        // Configure buckets for per-booking room counts
        .set_buckets_for_metric(
            Matcher::Full(BOOKING_ROOMS_ALLOCATED.to_string()),
            room_buckets,
        )?
        // Install as the global metrics recorder
        .install_recorder()?;

    // -------------------------------------------------------------------------
    // METRIC DESCRIPTIONS
    // -------------------------------------------------------------------------
    // Descriptions appear in the /metrics output as HELP comments.
    // They help humans understand what each metric measures.

    describe_counter!(
        HTTP_REQUESTS_TOTAL,
        "Total number of HTTP requests received"
    );

    describe_histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "HTTP request latency in seconds"
    );

    describe_counter!(
        BOOKINGS_TOTAL,
        "Total number of booking creation attempts"
    );

    describe_counter!(
        BOOKING_CANCELLATIONS_TOTAL,
        "Total number of booking cancellation attempts"
    );

    describe_counter!(
        BOOKING_MODIFICATIONS_TOTAL,
        "Total number of booking modification attempts"
    );

    describe_gauge!(BOOKINGS_ACTIVE, "Number of non-cancelled bookings");

    describe_histogram!(
        BOOKING_ROOMS_ALLOCATED,
        "Rooms allocated per successful booking"
    );

    Ok(handle)
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================
// These functions provide a convenient API for recording metrics.
// They wrap the raw metrics macros with proper labels.

/// Record an HTTP request
///
/// # Arguments
/// * `method` - HTTP method (GET, POST, etc.)
/// * `endpoint` - Request path (/api/v1/hotel/bookings)
/// * `status` - Response status code (200, 404, 409)
/// * `duration_secs` - Request duration in seconds
pub fn record_http_request(method: &str, endpoint: &str, status: u16, duration_secs: f64) {
    // Increment request counter
    counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    // Record latency in histogram
    histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string()
    )
    .record(duration_secs);
}

/// Record a booking creation attempt
///
/// # Arguments
/// * `hotel_id` - Catalog id of the hotel
/// * `success` - Whether the booking was confirmed
pub fn record_booking(hotel_id: &str, success: bool) {
    let outcome = if success { "confirmed" } else { "rejected" };
    counter!(
        BOOKINGS_TOTAL,
        "hotel" => hotel_id.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record a cancellation attempt
pub fn record_cancellation(success: bool) {
    let outcome = if success { "cancelled" } else { "rejected" };
    counter!(
        BOOKING_CANCELLATIONS_TOTAL,
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record a modification attempt
pub fn record_modification(success: bool) {
    let outcome = if success { "modified" } else { "rejected" };
    counter!(
        BOOKING_MODIFICATIONS_TOTAL,
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Update the active bookings gauge
pub fn set_active_bookings(count: usize) {
    gauge!(BOOKINGS_ACTIVE).set(count as f64);
}

/// Record how many rooms a successful allocation used
pub fn record_rooms_allocated(rooms: usize) {
    histogram!(BOOKING_ROOMS_ALLOCATED).record(rooms as f64);
}
