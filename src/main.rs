// =============================================================================
// BOOKING SERVICE - Main Entry Point
// =============================================================================
// This is the main entry point for the Rust-based Hotel Booking Service.
//
// WHAT THIS SERVICE DOES:
// - Assigns guests to rooms across a small fixed catalog of hotels
// - Tracks bookings in memory (create, lookup, cancel, modify)
// - Re-allocates rooms atomically when a booking is modified
// - Exposes Prometheus metrics for observability
//
// LEARNING GOALS:
// - Understand Rust async programming with Tokio
// - Learn Axum web framework patterns
// - See how Prometheus metrics work in Rust
// - Understand error handling in Rust
// =============================================================================

// -----------------------------------------------------------------------------
// MODULE DECLARATIONS
// -----------------------------------------------------------------------------
// In Rust, we organize code into modules. Each `mod` statement tells the
// compiler to look for a file or directory with that name.
mod allocation; // Room allocation engine (allocation.rs)
mod catalog;    // Static hotel catalog (catalog.rs)
mod config;     // Configuration loading (config.rs)
mod error;      // Error types (error.rs)
mod handlers;   // HTTP request handlers (handlers.rs)
mod metrics;    // Prometheus metrics setup (metrics.rs)
mod models;     // Data structures (models.rs)
mod store;      // Booking ledger + lifecycle operations (store.rs)

// -----------------------------------------------------------------------------
// IMPORTS (use statements)
// -----------------------------------------------------------------------------
// Rust uses `use` to bring items into scope. This is similar to `import` in
// other languages.

use axum::{
    // Router is used to define URL routes
    routing::{delete, get, post, put},
    Router,
};

// Extension allows sharing state across request handlers
use std::sync::Arc;

// Tower-HTTP provides common HTTP middleware
use tower_http::{
    cors::{Any, CorsLayer}, // CORS handling
    trace::TraceLayer,      // Request tracing/logging
};

// Tracing is Rust's logging framework
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Our custom modules
use crate::config::Config;
use crate::metrics::setup_metrics;
use crate::store::{BookingStore, SharedStore};

// -----------------------------------------------------------------------------
// APPLICATION STATE
// -----------------------------------------------------------------------------
// This struct holds shared state that's available to all request handlers.
// Arc (Atomic Reference Counting) allows safe sharing across async tasks.
//
// LEARNING NOTE:
// In Rust, we can't just share mutable data across threads. The booking
// ledger lives behind Arc<RwLock<..>>: read handlers take a read guard,
// and every lifecycle operation (create/cancel/modify) takes the write
// guard for its whole duration, so availability reads and ledger commits
// always see a consistent snapshot.
pub struct AppState {
    // Booking ledger + hotel catalog behind a read/write lock
    pub store: SharedStore,

    // Prometheus metrics handle
    // Used to render metrics in Prometheus format
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}

// -----------------------------------------------------------------------------
// MAIN FUNCTION
// -----------------------------------------------------------------------------
// The #[tokio::main] attribute transforms this into an async main function.
// Tokio runtime is started automatically.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -------------------------------------------------------------------------
    // STEP 1: Load environment variables
    // -------------------------------------------------------------------------
    // dotenvy loads variables from .env file into environment
    // This is useful for local development
    dotenvy::dotenv().ok(); // .ok() ignores errors (file might not exist)

    // -------------------------------------------------------------------------
    // STEP 2: Initialize logging/tracing
    // -------------------------------------------------------------------------
    // Set up structured logging with JSON output
    // RUST_LOG environment variable controls log levels
    // Example: RUST_LOG=info,booking_service=debug
    tracing_subscriber::registry()
        // Add filter layer (reads RUST_LOG env var)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,booking_service=debug".into()),
        )
        // Add JSON formatting layer
        .with(tracing_subscriber::fmt::layer().json())
        // Initialize as the global default
        .init();

    info!("Starting Booking Service...");

    // -------------------------------------------------------------------------
    // STEP 3: Load configuration
    // -------------------------------------------------------------------------
    // Config::from_env() reads environment variables and returns a Config struct
    // The ? operator propagates errors (returns early if there's an error)
    let config = Config::from_env()?;
    info!(port = config.port, "Configuration loaded");

    // -------------------------------------------------------------------------
    // STEP 4: Set up Prometheus metrics
    // -------------------------------------------------------------------------
    // This creates a metrics recorder and returns a handle for rendering metrics
    let metrics_handle = setup_metrics()?;
    info!("Prometheus metrics initialized");

    // -------------------------------------------------------------------------
    // STEP 5: Load the hotel catalog and create the booking store
    // -------------------------------------------------------------------------
    // The catalog is a static in-memory dataset; the ledger starts empty
    let hotels = catalog::seed_hotels();
    info!(hotels = hotels.len(), "Hotel catalog loaded");
    let store = BookingStore::new(hotels).shared();

    // -------------------------------------------------------------------------
    // STEP 6: Create application state
    // -------------------------------------------------------------------------
    // Arc wraps the state so it can be safely shared across request handlers
    let state = Arc::new(AppState {
        store,
        metrics_handle,
    });

    // -------------------------------------------------------------------------
    // STEP 7: Define routes
    // -------------------------------------------------------------------------
    // Router maps URL paths to handler functions
    //
    // LEARNING NOTE:
    // Axum uses a type-safe routing system. The handler function signatures
    // determine what data is extracted from requests automatically.
    let app = Router::new()
        // ----- Health & Readiness Endpoints -----
        // These are used by Kubernetes/Docker for health checks
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        // ----- Metrics Endpoint -----
        // Prometheus scrapes this endpoint to collect metrics
        .route("/metrics", get(handlers::metrics_handler))
        // ----- Booking API Endpoints -----
        // RESTful API for hotel bookings
        .route(
            "/api/v1/hotel/bookings",
            post(handlers::create_booking).get(handlers::get_booking),
        )
        .route(
            "/api/v1/hotel/bookings/cancel",
            delete(handlers::cancel_booking),
        )
        .route(
            "/api/v1/hotel/bookings/modify",
            put(handlers::modify_booking),
        )
        .route("/api/v1/hotel/guests", get(handlers::list_current_guests))
        // ----- Middleware Layers -----
        // Layers wrap the entire application and process every request

        // CORS layer: Allow cross-origin requests
        // This is necessary for the frontend to call this API
        .layer(
            CorsLayer::new()
                .allow_origin(Any) // Allow any origin (configure for production!)
                .allow_methods(Any) // Allow any HTTP method
                .allow_headers(Any), // Allow any headers
        )
        // Trace layer: Log every request
        .layer(TraceLayer::new_for_http())
        // Share application state with all handlers
        // with_state() makes state available via State<Arc<AppState>> extractor
        .with_state(state);

    // -------------------------------------------------------------------------
    // STEP 8: Start the HTTP server
    // -------------------------------------------------------------------------
    // Bind to all network interfaces (0.0.0.0) on the configured port
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(address = %addr, "Booking Service is listening");

    // Start accepting connections
    // This runs forever until the process is terminated
    axum::serve(listener, app).await?;

    Ok(())
}
