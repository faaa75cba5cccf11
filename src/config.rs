// =============================================================================
// CONFIGURATION MODULE
// =============================================================================
// This module handles loading configuration from environment variables.
//
// LEARNING NOTES:
// - Environment variables are the standard way to configure containers
// - We parse them into a strongly-typed Config struct
// - This makes configuration errors obvious at startup, not runtime
// =============================================================================

use anyhow::{Context, Result};
use std::env;

// -----------------------------------------------------------------------------
// CONFIG STRUCT
// -----------------------------------------------------------------------------
// This struct holds all configuration values for the service.
// Each field corresponds to an environment variable.
//
// LEARNING NOTE:
// Using a struct instead of raw env::var() calls everywhere has benefits:
// 1. Type safety: PORT is u16, not String
// 2. Validation: Errors happen at startup, not later
// 3. Documentation: All config options are in one place
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 8080)
    pub port: u16,
}

impl Config {
    // -------------------------------------------------------------------------
    // LOAD CONFIGURATION FROM ENVIRONMENT
    // -------------------------------------------------------------------------
    /// Creates a Config by reading environment variables.
    ///
    /// # Returns
    /// - `Ok(Config)` if all variables parse
    /// - `Err` if a variable is set but malformed
    ///
    /// # Example
    /// ```
    /// let config = Config::from_env()?;
    /// println!("Server will listen on port {}", config.port);
    /// ```
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Read PORT env var, default to "8080" if not set
            // Then parse the string to u16 (unsigned 16-bit integer)
            //
            // LEARNING NOTE:
            // .context() adds helpful error messages when parsing fails
            // Instead of "invalid digit", you get "Failed to parse PORT"
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Failed to parse PORT as a number")?,
        })
    }
}
