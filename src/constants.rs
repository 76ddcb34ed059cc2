//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change the default backend server, only edit this file.

/// Default detection backend URL
///
/// This is the fallback URL when no environment variable is set.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Default HTTP request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Default refresh interval for the stats/alerts poll (seconds)
pub const DEFAULT_REFRESH_INTERVAL: u64 = 5;

/// Maximum number of rows kept in the live alert feed
pub const ALERT_FEED_CAPACITY: usize = 50;

/// Stored-log count above which a run without an explicit limit is refused
/// by the console (the controller itself does not enforce this)
pub const LARGE_RUN_THRESHOLD: u64 = 10_000;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Aegis Console";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get backend URL from environment or use default
pub fn get_backend_url() -> String {
    std::env::var("AEGIS_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string())
}

/// Get request timeout from environment or use default
pub fn get_request_timeout() -> u64 {
    std::env::var("AEGIS_REQUEST_TIMEOUT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
}

/// Get refresh interval from environment or use default
pub fn get_refresh_interval() -> u64 {
    std::env::var("AEGIS_REFRESH_INTERVAL")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_REFRESH_INTERVAL)
}
