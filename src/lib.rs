//! Aegis Monitoring Console
//!
//! Terminal client for the Aegis threat-detection backend. The backend does
//! the actual analysis; this crate drives it over HTTP and keeps a live view
//! of its output:
//!
//! - `monitor::job` owns the lifecycle of one cancellable detection run
//! - `monitor::feed` reconciles polled alerts into a bounded, deduplicated feed
//! - `monitor::filter` re-filters the last run's results without re-fetching
//! - `monitor::series` buckets alerts into distribution + timeline series
//! - `backend` is the HTTP boundary (and the only place wire quirks are handled)
//! - `console` is the interactive command loop and text rendering

pub mod backend;
pub mod console;
pub mod constants;
pub mod error;
pub mod monitor;

pub use error::{MonitorError, MonitorResult};
