//! Backend boundary - HTTP client and wire types
//!
//! This module is the only place the backend's wire quirks are handled:
//! field-name aliases, naive timestamps and bare-array detect responses are
//! all normalized here, once, into the canonical types in `types`.

pub mod client;
pub mod types;

pub use client::{BackendClient, BackendConfig};
pub use types::{Alert, DetectionRunResult, LogRecord, StatsSummary, ThreatLabel};
