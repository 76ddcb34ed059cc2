//! Monitoring controller - the client-side core
//!
//! Four cooperating components, each owning exactly one piece of mutable
//! state and mutated only through its public contract:
//!
//! - [`job::JobController`] - lifecycle of one cancellable detection run
//! - [`feed::AlertReconciler`] - bounded, deduplicated live alert feed
//! - [`filter::FilterPipeline`] - live re-filtering of the last run's results
//! - [`series`] - stateless distribution + timeline aggregation

pub mod feed;
pub mod filter;
pub mod job;
pub mod series;

pub use feed::AlertReconciler;
pub use filter::{FilterPipeline, FilteredView, LabelFilter, ViewReason};
pub use job::{DetectionBackend, JobController, JobState};
pub use series::{aggregate, AlertSeries, Distribution, TimelineBucket};
