//! Result Filter Pipeline
//!
//! Owns the last detection run's result set and the current filter, and
//! recomputes the filtered view synchronously whenever asked. Filtering is
//! pure and order-preserving; nothing is re-fetched.

use std::str::FromStr;

use crate::backend::types::{Alert, DetectionRunResult, ThreatLabel};
use crate::error::MonitorError;

/// Label predicate: everything, or one exact label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelFilter {
    #[default]
    All,
    Only(ThreatLabel),
}

impl FromStr for LabelFilter {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(LabelFilter::All),
            "attack" => Ok(LabelFilter::Only(ThreatLabel::Attack)),
            "suspicious" => Ok(LabelFilter::Only(ThreatLabel::Suspicious)),
            "normal" => Ok(LabelFilter::Only(ThreatLabel::Normal)),
            other => Err(MonitorError::InvalidInput(format!(
                "unknown label filter '{}' (expected all, attack, suspicious or normal)",
                other
            ))),
        }
    }
}

/// Why a view came out the way it did, so the caller can render the right
/// guidance instead of guessing from an empty list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewReason {
    /// No detection run has produced results yet (or the run analyzed nothing)
    NothingToAnalyze,
    /// Results exist but the current filters exclude all of them
    NoMatches,
    Matches,
}

/// One recomputed view over the result set
#[derive(Debug, Clone)]
pub struct FilteredView {
    pub alerts: Vec<Alert>,
    pub match_count: usize,
    pub reason: ViewReason,
}

pub struct FilterPipeline {
    results: Option<DetectionRunResult>,
    label: LabelFilter,
    /// Lowercased once on set; matching is case-insensitive substring
    ip_substring: String,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self {
            results: None,
            label: LabelFilter::All,
            ip_substring: String::new(),
        }
    }

    /// Replace the result set wholesale (one run's output supersedes the last)
    pub fn set_results(&mut self, results: DetectionRunResult) {
        self.results = Some(results);
    }

    pub fn set_filter(&mut self, label: LabelFilter, ip_substring: &str) {
        self.label = label;
        self.ip_substring = ip_substring.to_lowercase();
    }

    pub fn last_run(&self) -> Option<&DetectionRunResult> {
        self.results.as_ref()
    }

    fn matches(&self, alert: &Alert) -> bool {
        let label_ok = match self.label {
            LabelFilter::All => true,
            LabelFilter::Only(label) => alert.threat_label == label,
        };
        let ip_ok =
            self.ip_substring.is_empty() || alert.source_ip.to_lowercase().contains(&self.ip_substring);
        label_ok && ip_ok
    }

    /// Recompute the filtered view. Both predicates are conjunctive and the
    /// result keeps the run's relative order.
    pub fn view(&self) -> FilteredView {
        let events = match &self.results {
            Some(results) if !results.analyzed_events.is_empty() => &results.analyzed_events,
            _ => {
                return FilteredView {
                    alerts: vec![],
                    match_count: 0,
                    reason: ViewReason::NothingToAnalyze,
                }
            }
        };

        let alerts: Vec<Alert> = events.iter().filter(|a| self.matches(a)).cloned().collect();
        let match_count = alerts.len();
        let reason = if match_count == 0 {
            ViewReason::NoMatches
        } else {
            ViewReason::Matches
        };

        FilteredView {
            alerts,
            match_count,
            reason,
        }
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
