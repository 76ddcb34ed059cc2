//! Alert Reconciler
//!
//! Merges each polled alert collection into the live feed without
//! duplication. The feed is newest-first and capped; the seen-id set is not,
//! so an alert that scrolled off the feed stays seen and is never re-admitted
//! until an explicit `clear`.

use std::collections::{HashSet, VecDeque};

use crate::backend::types::Alert;
use crate::constants;

pub struct AlertReconciler {
    seen: HashSet<String>,
    feed: VecDeque<Alert>,
    capacity: usize,
}

impl AlertReconciler {
    pub fn new() -> Self {
        Self::with_capacity(constants::ALERT_FEED_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            seen: HashSet::new(),
            feed: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Merge `latest` into the feed. Returns the newly admitted alerts in
    /// input order. Idempotent per `log_id`: re-reconciling the same
    /// collection admits nothing.
    pub fn reconcile(&mut self, latest: &[Alert]) -> Vec<Alert> {
        let mut admitted = Vec::new();

        for alert in latest {
            if self.seen.contains(&alert.log_id) {
                continue;
            }

            self.seen.insert(alert.log_id.clone());
            self.feed.push_front(alert.clone());
            // Evict oldest rows past capacity; seen-set membership survives
            self.feed.truncate(self.capacity);

            admitted.push(alert.clone());
        }

        if !admitted.is_empty() {
            log::debug!("Admitted {} new alert(s) to the feed", admitted.len());
        }

        admitted
    }

    /// Empty the feed and the seen-id set atomically. After this, previously
    /// seen alerts may be re-admitted, which is intended when the backend's
    /// stored alerts were cleared.
    pub fn clear(&mut self) {
        self.seen.clear();
        self.feed.clear();
    }

    /// Rendered feed, newest first
    pub fn feed(&self) -> impl Iterator<Item = &Alert> {
        self.feed.iter()
    }

    pub fn len(&self) -> usize {
        self.feed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feed.is_empty()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

impl Default for AlertReconciler {
    fn default() -> Self {
        Self::new()
    }
}
